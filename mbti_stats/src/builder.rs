pub use crate::config::*;

/// A builder for assembling a dataset row by row.
///
/// Every reader goes through the builder, which guarantees that the rows
/// have the width of the header.
///
/// ```
/// pub use mbti_stats::builder::Builder;
/// # use mbti_stats::StatsError;
///
/// let mut builder = Builder::new(&["Country", "INTJ", "ENFP"]);
///
/// builder.add_row(&["France", "12.5", "87.5"])?;
/// builder.add_row(&["Japan", "", "n/a"])?;
///
/// let dataset = builder.build();
/// assert_eq!(dataset.num_rows(), 2);
///
/// # Ok::<(), StatsError>(())
/// ```
pub struct Builder {
    pub(crate) _headers: Vec<String>,
    pub(crate) _rows: Vec<Vec<CellValue>>,
}

impl Builder {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Builder {
        Builder {
            _headers: headers.iter().map(|s| s.as_ref().to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row of raw text cells.
    ///
    /// Empty strings become empty cells. The other cells are kept as text,
    /// numbers are read later on demand.
    pub fn add_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), StatsError> {
        let record: Vec<CellValue> = cells
            .iter()
            .map(|s| match s.as_ref() {
                "" => CellValue::Empty,
                x => CellValue::Text(x.to_string()),
            })
            .collect();
        self.add_record(record)
    }

    /// Adds a row of cells that already carry a type (for example from a spreadsheet).
    pub fn add_record(&mut self, record: Vec<CellValue>) -> Result<(), StatsError> {
        if record.len() != self._headers.len() {
            return Err(StatsError::RaggedRow {
                row: self._rows.len(),
                expected: self._headers.len(),
                found: record.len(),
            });
        }
        self._rows.push(record);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> Dataset {
        Dataset {
            headers: self._headers,
            rows: self._rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_keep_their_type() {
        let mut b = Builder::new(&["Country", "INTJ"]);
        b.add_row(&["A", ""]).unwrap();
        b.add_record(vec![CellValue::Text("B".to_string()), CellValue::Number(4.0)])
            .unwrap();
        let d = b.build();
        assert_eq!(d.rows()[0][1], CellValue::Empty);
        assert_eq!(d.rows()[1][1], CellValue::Number(4.0));
    }

    #[test]
    fn width_checked() {
        let mut b = Builder::new(&["Country", "INTJ"]);
        b.add_row(&["A", "1"]).unwrap();
        assert_eq!(
            b.add_row(&["B", "1", "2"]),
            Err(StatsError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(b.num_rows(), 1);
    }
}
