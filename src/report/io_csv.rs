// Primitives for reading CSV files.

use mbti_stats::builder::Builder;

use crate::report::{io_common::push_record, *};

pub fn read_csv_table(path: &str, delimiter: u8) -> RResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut builder = Builder::new(&header);
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, line);
        let record: Vec<CellValue> = line
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s.to_string())
                }
            })
            .collect();
        push_record(&mut builder, record, path, lineno)?;
    }
    info!(
        "read_csv_table: read {} rows from {:?}",
        builder.num_rows(),
        path
    );
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn reads_header_and_rows() {
        let d = read_csv_table(&data_path("countries.csv"), b',').unwrap();
        assert_eq!(d.headers().len(), 17);
        assert_eq!(d.headers()[0], "Country");
        assert_eq!(d.num_rows(), 4);
        assert_eq!(d.rows()[0][0], CellValue::Text("France".to_string()));
        // The last row has no data.
        assert_eq!(d.rows()[3][1], CellValue::Empty);
    }

    #[test]
    fn other_delimiter() {
        let d = read_csv_table(&data_path("counts_semicolon.csv"), b';').unwrap();
        assert_eq!(d.headers()[0], "Nation");
        assert_eq!(d.num_rows(), 3);
    }

    #[test]
    fn missing_file() {
        let res = read_csv_table(&data_path("no_such_file.csv"), b',');
        assert!(matches!(res, Err(ReportError::CsvOpen { .. })));
    }

    #[test]
    fn uneven_lines() {
        let res = read_csv_table(&data_path("malformed.csv"), b',');
        match res {
            Err(ReportError::CsvLineParse { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected {:?}", x.map(|d| d.num_rows())),
        }
    }
}
