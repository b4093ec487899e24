// Primitives for reading Excel workbooks.

use calamine::DataType;
use mbti_stats::builder::Builder;

use crate::report::{io_common::push_record, *};

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> RResult<Dataset> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(header_name)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut builder = Builder::new(&header);
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, row);
        let record: Vec<CellValue> = row.iter().map(cell_value).collect();
        push_record(&mut builder, record, path, lineno)?;
    }
    info!(
        "read_excel_table: read {} rows from {:?}",
        builder.num_rows(),
        path
    );
    Ok(builder.build())
}

fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        _ => "".to_string(),
    }
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) if s.trim().is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        DataType::Empty => CellValue::Empty,
        // Formula errors, dates: nothing to aggregate.
        x => {
            debug!("cell_value: treating cell {:?} as empty", x);
            CellValue::Empty
        }
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> RResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => {
                let names: Vec<&str> = all_worksheets.iter().map(|(n, _)| n.as_str()).collect();
                AmbiguousWorksheetSnafu {
                    path,
                    names: names.join(", "),
                }
                .fail()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_value(&DataType::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&DataType::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_value(&DataType::String("France".to_string())),
            CellValue::Text("France".to_string())
        );
        assert_eq!(
            cell_value(&DataType::String("  ".to_string())),
            CellValue::Empty
        );
        assert_eq!(cell_value(&DataType::Empty), CellValue::Empty);
    }

    #[test]
    fn header_names() {
        assert_eq!(header_name(&DataType::String("INTJ".to_string())), "INTJ");
        assert_eq!(header_name(&DataType::Int(2020)), "2020");
        assert_eq!(header_name(&DataType::Empty), "");
    }

    #[test]
    fn missing_workbook() {
        let res = read_excel_table("/no/such/workbook.xlsx", None);
        assert!(matches!(res, Err(ReportError::OpeningExcel { .. })));
    }
}
