use std::path::Path;

use mbti_stats::builder::Builder;
use mbti_stats::CellValue;
use snafu::ResultExt;

use crate::report::{MalformedRowSnafu, RResult};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Adds one record to the dataset under construction.
///
/// `lineno` is the line of the record in the input file (starting at 1 with the header).
pub fn push_record(
    builder: &mut Builder,
    record: Vec<CellValue>,
    path: &str,
    lineno: usize,
) -> RResult<()> {
    builder
        .add_record(record)
        .context(MalformedRowSnafu { path, lineno })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/countries.csv"), "countries.csv");
        assert_eq!(simplify_file_name("countries.csv"), "countries.csv");
    }

    #[test]
    fn short_records_rejected() {
        let mut b = Builder::new(&["Country", "INTJ"]);
        assert!(push_record(&mut b, vec![CellValue::Empty, CellValue::Empty], "x.csv", 2).is_ok());
        let res = push_record(&mut b, vec![CellValue::Empty], "x.csv", 3);
        assert!(res.is_err());
        assert_eq!(res.unwrap_err().kind(), "parse error");
    }
}
