// ********* Input data structures ***********

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::Display;

const CANONICAL_LABELS: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ", "ESFJ",
    "ISTP", "ISFP", "ESTP", "ESFP",
];

/// One of the 16 personality types.
///
/// The ordering of the variants (through `MbtiType::ALL`) is the canonical
/// order used by every output that is not explicitly ranked.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct MbtiType(u8);

impl MbtiType {
    pub const ALL: [MbtiType; 16] = [
        MbtiType(0),
        MbtiType(1),
        MbtiType(2),
        MbtiType(3),
        MbtiType(4),
        MbtiType(5),
        MbtiType(6),
        MbtiType(7),
        MbtiType(8),
        MbtiType(9),
        MbtiType(10),
        MbtiType(11),
        MbtiType(12),
        MbtiType(13),
        MbtiType(14),
        MbtiType(15),
    ];

    /// Reads a label, ignoring the case and the surrounding whitespace.
    ///
    /// ```
    /// use mbti_stats::MbtiType;
    /// assert_eq!(MbtiType::parse(" intj ").map(|t| t.label()), Some("INTJ"));
    /// assert_eq!(MbtiType::parse("Country"), None);
    /// ```
    pub fn parse(s: &str) -> Option<MbtiType> {
        let norm = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        let norm = norm.to_uppercase();
        CANONICAL_LABELS
            .iter()
            .position(|l| *l == norm)
            .map(|idx| MbtiType(idx as u8))
    }

    pub fn label(&self) -> &'static str {
        CANONICAL_LABELS[self.0 as usize]
    }

    /// Position of this type in the canonical order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The letter of this type for the given dimension.
    pub fn letter(&self, dimension: Dimension) -> char {
        // All the labels are ASCII.
        self.label().as_bytes()[dimension.position()] as char
    }
}

impl Display for MbtiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single cell of the input table.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Best-effort numeric reading. Anything that does not read as a finite
    /// number is missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(x) if x.is_finite() => Some(*x),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            _ => None,
        }
    }

    /// Reading of the cell as the name of a location. Blank cells have no name.
    pub fn as_location(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            CellValue::Number(x) => Some(x.to_string()),
            _ => None,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(x) => write!(f, "{}", x),
        }
    }
}

/// The loaded table: a header and rectangular rows.
///
/// It is immutable once built. Use the `Builder` to assemble one.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Dataset, StatsError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(StatsError::RaggedRow {
                    row: idx,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Dataset { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ********* Configuration **********

/// How the numbers of a dataset should be read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AggregationMode {
    /// Every row is a distribution summing to about 100. Columns are averaged.
    Percent,
    /// Every cell is a raw count. Columns are summed.
    Count,
}

impl AggregationMode {
    pub fn axis_title(&self) -> &'static str {
        match self {
            AggregationMode::Percent => "average percentage",
            AggregationMode::Count => "total count",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationMode::Percent => "percent",
            AggregationMode::Count => "count",
        }
    }
}

/// The mode requested by the user. A fixed mode always wins over inference.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ModeSelection {
    Auto,
    Fixed(AggregationMode),
}

/// One of the four binary splits of the types.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Dimension {
    /// Extraversion / Introversion
    EI,
    /// Intuition / Sensing
    NS,
    /// Thinking / Feeling
    TF,
    /// Judging / Perceiving
    JP,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [Dimension::EI, Dimension::NS, Dimension::TF, Dimension::JP];

    pub fn parse(s: &str) -> Option<Dimension> {
        match s.trim().to_uppercase().as_str() {
            "EI" | "IE" | "E/I" | "E VS I" => Some(Dimension::EI),
            "NS" | "SN" | "N/S" | "N VS S" => Some(Dimension::NS),
            "TF" | "FT" | "T/F" | "T VS F" => Some(Dimension::TF),
            "JP" | "PJ" | "J/P" | "J VS P" => Some(Dimension::JP),
            _ => None,
        }
    }

    /// Index of the letter that carries this dimension in a label.
    pub fn position(&self) -> usize {
        match self {
            Dimension::EI => 0,
            Dimension::NS => 1,
            Dimension::TF => 2,
            Dimension::JP => 3,
        }
    }

    pub fn letters(&self) -> (char, char) {
        match self {
            Dimension::EI => ('E', 'I'),
            Dimension::NS => ('N', 'S'),
            Dimension::TF => ('T', 'F'),
            Dimension::JP => ('J', 'P'),
        }
    }

    pub fn name(&self) -> String {
        let (a, b) = self.letters();
        format!("{} vs {}", a, b)
    }

    /// Finds the side of this dimension designated by a letter.
    pub fn side(&self, letter: &str) -> Option<DimensionSide> {
        let (a, b) = self.letters();
        let mut chars = letter.trim().chars();
        match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
            (Some(c), None) if c == a => Some(DimensionSide::First),
            (Some(c), None) if c == b => Some(DimensionSide::Second),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DimensionSide {
    First,
    Second,
}

/// The partition of the 16 types along a dimension.
///
/// Invariant: `first` and `second` hold 8 types each, are disjoint and cover all the types.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DimensionGrouping {
    pub dimension: Dimension,
    pub first: Vec<MbtiType>,
    pub second: Vec<MbtiType>,
}

impl DimensionGrouping {
    pub fn new(dimension: Dimension) -> DimensionGrouping {
        let (first_letter, _) = dimension.letters();
        let (first, second): (Vec<MbtiType>, Vec<MbtiType>) = MbtiType::ALL
            .iter()
            .copied()
            .partition(|t| t.letter(dimension) == first_letter);
        DimensionGrouping {
            dimension,
            first,
            second,
        }
    }

    pub fn side_types(&self, side: DimensionSide) -> &[MbtiType] {
        match side {
            DimensionSide::First => &self.first,
            DimensionSide::Second => &self.second,
        }
    }

    pub fn side_letter(&self, side: DimensionSide) -> char {
        let (a, b) = self.dimension.letters();
        match side {
            DimensionSide::First => a,
            DimensionSide::Second => b,
        }
    }
}

/// The selection made by the user for one report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportRequest {
    /// The first rows of the table.
    Preview { rows: usize },
    /// The types ranked over all the locations.
    TopTypes {
        mode: ModeSelection,
        top_k: Option<usize>,
    },
    /// All the types for one location.
    LocationProfile { location: String },
    /// The names of all the locations.
    Locations,
    /// One type across all the locations.
    CategoryByLocation { mbti_type: MbtiType },
    /// The share of one side of a dimension across all the locations.
    DimensionRatio {
        dimension: Dimension,
        side: DimensionSide,
    },
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct RankedEntry {
    pub mbti_type: MbtiType,
    /// Missing for the mean of a column without any number.
    pub value: Option<f64>,
}

/// The types ranked by decreasing value.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedList {
    pub mode: AggregationMode,
    /// True if the mode was inferred from the data and not requested.
    pub inferred: bool,
    pub axis_title: String,
    pub entries: Vec<RankedEntry>,
}

/// The values of one location, in canonical order.
#[derive(PartialEq, Debug, Clone)]
pub struct LocationVector {
    pub location: String,
    pub values: Vec<(MbtiType, Option<f64>)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LocationValue {
    pub location: String,
    pub value: Option<f64>,
}

/// The share of one side of a dimension, for every location.
#[derive(PartialEq, Debug, Clone)]
pub struct LocationRatioTable {
    pub dimension: Dimension,
    pub side: DimensionSide,
    pub side_label: String,
    pub rows: Vec<LocationValue>,
}

/// The value of a single type, for every location.
#[derive(PartialEq, Debug, Clone)]
pub struct LocationValueTable {
    pub mbti_type: MbtiType,
    pub rows: Vec<LocationValue>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub total_rows: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Report {
    Preview(Preview),
    TopTypes(RankedList),
    LocationProfile(LocationVector),
    Locations(Vec<String>),
    CategoryByLocation(LocationValueTable),
    DimensionRatio(LocationRatioTable),
}

/// Sorts by decreasing value, with the missing values last.
///
/// The sort is stable: equal values keep the order of the input.
pub fn sorted_descending(rows: &[LocationValue]) -> Vec<LocationValue> {
    let mut res = rows.to_vec();
    res.sort_by(|a, b| descending_missing_last(a.value, b.value));
    res
}

/// Decreasing order of values, missing values last.
///
/// `0.0` and `-0.0` compare equal, so they count as a tie.
pub(crate) fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ******** Errors *********

/// The family of an error.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// A required column is absent.
    Schema,
    /// A requested location is absent.
    Lookup,
    /// The table or the request is malformed.
    Input,
}

/// Errors that stop the computation of a report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsError {
    MissingCategoryColumns,
    MissingLocationColumn,
    IncompleteCategoryColumns { missing: Vec<MbtiType> },
    MissingCategoryColumn { mbti_type: MbtiType },
    LocationNotFound { location: String },
    InvalidTopK { top_k: usize },
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::MissingCategoryColumns
            | StatsError::MissingLocationColumn
            | StatsError::IncompleteCategoryColumns { .. }
            | StatsError::MissingCategoryColumn { .. } => ErrorKind::Schema,
            StatsError::LocationNotFound { .. } => ErrorKind::Lookup,
            StatsError::InvalidTopK { .. } | StatsError::RaggedRow { .. } => ErrorKind::Input,
        }
    }
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::MissingCategoryColumns => write!(
                f,
                "no MBTI type column found: the header must contain columns such as INTJ, ENTP, ..."
            ),
            StatsError::MissingLocationColumn => write!(
                f,
                "no location column found: a column name must contain 'country' or 'nation'"
            ),
            StatsError::IncompleteCategoryColumns { missing } => {
                let labels: Vec<&str> = missing.iter().map(|t| t.label()).collect();
                write!(
                    f,
                    "this report needs all 16 MBTI type columns, missing: {}",
                    labels.join(", ")
                )
            }
            StatsError::MissingCategoryColumn { mbti_type } => {
                write!(f, "no column found for MBTI type {}", mbti_type)
            }
            StatsError::LocationNotFound { location } => {
                write!(f, "no data for location {:?}", location)
            }
            StatsError::InvalidTopK { top_k } => {
                write!(f, "the number of top types must be between 1 and 16, got {}", top_k)
            }
            StatsError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells but the header has {} columns",
                row + 1,
                found,
                expected
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_labels() {
        assert_eq!(MbtiType::parse("ESFP"), Some(MbtiType::ALL[15]));
        assert_eq!(MbtiType::parse("\u{feff}Intj\t"), Some(MbtiType::ALL[0]));
        assert_eq!(MbtiType::parse("INTJ-A"), None);
        assert_eq!(MbtiType::parse(""), None);
    }

    #[test]
    fn all_labels_distinct() {
        let labels: HashSet<&str> = MbtiType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), 16);
    }

    #[test]
    fn groupings_cover_all_types() {
        for dim in Dimension::ALL {
            let g = DimensionGrouping::new(dim);
            assert_eq!(g.first.len(), 8);
            assert_eq!(g.second.len(), 8);
            let mut all: HashSet<MbtiType> = g.first.iter().cloned().collect();
            for t in g.second.iter() {
                assert!(all.insert(*t), "{} on both sides of {:?}", t, dim);
            }
            assert_eq!(all.len(), 16);
        }
    }

    #[test]
    fn extraversion_side() {
        let g = DimensionGrouping::new(Dimension::EI);
        let labels: Vec<&str> = g.first.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec!["ENTJ", "ENTP", "ENFJ", "ENFP", "ESTJ", "ESFJ", "ESTP", "ESFP"]
        );
        assert_eq!(g.side_letter(DimensionSide::Second), 'I');
    }

    #[test]
    fn dimension_sides() {
        assert_eq!(Dimension::parse("t/f"), Some(Dimension::TF));
        assert_eq!(Dimension::JP.side("p"), Some(DimensionSide::Second));
        assert_eq!(Dimension::JP.side("J"), Some(DimensionSide::First));
        assert_eq!(Dimension::JP.side("E"), None);
        assert_eq!(Dimension::JP.side("JP"), None);
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Text(" 12.5 ".to_string()).as_number(), Some(12.5));
        assert_eq!(CellValue::Text("n/a".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
    }

    #[test]
    fn ragged_rows_rejected() {
        let res = Dataset::new(
            vec!["Country".to_string(), "INTJ".to_string()],
            vec![vec![CellValue::Text("A".to_string())]],
        );
        assert_eq!(
            res,
            Err(StatsError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Input);
    }

    #[test]
    fn descending_order_puts_missing_last() {
        let rows = vec![
            LocationValue {
                location: "A".to_string(),
                value: None,
            },
            LocationValue {
                location: "B".to_string(),
                value: Some(1.0),
            },
            LocationValue {
                location: "C".to_string(),
                value: Some(3.0),
            },
            LocationValue {
                location: "D".to_string(),
                value: Some(1.0),
            },
        ];
        let names: Vec<String> = sorted_descending(&rows)
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(names, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn signed_zeros_are_tied() {
        let rows = vec![
            LocationValue {
                location: "A".to_string(),
                value: Some(-0.0),
            },
            LocationValue {
                location: "B".to_string(),
                value: Some(0.0),
            },
        ];
        let names: Vec<String> = sorted_descending(&rows)
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
