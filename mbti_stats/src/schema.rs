use log::{debug, warn};

use crate::config::*;

/// A column of the input that holds the values of one type.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryColumn {
    pub mbti_type: MbtiType,
    pub index: usize,
    pub name: String,
}

/// The column of the input that names the location of each row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LocationColumn {
    pub index: usize,
    pub name: String,
}

/// The columns found in a header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Schema {
    /// The type columns, in the order of the header.
    pub categories: Vec<CategoryColumn>,
    pub location: Option<LocationColumn>,
}

impl Schema {
    pub fn column_for(&self, mbti_type: MbtiType) -> Option<&CategoryColumn> {
        self.categories.iter().find(|c| c.mbti_type == mbti_type)
    }

    pub fn require_location(&self) -> Result<&LocationColumn, StatsError> {
        self.location.as_ref().ok_or(StatsError::MissingLocationColumn)
    }

    /// The column index of every type, in canonical order.
    ///
    /// Fails if any of the 16 types has no column.
    pub fn require_all_categories(&self) -> Result<Vec<(MbtiType, usize)>, StatsError> {
        let mut res: Vec<(MbtiType, usize)> = Vec::new();
        let mut missing: Vec<MbtiType> = Vec::new();
        for t in MbtiType::ALL {
            match self.column_for(t) {
                Some(c) => res.push((t, c.index)),
                None => missing.push(t),
            }
        }
        if missing.is_empty() {
            Ok(res)
        } else {
            Err(StatsError::IncompleteCategoryColumns { missing })
        }
    }
}

fn is_location_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("country") || lower.contains("nation")
}

/// Finds the type columns and the location column of a header.
///
/// Type columns are matched exactly, ignoring case and surrounding whitespace.
/// If two columns read as the same type, the first one is used.
/// The location column is the first column whose name contains 'country' or 'nation',
/// ignoring case. Its absence is not an error here: only the reports that break the
/// data down by location require it.
pub fn detect_schema(headers: &[String]) -> Result<Schema, StatsError> {
    let mut categories: Vec<CategoryColumn> = Vec::new();
    let mut location: Option<LocationColumn> = None;
    for (index, name) in headers.iter().enumerate() {
        if let Some(mbti_type) = MbtiType::parse(name) {
            if let Some(prev) = categories.iter().find(|c| c.mbti_type == mbti_type) {
                warn!(
                    "detect_schema: column {:?} duplicates column {:?} for type {}, ignoring it",
                    name, prev.name, mbti_type
                );
                continue;
            }
            categories.push(CategoryColumn {
                mbti_type,
                index,
                name: name.clone(),
            });
        } else if location.is_none() && is_location_name(name) {
            location = Some(LocationColumn {
                index,
                name: name.clone(),
            });
        }
    }
    debug!(
        "detect_schema: {} type columns, location column: {:?}",
        categories.len(),
        location
    );
    if categories.is_empty() {
        return Err(StatsError::MissingCategoryColumns);
    }
    Ok(Schema {
        categories,
        location,
    })
}
