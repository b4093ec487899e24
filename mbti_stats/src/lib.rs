pub mod builder;
mod config;
pub mod manual;
mod mode;
mod schema;

use log::{debug, info, warn};

use std::collections::BTreeSet;

pub use crate::config::*;
use crate::config::descending_missing_last;
pub use crate::mode::{infer_mode, resolve_mode, row_sums};
pub use crate::schema::{detect_schema, CategoryColumn, LocationColumn, Schema};

/// Default number of entries in the ranking of the types.
pub const DEFAULT_TOP_K: usize = 10;

/// Rounds to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Ranks all the detected types over the whole dataset.
///
/// In percent mode, the value of a type is the mean of its column; in count mode, the sum.
/// Missing cells are ignored, column by column. A column without any number has a missing
/// mean and a sum of 0. The ranking is by decreasing value with the missing values last, and
/// types with equal values keep the order of their columns in the header.
pub fn global_ranking(
    dataset: &Dataset,
    schema: &Schema,
    mode: AggregationMode,
    inferred: bool,
) -> RankedList {
    let mut entries: Vec<RankedEntry> = Vec::new();
    for c in schema.categories.iter() {
        let values: Vec<f64> = dataset
            .rows()
            .iter()
            .filter_map(|row| row[c.index].as_number())
            .collect();
        // Folding from a positive zero: an empty sum must not be -0.0.
        let total: f64 = values.iter().fold(0.0, |acc, x| acc + x);
        let value = match mode {
            AggregationMode::Count => Some(total),
            AggregationMode::Percent if values.is_empty() => {
                warn!(
                    "global_ranking: column {:?} has no numeric value, its mean is missing",
                    c.name
                );
                None
            }
            AggregationMode::Percent => Some(total / (values.len() as f64)),
        };
        debug!(
            "global_ranking: {}: {} values, total {} -> {:?}",
            c.mbti_type,
            values.len(),
            total,
            value
        );
        entries.push(RankedEntry {
            mbti_type: c.mbti_type,
            value,
        });
    }
    // Stable sort: the ties keep the order of the header.
    entries.sort_by(|a, b| descending_missing_last(a.value, b.value));
    RankedList {
        mode,
        inferred,
        axis_title: mode.axis_title().to_string(),
        entries,
    }
}

/// Keeps the first `top_k` entries of a ranking.
pub fn top_k(ranking: &RankedList, top_k: usize) -> Result<RankedList, StatsError> {
    if top_k == 0 || top_k > MbtiType::ALL.len() {
        return Err(StatsError::InvalidTopK { top_k });
    }
    let mut res = ranking.clone();
    res.entries.truncate(top_k);
    Ok(res)
}

/// The values of all the types for the first row of the given location, in canonical order.
///
/// The location is matched exactly against the content of the location column.
pub fn location_vector(
    dataset: &Dataset,
    schema: &Schema,
    location: &str,
) -> Result<LocationVector, StatsError> {
    let loc_col = schema.require_location()?;
    let columns = schema.require_all_categories()?;
    let row = dataset
        .rows()
        .iter()
        .find(|row| row[loc_col.index].as_location().as_deref() == Some(location))
        .ok_or_else(|| StatsError::LocationNotFound {
            location: location.to_string(),
        })?;
    let values: Vec<(MbtiType, Option<f64>)> = columns
        .iter()
        .map(|(t, idx)| (*t, row[*idx].as_number()))
        .collect();
    debug!("location_vector: {}: {:?}", location, values);
    Ok(LocationVector {
        location: location.to_string(),
        values,
    })
}

/// The distinct location names, sorted.
pub fn distinct_locations(dataset: &Dataset, schema: &Schema) -> Result<Vec<String>, StatsError> {
    let loc_col = schema.require_location()?;
    let names: BTreeSet<String> = dataset
        .rows()
        .iter()
        .filter_map(|row| row[loc_col.index].as_location())
        .collect();
    Ok(names.into_iter().collect())
}

/// The value of one type for every location, in the order of the dataset.
pub fn category_by_location(
    dataset: &Dataset,
    schema: &Schema,
    mbti_type: MbtiType,
) -> Result<LocationValueTable, StatsError> {
    let loc_col = schema.require_location()?;
    let column = schema
        .column_for(mbti_type)
        .ok_or(StatsError::MissingCategoryColumn { mbti_type })?;
    let rows: Vec<LocationValue> = dataset
        .rows()
        .iter()
        .filter_map(|row| {
            row[loc_col.index].as_location().map(|location| LocationValue {
                location,
                value: row[column.index].as_number(),
            })
        })
        .collect();
    Ok(LocationValueTable { mbti_type, rows })
}

/// The share (in percent, 2 decimals) of one side of a dimension, for every location.
///
/// The share is missing when both sides sum to zero.
pub fn dimension_ratio(
    dataset: &Dataset,
    schema: &Schema,
    dimension: Dimension,
    side: DimensionSide,
) -> Result<LocationRatioTable, StatsError> {
    let loc_col = schema.require_location()?;
    let columns = schema.require_all_categories()?;
    let grouping = DimensionGrouping::new(dimension);
    let side_sum = |row: &[CellValue], types: &[MbtiType]| -> f64 {
        types
            .iter()
            .filter_map(|t| row[columns[t.index()].1].as_number())
            .fold(0.0, |acc, x| acc + x)
    };

    let mut rows: Vec<LocationValue> = Vec::new();
    for (idx, row) in dataset.rows().iter().enumerate() {
        let location = match row[loc_col.index].as_location() {
            Some(x) => x,
            None => {
                debug!("dimension_ratio: row {}: no location, skipping", idx);
                continue;
            }
        };
        let first = side_sum(row.as_slice(), grouping.side_types(DimensionSide::First));
        let second = side_sum(row.as_slice(), grouping.side_types(DimensionSide::Second));
        let total = first + second;
        let chosen = match side {
            DimensionSide::First => first,
            DimensionSide::Second => second,
        };
        let value = if total == 0.0 {
            debug!("dimension_ratio: {}: both sides are zero", location);
            None
        } else {
            Some(round2(100.0 * chosen / total))
        };
        rows.push(LocationValue { location, value });
    }
    Ok(LocationRatioTable {
        dimension,
        side,
        side_label: grouping.side_letter(side).to_string(),
        rows,
    })
}

/// The first rows of the dataset, verbatim.
pub fn preview(dataset: &Dataset, num_rows: usize) -> Preview {
    Preview {
        headers: dataset.headers().to_vec(),
        rows: dataset.rows().iter().take(num_rows).cloned().collect(),
        total_rows: dataset.num_rows(),
    }
}

fn detect_columns(dataset: &Dataset) -> Result<Schema, StatsError> {
    let schema = detect_schema(dataset.headers())?;
    info!(
        "compute_report: type columns: {:?}, location column: {:?}",
        schema
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<&str>>(),
        schema.location.as_ref().map(|l| l.name.as_str())
    );
    Ok(schema)
}

/// Computes one report on a dataset.
///
/// Arguments:
/// * `dataset` the loaded table
/// * `request` the report to compute, with the selections made by the user
pub fn compute_report(dataset: &Dataset, request: &ReportRequest) -> Result<Report, StatsError> {
    info!(
        "compute_report: {} rows, {} columns, request: {:?}",
        dataset.num_rows(),
        dataset.headers().len(),
        request
    );
    let res = match request {
        ReportRequest::Preview { rows } => Report::Preview(preview(dataset, *rows)),
        ReportRequest::TopTypes { mode, top_k: k } => {
            let schema = detect_columns(dataset)?;
            let (mode, inferred) = resolve_mode(dataset, &schema, *mode);
            let ranking = global_ranking(dataset, &schema, mode, inferred);
            Report::TopTypes(top_k(&ranking, k.unwrap_or(DEFAULT_TOP_K))?)
        }
        ReportRequest::LocationProfile { location } => {
            let schema = detect_columns(dataset)?;
            Report::LocationProfile(location_vector(dataset, &schema, location)?)
        }
        ReportRequest::Locations => {
            let schema = detect_columns(dataset)?;
            Report::Locations(distinct_locations(dataset, &schema)?)
        }
        ReportRequest::CategoryByLocation { mbti_type } => {
            let schema = detect_columns(dataset)?;
            Report::CategoryByLocation(category_by_location(dataset, &schema, *mbti_type)?)
        }
        ReportRequest::DimensionRatio { dimension, side } => {
            let schema = detect_columns(dataset)?;
            Report::DimensionRatio(dimension_ratio(dataset, &schema, *dimension, *side)?)
        }
    };
    Ok(res)
}
