use log::{debug, info};

use crate::config::*;
use crate::schema::Schema;

/// Row sums within these bounds (inclusive) read as percentages.
pub const PERCENT_LOWER_BOUND: f64 = 95.0;
pub const PERCENT_UPPER_BOUND: f64 = 105.0;

/// The sum of the type columns of every row, ignoring the missing cells.
///
/// A row without any numeric type cell has no sum.
pub fn row_sums(dataset: &Dataset, schema: &Schema) -> Vec<Option<f64>> {
    dataset
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<f64> = schema
                .categories
                .iter()
                .filter_map(|c| row[c.index].as_number())
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum())
            }
        })
        .collect()
}

/// Guesses whether the rows are percentages or counts.
///
/// The dataset reads as percentages if every row that has a sum sums to a
/// value close to 100. Without any row sum, there is no evidence of
/// percentages and the dataset reads as counts.
pub fn infer_mode(dataset: &Dataset, schema: &Schema) -> AggregationMode {
    let sums: Vec<f64> = row_sums(dataset, schema).into_iter().flatten().collect();
    debug!("infer_mode: row sums: {:?}", sums);
    if sums.is_empty() {
        return AggregationMode::Count;
    }
    let all_close = sums
        .iter()
        .all(|s| (PERCENT_LOWER_BOUND..=PERCENT_UPPER_BOUND).contains(s));
    if all_close {
        AggregationMode::Percent
    } else {
        AggregationMode::Count
    }
}

/// The mode to use for a computation, and whether it was inferred.
pub fn resolve_mode(
    dataset: &Dataset,
    schema: &Schema,
    selection: ModeSelection,
) -> (AggregationMode, bool) {
    match selection {
        ModeSelection::Fixed(mode) => {
            info!("resolve_mode: using requested mode {}", mode.name());
            (mode, false)
        }
        ModeSelection::Auto => {
            let mode = infer_mode(dataset, schema);
            info!("resolve_mode: inferred mode {}", mode.name());
            (mode, true)
        }
    }
}
