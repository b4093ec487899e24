use log::{debug, info, warn};

use mbti_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;
use crate::report::io_common::simplify_file_name;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening csv file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading the header of {path}"))]
    CsvHeader { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} is malformed"))]
    MalformedRow {
        source: StatsError,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet or an empty worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name:?}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display(
        "The workbook {path} has several worksheets ({names}): use --excel-worksheet-name to choose one"
    ))]
    AmbiguousWorksheet { path: String, names: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing the report to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("The report {report} requires the option --{option}"))]
    MissingOption { option: String, report: String },
    #[snafu(display("Cannot compute the report"))]
    Stats { source: StatsError },
    #[snafu(display("Difference detected between the report and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl ReportError {
    /// The family of the error, as shown to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::CsvOpen { .. }
            | ReportError::CsvHeader { .. }
            | ReportError::CsvLineParse { .. }
            | ReportError::MalformedRow { .. }
            | ReportError::OpeningExcel { .. }
            | ReportError::EmptyExcel { .. }
            | ReportError::MissingWorksheet { .. }
            | ReportError::AmbiguousWorksheet { .. } => "parse error",
            ReportError::Stats { source } => match source.kind() {
                ErrorKind::Schema => "schema error",
                ErrorKind::Lookup => "lookup error",
                ErrorKind::Input => "input error",
            },
            ReportError::ReferenceMismatch { .. } => "reference error",
            ReportError::WritingJson { .. } | ReportError::WritingOutput { .. } => "output error",
            ReportError::OpeningJson { .. }
            | ReportError::ParsingJson { .. }
            | ReportError::MissingParentDir { .. }
            | ReportError::MissingOption { .. }
            | ReportError::Whatever { .. } => "configuration error",
        }
    }
}

pub type RResult<T> = Result<T, ReportError>;

fn report_kind(request: &ReportRequest) -> &'static str {
    match request {
        ReportRequest::Preview { .. } => "preview",
        ReportRequest::TopTypes { .. } => "topTypes",
        ReportRequest::LocationProfile { .. } => "locationProfile",
        ReportRequest::Locations => "locations",
        ReportRequest::CategoryByLocation { .. } => "categoryByLocation",
        ReportRequest::DimensionRatio { .. } => "dimensionRatio",
    }
}

fn number_js(x: Option<f64>) -> JSValue {
    match x {
        Some(v) => json!(round2(v)),
        None => JSValue::Null,
    }
}

fn cell_js(cell: &CellValue) -> JSValue {
    match cell {
        CellValue::Empty => JSValue::Null,
        CellValue::Text(s) => json!(s),
        CellValue::Number(x) => number_js(Some(*x)),
    }
}

fn location_rows_js(rows: &[LocationValue]) -> Vec<JSValue> {
    sorted_descending(rows)
        .iter()
        .map(|r| json!({"location": r.location, "value": number_js(r.value)}))
        .collect()
}

fn report_to_json(report: &Report) -> JSValue {
    match report {
        Report::Preview(p) => {
            let rows: Vec<Vec<JSValue>> = p
                .rows
                .iter()
                .map(|row| row.iter().map(cell_js).collect())
                .collect();
            json!({"headers": p.headers, "rows": rows, "totalRows": p.total_rows})
        }
        Report::TopTypes(r) => {
            let ranking: Vec<JSValue> = r
                .entries
                .iter()
                .map(|e| json!({"type": e.mbti_type.label(), "value": number_js(e.value)}))
                .collect();
            json!({
                "mode": r.mode.name(),
                "inferred": r.inferred,
                "axisTitle": r.axis_title,
                "ranking": ranking
            })
        }
        Report::LocationProfile(v) => {
            let values: Vec<JSValue> = v
                .values
                .iter()
                .map(|(t, x)| json!({"type": t.label(), "value": number_js(*x)}))
                .collect();
            json!({"location": v.location, "values": values})
        }
        Report::Locations(names) => json!({ "locations": names }),
        Report::CategoryByLocation(t) => json!({
            "type": t.mbti_type.label(),
            "rows": location_rows_js(&t.rows)
        }),
        Report::DimensionRatio(t) => json!({
            "dimension": t.dimension.name(),
            "side": t.side_label,
            "rows": location_rows_js(&t.rows)
        }),
    }
}

fn build_summary_js(settings: &ResolvedSettings, report: &Report) -> JSValue {
    let mut c = OutputConfig {
        title: settings.title.clone(),
        source: simplify_file_name(&settings.input_path),
        report: report_kind(&settings.request).to_string(),
        mode: None,
        location: None,
        mbti_type: None,
        dimension: None,
        side: None,
    };
    match report {
        Report::TopTypes(r) => c.mode = Some(r.mode.name().to_string()),
        Report::LocationProfile(v) => c.location = Some(v.location.clone()),
        Report::CategoryByLocation(t) => c.mbti_type = Some(t.mbti_type.label().to_string()),
        Report::DimensionRatio(t) => {
            c.dimension = Some(t.dimension.name());
            c.side = Some(t.side_label.clone());
        }
        Report::Preview(_) | Report::Locations(_) => {}
    }
    json!({
        "config": c,
        "results": report_to_json(report) })
}

/// Writes the content of a report in the log, one line per row.
fn log_report(report: &Report) {
    match report {
        Report::Preview(p) => {
            info!("Preview of {} rows out of {}", p.rows.len(), p.total_rows);
            info!("{}", p.headers.join(" | "));
            for row in p.rows.iter() {
                let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                info!("{}", cells.join(" | "));
            }
        }
        Report::TopTypes(r) => {
            info!(
                "Ranking of the types ({}, mode {}{})",
                r.axis_title,
                r.mode.name(),
                if r.inferred { ", inferred" } else { "" }
            );
            for (idx, e) in r.entries.iter().enumerate() {
                info!("{:>6} {} {:?}", idx + 1, e.mbti_type, e.value);
            }
        }
        Report::LocationProfile(v) => {
            info!("Profile of {}", v.location);
            for (t, x) in v.values.iter() {
                info!("      {} {:?}", t, x);
            }
        }
        Report::Locations(names) => {
            info!("{} locations", names.len());
        }
        Report::CategoryByLocation(t) => {
            info!("{} by location", t.mbti_type);
            for r in sorted_descending(&t.rows).iter() {
                info!("      {} {:?}", r.location, r.value);
            }
        }
        Report::DimensionRatio(t) => {
            info!("Share of {} ({})", t.side_label, t.dimension.name());
            for r in sorted_descending(&t.rows).iter() {
                info!("      {} {:?}", r.location, r.value);
            }
        }
    }
}

fn read_dataset(settings: &ResolvedSettings) -> RResult<Dataset> {
    info!(
        "Attempting to read {:?} as {:?}",
        settings.input_path, settings.provider
    );
    match settings.provider {
        Provider::Csv => io_csv::read_csv_table(&settings.input_path, settings.delimiter),
        Provider::Xlsx => io_excel::read_excel_table(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
        ),
    }
}

/// Reads the input and computes the summary of the requested report.
pub fn compute_summary(args: &Args) -> RResult<(ResolvedSettings, JSValue)> {
    let config = match &args.config {
        Some(p) => Some((p.as_str(), read_config(p)?)),
        None => None,
    };
    let settings = resolve_settings(args, config.as_ref().map(|(p, c)| (*p, c)))?;
    info!("settings: {:?}", settings);

    let dataset = read_dataset(&settings)?;
    let report = compute_report(&dataset, &settings.request).context(StatsSnafu {})?;
    debug!("report: {:?}", report);
    log_report(&report);

    let summary_js = build_summary_js(&settings, &report);
    Ok((settings, summary_js))
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> RResult<()> {
    let summary_ref = read_reference(reference_path)?;
    debug!("reference: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

pub fn run_report(args: &Args) -> RResult<()> {
    let (settings, result_js) = compute_summary(args)?;

    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu {})?;
    match settings.out.as_deref() {
        None | Some("") | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            info!("Writing the report to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    Ok(())
}
