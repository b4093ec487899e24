use crate::report::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportSettings {
    pub kind: Option<String>,
    #[serde(rename = "aggregationMode")]
    pub aggregation_mode: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
    pub location: Option<String>,
    #[serde(rename = "mbtiType")]
    pub mbti_type: Option<String>,
    pub dimension: Option<String>,
    pub side: Option<String>,
    #[serde(rename = "previewRows")]
    pub preview_rows: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub source: FileSource,
    #[serde(default)]
    pub report: ReportSettings,
}

/// The echo of the options of a report, written next to the results.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub title: Option<String>,
    pub source: String,
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "mbtiType", skip_serializing_if = "Option::is_none")]
    pub mbti_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

pub fn read_config(path: &str) -> RResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_reference(path: &str) -> RResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// The options of a report once the command line and the configuration file are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedSettings {
    pub title: Option<String>,
    pub input_path: String,
    pub provider: Provider,
    pub delimiter: u8,
    pub excel_worksheet_name: Option<String>,
    pub request: ReportRequest,
    pub out: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl Provider {
    pub fn parse(s: &str) -> RResult<Provider> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => {
                whatever!("unknown input type: {:?} (expected csv or xlsx)", x)
            }
        }
    }

    fn from_extension(path: &str) -> Provider {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("xlsx") => Provider::Xlsx,
            _ => Provider::Csv,
        }
    }
}

/// Merges the command line with the configuration file (if any).
///
/// The command line always wins. The input path of the configuration file is relative
/// to the directory of that file.
pub fn resolve_settings(
    args: &Args,
    config: Option<(&str, &ReportConfig)>,
) -> RResult<ResolvedSettings> {
    let default_config = ReportConfig::default();
    let (config_dir, cfg): (Option<PathBuf>, &ReportConfig) = match config {
        Some((path, c)) => {
            let dir = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu { path })?;
            (Some(dir.to_path_buf()), c)
        }
        None => (None, &default_config),
    };

    let input_path: String = match (&args.input, &cfg.source.file_path, config_dir) {
        (Some(p), _, _) => p.clone(),
        (None, Some(p), Some(dir)) => dir.join(p).display().to_string(),
        (None, Some(p), None) => p.clone(),
        (None, None, _) => {
            whatever!("no input file: use --input or the filePath of the configuration")
        }
    };

    let provider = match args
        .input_type
        .clone()
        .or_else(|| cfg.source.provider.clone())
    {
        Some(s) => Provider::parse(&s)?,
        None => Provider::from_extension(&input_path),
    };

    let delimiter = match args.delimiter.clone().or_else(|| cfg.source.delimiter.clone()) {
        None => b',',
        Some(s) => match s.as_bytes() {
            [b] => *b,
            _ => {
                whatever!("the delimiter must be a single byte character, got {:?}", s)
            }
        },
    };

    let rs = &cfg.report;
    let kind = args
        .report
        .clone()
        .or_else(|| rs.kind.clone())
        .unwrap_or_else(|| "topTypes".to_string());

    let request = match kind.as_str() {
        "preview" => ReportRequest::Preview {
            rows: args.preview_rows.or(rs.preview_rows).unwrap_or(5),
        },
        "topTypes" => {
            let mode = match args
                .mode
                .clone()
                .or_else(|| rs.aggregation_mode.clone())
                .as_deref()
            {
                None | Some("auto") => ModeSelection::Auto,
                Some("percent") => ModeSelection::Fixed(AggregationMode::Percent),
                Some("count") => ModeSelection::Fixed(AggregationMode::Count),
                Some(x) => {
                    whatever!(
                        "unknown aggregation mode: {:?} (expected auto, percent or count)",
                        x
                    )
                }
            };
            ReportRequest::TopTypes {
                mode,
                top_k: args.top.or(rs.top_k),
            }
        }
        "locationProfile" => {
            let location = args
                .location
                .clone()
                .or_else(|| rs.location.clone())
                .context(MissingOptionSnafu {
                    option: "location",
                    report: kind.clone(),
                })?;
            ReportRequest::LocationProfile { location }
        }
        "locations" => ReportRequest::Locations,
        "categoryByLocation" => {
            let s = args
                .mbti_type
                .clone()
                .or_else(|| rs.mbti_type.clone())
                .context(MissingOptionSnafu {
                    option: "mbti-type",
                    report: kind.clone(),
                })?;
            let mbti_type = match MbtiType::parse(&s) {
                Some(t) => t,
                None => {
                    whatever!("unknown MBTI type: {:?}", s)
                }
            };
            ReportRequest::CategoryByLocation { mbti_type }
        }
        "dimensionRatio" => {
            let s = args
                .dimension
                .clone()
                .or_else(|| rs.dimension.clone())
                .context(MissingOptionSnafu {
                    option: "dimension",
                    report: kind.clone(),
                })?;
            let dimension = match Dimension::parse(&s) {
                Some(d) => d,
                None => {
                    whatever!("unknown dimension: {:?} (expected EI, NS, TF or JP)", s)
                }
            };
            let side = match args.side.clone().or_else(|| rs.side.clone()) {
                None => DimensionSide::First,
                Some(letter) => match dimension.side(&letter) {
                    Some(side) => side,
                    None => {
                        whatever!(
                            "side {:?} is not part of dimension {}",
                            letter,
                            dimension.name()
                        )
                    }
                },
            };
            ReportRequest::DimensionRatio { dimension, side }
        }
        x => {
            whatever!(
                "unknown report: {:?} (expected preview, topTypes, locationProfile, locations, categoryByLocation or dimensionRatio)",
                x
            )
        }
    };

    Ok(ResolvedSettings {
        title: cfg.output_settings.title.clone(),
        input_path,
        provider,
        delimiter,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| cfg.source.excel_worksheet_name.clone()),
        request,
        out: args
            .out
            .clone()
            .or_else(|| cfg.output_settings.output_path.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_wins() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "outputSettings": {"title": "World"},
                "source": {"filePath": "data.xlsx", "delimiter": ";"},
                "report": {"kind": "dimensionRatio", "dimension": "EI", "side": "I"}
            }"#,
        )
        .unwrap();
        let args = Args {
            side: Some("e".to_string()),
            ..Default::default()
        };
        let s = resolve_settings(&args, Some(("/data/reports/world.json", &config))).unwrap();
        assert_eq!(s.input_path, "/data/reports/data.xlsx");
        assert_eq!(s.provider, Provider::Xlsx);
        assert_eq!(s.delimiter, b';');
        assert_eq!(s.title, Some("World".to_string()));
        assert_eq!(
            s.request,
            ReportRequest::DimensionRatio {
                dimension: Dimension::EI,
                side: DimensionSide::First
            }
        );
    }

    #[test]
    fn defaults() {
        let args = Args {
            input: Some("countries.csv".to_string()),
            ..Default::default()
        };
        let s = resolve_settings(&args, None).unwrap();
        assert_eq!(s.provider, Provider::Csv);
        assert_eq!(s.delimiter, b',');
        assert_eq!(
            s.request,
            ReportRequest::TopTypes {
                mode: ModeSelection::Auto,
                top_k: None
            }
        );
        assert_eq!(s.out, None);
    }

    #[test]
    fn bad_options() {
        let base = Args {
            input: Some("countries.csv".to_string()),
            ..Default::default()
        };
        let cases = vec![
            Args {
                report: Some("histogram".to_string()),
                ..base.clone()
            },
            Args {
                mode: Some("median".to_string()),
                ..base.clone()
            },
            Args {
                report: Some("locationProfile".to_string()),
                ..base.clone()
            },
            Args {
                report: Some("dimensionRatio".to_string()),
                dimension: Some("EI".to_string()),
                side: Some("N".to_string()),
                ..base.clone()
            },
            Args {
                delimiter: Some("::".to_string()),
                ..base.clone()
            },
            Args {
                input: None,
                ..base.clone()
            },
        ];
        for args in cases {
            assert!(resolve_settings(&args, None).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn config_sections_are_optional() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"source": {"filePath": "a.csv"}}"#).unwrap();
        assert_eq!(config.report, ReportSettings::default());
        assert_eq!(config.output_settings.title, None);
    }
}
