use clap::Parser;

/// This is a program to rank and compare MBTI type distributions across countries.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the report. The other options
    /// override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected output in JSON format. If provided, mbtistats will
    /// check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The table to read. Setting this option overrides the path that may be specified with the
    /// --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default ,) The delimiter of the csv input. It must be a single character.
    #[clap(long, value_parser)]
    pub delimiter: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    /// It is required if the workbook has more than one worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Report arguments
    /// (default topTypes) The report to compute: preview, topTypes, locationProfile, locations,
    /// categoryByLocation or dimensionRatio.
    #[clap(long, value_parser)]
    pub report: Option<String>,

    /// (auto, percent or count; default auto) How to aggregate the types in the topTypes report.
    #[clap(long, value_parser)]
    pub mode: Option<String>,

    /// (1 to 16, default 10) The number of types in the topTypes report.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// The location of the locationProfile report, as written in the location column.
    #[clap(long, value_parser)]
    pub location: Option<String>,

    /// The type of the categoryByLocation report, for example INTJ.
    #[clap(long, value_parser)]
    pub mbti_type: Option<String>,

    /// (EI, NS, TF or JP) The dimension of the dimensionRatio report.
    #[clap(long, value_parser)]
    pub dimension: Option<String>,

    /// (one letter of the dimension, default the first one) The side of the dimensionRatio report.
    #[clap(long, value_parser)]
    pub side: Option<String>,

    /// (default 5) The number of rows in the preview report.
    #[clap(long, value_parser)]
    pub preview_rows: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
