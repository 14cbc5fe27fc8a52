use clap::Parser;

/// Builds the window of daily attendance cards from an exported spreadsheet.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the sheet. All the other options
    /// override the values found in this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected cards in JSON format. If provided, attcards will
    /// check that the produced cards match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the cards will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The exported sheet. Setting this option overrides the file path that may be specified
    /// in the configuration file.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 1) The row holding the day labels, starting at 1.
    #[clap(long, value_parser)]
    pub header_row: Option<String>,

    /// (default 1 or A) The column holding the metric labels, as a number starting at 1 or a column letter.
    #[clap(long, value_parser)]
    pub label_column: Option<String>,

    /// (default 6) The number of days shown before the most recent day.
    #[clap(long, value_parser)]
    pub days_back: Option<u32>,

    /// (default rowOrder) How the roster of absences is assembled: rowOrder, explicitFirst,
    /// explicitOnly, continuationOnly or fixedRange.
    #[clap(long, value_parser)]
    pub roster_policy: Option<String>,

    /// With the fixedRange policy, the first row of the roster (starting at 1).
    #[clap(long, value_parser)]
    pub roster_first_row: Option<String>,

    /// With the fixedRange policy, the last row of the roster (starting at 1, inclusive).
    #[clap(long, value_parser)]
    pub roster_last_row: Option<String>,

    /// (YYYY-MM-DD, default: the current day) The day used to anchor the window.
    #[clap(long, value_parser)]
    pub today: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
