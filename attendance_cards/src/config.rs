// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::NaiveDate;

/// A single cell of the sheet, already trimmed.
///
/// The empty string means "no data" and is a perfectly valid value.
pub type Cell = String;

/// The parsed sheet. Rows may have different lengths.
pub type Matrix = Vec<Vec<Cell>>;

/// Placeholder shown for a KPI that has no value for a day.
pub const NO_VALUE: &str = "—";

/// Where the day labels and the metric labels live in the sheet.
///
/// Both indexes are 0-based. The command line program accepts 1-based
/// values and converts them.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SheetLayout {
    pub header_row: usize,
    pub label_column: usize,
}

impl SheetLayout {
    pub const DEFAULT_LAYOUT: SheetLayout = SheetLayout {
        header_row: 0,
        label_column: 0,
    };
}

/// A column of the matrix whose header resolved to a calendar day.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct DateColumn {
    pub column_index: usize,
    pub date: NaiveDate,
}

// ******** Output data structures *********

/// One visible metric line of a day card.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MetricRow {
    /// The label as written in the sheet. Never empty.
    pub name: String,
    pub value: String,
}

/// Everything known about one day.
#[derive(PartialEq, Debug, Clone)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub line_tm: String,
    pub line_tt: String,
    /// Unique identifiers of the absent employees, sorted numerically.
    pub absence_ids: Vec<String>,
    pub metrics: Vec<MetricRow>,
    /// The number written in the aggregate absence row, 0 if missing.
    pub reported_absences: f64,
}

impl DayRecord {
    pub fn empty(date: NaiveDate) -> DayRecord {
        DayRecord {
            date,
            line_tm: NO_VALUE.to_string(),
            line_tt: NO_VALUE.to_string(),
            absence_ids: Vec::new(),
            metrics: Vec::new(),
            reported_absences: 0.0,
        }
    }
}

/// Errors that make the sheet unusable. No partial output is produced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StructureError {
    /// The configured header row does not exist.
    MissingHeaderRow { row: usize, rows: usize },
    /// The header row exists but no cell in it looks like a date.
    NoDateColumns { row: usize },
}

impl Error for StructureError {}

impl Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureError::MissingHeaderRow { row, rows } => write!(
                f,
                "header row {} does not exist (the sheet has {} rows)",
                row + 1,
                rows
            ),
            StructureError::NoDateColumns { row } => {
                write!(f, "no date could be read in header row {}", row + 1)
            }
        }
    }
}

// ********* Configuration **********

/// How the roster of absent identifiers is assembled for a day.
///
/// Historical versions of the sheet used different conventions, so the
/// precedence is a choice rather than a fixed rule.
///
/// - `RowOrder` applies both the explicit roster row and the aggregate row
/// with its continuation rows, in the order they appear. A later row
/// overrides an earlier one, but continuation rows only override when they
/// actually contain identifiers.
///
/// - `ExplicitFirst` uses the explicit roster row whenever it lists at least
/// one identifier and falls back to continuation rows otherwise (no explicit
/// row, or a blank one).
///
/// - `ExplicitOnly` and `ContinuationOnly` ignore the other source.
///
/// - `FixedRange` reads every cell of the day column between two matrix rows
/// (0-based, inclusive), whatever the labels say.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RosterPolicy {
    RowOrder,
    ExplicitFirst,
    ExplicitOnly,
    ContinuationOnly,
    FixedRange { first_row: usize, last_row: usize },
}

/// The keywords recognized in the label column, compared against
/// normalized labels (lowercase, no accents, single spaces).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LabelVocabulary {
    pub line_tm: Vec<String>,
    pub line_tt: Vec<String>,
    /// An explicit roster row contains one of these...
    pub roster_keywords: Vec<String>,
    /// ...and one of these.
    pub absence_keywords: Vec<String>,
    /// Exact labels of the aggregate absence count row.
    pub aggregate_absences: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        LabelVocabulary {
            line_tm: owned(&["linea tm", "line tm"]),
            line_tt: owned(&["linea tt", "line tt"]),
            roster_keywords: owned(&["legajo", "roster"]),
            absence_keywords: owned(&["inasist", "absence"]),
            aggregate_absences: owned(&["inasistencias tm", "absences tm"]),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct PipelineOptions {
    pub layout: SheetLayout,
    /// Number of days kept before the anchor day.
    pub days_back: u32,
    pub roster_policy: RosterPolicy,
    pub vocabulary: LabelVocabulary,
}

impl PipelineOptions {
    pub const DEFAULT_DAYS_BACK: u32 = 6;
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            layout: SheetLayout::DEFAULT_LAYOUT,
            days_back: PipelineOptions::DEFAULT_DAYS_BACK,
            roster_policy: RosterPolicy::RowOrder,
            vocabulary: LabelVocabulary::default(),
        }
    }
}
