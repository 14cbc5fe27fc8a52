use std::collections::BTreeSet;

use log::{debug, warn};

pub use crate::config::*;
use crate::ids::{extract_ids, normalize_ids, parse_count};
use crate::labels::{classify, is_suppressed, label_rules, normalize_label, LabelRule, RowAction};
use crate::tabular::cell;

type IdSet = BTreeSet<String>;

/// The candidate rosters met while scanning one day column. The policy
/// decides at the end which one becomes the roster.
#[derive(Default, Debug)]
struct RosterSources {
    // Last result from either source, in row order.
    latest: IdSet,
    explicit: Option<IdSet>,
    continued: Option<IdSet>,
}

impl RosterSources {
    fn explicit_row(&mut self, ids: IdSet) {
        self.latest = ids.clone();
        self.explicit = Some(ids);
    }

    fn continuation_rows(&mut self, ids: IdSet) {
        // An empty block never clears what an explicit row already gave.
        if !ids.is_empty() {
            self.latest = ids.clone();
            self.continued = Some(ids);
        }
    }

    fn resolve(self, policy: RosterPolicy, matrix: &Matrix, column: usize) -> IdSet {
        match policy {
            RosterPolicy::RowOrder => self.latest,
            RosterPolicy::ExplicitFirst => self
                .explicit
                .filter(|ids| !ids.is_empty())
                .or(self.continued)
                .unwrap_or_default(),
            RosterPolicy::ExplicitOnly => self.explicit.unwrap_or_default(),
            RosterPolicy::ContinuationOnly => self.continued.unwrap_or_default(),
            RosterPolicy::FixedRange {
                first_row,
                last_row,
            } => (first_row..=last_row)
                .take_while(|row| *row < matrix.len())
                .flat_map(|row| extract_ids(cell(matrix, row, column)))
                .collect(),
        }
    }
}

fn kpi_value(value: &str) -> String {
    if value.is_empty() {
        NO_VALUE.to_string()
    } else {
        value.to_string()
    }
}

/// Reads the unlabelled rows starting at `start`.
///
/// Returns the identifiers found in the day column and the index of the
/// first row that was not consumed.
fn collect_continuation(
    matrix: &Matrix,
    start: usize,
    label_column: usize,
    column: usize,
) -> (IdSet, usize) {
    let mut collected = IdSet::new();
    let mut idx = start;
    while idx < matrix.len() && cell(matrix, idx, label_column).is_empty() {
        collected.extend(extract_ids(cell(matrix, idx, column)));
        idx += 1;
    }
    (collected, idx)
}

fn build_day(
    matrix: &Matrix,
    column: &DateColumn,
    options: &PipelineOptions,
    rules: &[LabelRule],
) -> DayRecord {
    let layout = options.layout;
    let mut record = DayRecord::empty(column.date);
    let mut sources = RosterSources::default();

    let mut idx = layout.header_row + 1;
    while idx < matrix.len() {
        let label = cell(matrix, idx, layout.label_column);
        let value = cell(matrix, idx, column.column_index);
        let mut next = idx + 1;

        // Unlabelled rows only matter as continuation rows.
        if label.is_empty() {
            idx = next;
            continue;
        }

        let normalized = normalize_label(label);
        match classify(rules, &normalized).map(|r| r.action) {
            Some(RowAction::LineTm) => {
                record.line_tm = kpi_value(value);
            }
            Some(RowAction::LineTt) => {
                record.line_tt = kpi_value(value);
            }
            Some(RowAction::ExplicitRoster) => {
                sources.explicit_row(extract_ids(value));
            }
            Some(RowAction::AggregateAbsences) => {
                record.reported_absences = parse_count(value);
                let (collected, after) =
                    collect_continuation(matrix, idx + 1, layout.label_column, column.column_index);
                debug!(
                    "build_day: {}: {:?} reported {} absences, rows {}..{} list {:?}",
                    column.date, label, record.reported_absences, idx + 1, after, collected
                );
                if collected.is_empty() && record.reported_absences > 0.0 {
                    debug!(
                        "build_day: {}: absences reported but no identifier listed",
                        column.date
                    );
                }
                sources.continuation_rows(collected);
                next = after;
            }
            None => {}
        }

        if !is_suppressed(rules, &normalized) {
            record.metrics.push(MetricRow {
                name: label.to_string(),
                value: value.to_string(),
            });
        }
        idx = next;
    }

    let roster = sources.resolve(options.roster_policy, matrix, column.column_index);
    record.absence_ids = normalize_ids(roster);
    record
}

/// Builds one record per date column, in the order of `date_columns`.
///
/// Each column is scanned on its own, so the rows consumed as continuation
/// rows for one day have no effect on the other days.
pub fn build_records(
    matrix: &Matrix,
    date_columns: &[DateColumn],
    options: &PipelineOptions,
) -> Vec<DayRecord> {
    let rules = label_rules(&options.vocabulary);
    let label_column = options.layout.label_column;
    let has_labels = matrix
        .iter()
        .enumerate()
        .skip(options.layout.header_row + 1)
        .any(|(idx, _)| !cell(matrix, idx, label_column).is_empty());
    if !has_labels {
        warn!(
            "build_records: no label found in column {} below the header, all days will be empty",
            label_column + 1
        );
    }

    date_columns
        .iter()
        .map(|column| build_day(matrix, column, options, &rules))
        .collect()
}
