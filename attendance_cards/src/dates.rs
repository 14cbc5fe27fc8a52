use chrono::NaiveDate;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DateColumn, Matrix, SheetLayout, StructureError};

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());
static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap());
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})\b").unwrap());

/// Reads a calendar day out of a header label.
///
/// Tried in order: `YYYY-MM-DD`, then `DD/MM/YYYY` or `DD/MM/YY` (years
/// below 100 are in the 2000s), then `DD/MM` in `default_year`. The pattern
/// may appear anywhere in the label ("Lunes 03/02" works). Days that do not
/// exist in the calendar are rejected.
pub fn parse_day_label(label: &str, default_year: i32) -> Option<NaiveDate> {
    iso_date(label)
        .or_else(|| day_month_year(label))
        .or_else(|| day_month(label, default_year))
}

fn iso_date(label: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(label)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn day_month_year(label: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR.captures(label)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let raw_year: i32 = caps[3].parse().ok()?;
    let year = if raw_year < 100 {
        2000 + raw_year
    } else {
        raw_year
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn day_month(label: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = DAY_MONTH.captures(label)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(default_year, month, day)
}

/// Finds the columns of the header row that name a day, left to right.
///
/// The label column is never considered. Two columns may carry the same
/// day; they are kept apart.
pub fn detect_date_columns(
    matrix: &Matrix,
    layout: &SheetLayout,
    default_year: i32,
) -> Result<Vec<DateColumn>, StructureError> {
    let header = matrix
        .get(layout.header_row)
        .ok_or(StructureError::MissingHeaderRow {
            row: layout.header_row,
            rows: matrix.len(),
        })?;
    debug!("detect_date_columns: header: {:?}", header);

    let columns: Vec<DateColumn> = header
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != layout.label_column)
        .filter_map(|(idx, label)| {
            parse_day_label(label, default_year).map(|date| DateColumn {
                column_index: idx,
                date,
            })
        })
        .collect();

    if columns.is_empty() {
        return Err(StructureError::NoDateColumns {
            row: layout.header_row,
        });
    }
    debug!("detect_date_columns: {:?}", columns);
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header(cells: &[&str]) -> Matrix {
        vec![cells.iter().map(|c| c.to_string()).collect()]
    }

    #[test]
    fn detects_mixed_header() {
        let matrix = header(&["Metric", "01/02", "not-a-date", "2026-02-03"]);
        let cols = detect_date_columns(&matrix, &SheetLayout::DEFAULT_LAYOUT, 2025).unwrap();
        assert_eq!(
            cols,
            vec![
                DateColumn {
                    column_index: 1,
                    date: ymd(2025, 2, 1)
                },
                DateColumn {
                    column_index: 3,
                    date: ymd(2026, 2, 3)
                },
            ]
        );
    }

    #[test]
    fn label_precedence_and_years() {
        assert_eq!(parse_day_label("Lunes 03/02/24", 2030), Some(ymd(2024, 2, 3)));
        assert_eq!(parse_day_label("03/02/2024", 2030), Some(ymd(2024, 2, 3)));
        assert_eq!(parse_day_label("3/2", 2030), Some(ymd(2030, 2, 3)));
        // The ISO form wins even when a slash date is also present.
        assert_eq!(
            parse_day_label("01/01 (2024-05-06)", 2030),
            Some(ymd(2024, 5, 6))
        );
    }

    #[test]
    fn rejects_impossible_days() {
        assert_eq!(parse_day_label("31/02", 2024), None);
        assert_eq!(parse_day_label("2024-13-01", 2024), None);
        assert_eq!(parse_day_label("6:26", 2024), None);
        assert_eq!(parse_day_label("", 2024), None);
    }

    #[test]
    fn label_column_is_skipped() {
        let matrix = header(&["01/02", "02/02"]);
        let cols = detect_date_columns(&matrix, &SheetLayout::DEFAULT_LAYOUT, 2024).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].column_index, 1);
    }

    #[test]
    fn duplicate_days_are_kept() {
        let matrix = header(&["", "01/02", "01/02/2024"]);
        let cols = detect_date_columns(&matrix, &SheetLayout::DEFAULT_LAYOUT, 2024).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].date, cols[1].date);
    }

    #[test]
    fn structure_errors() {
        let layout = SheetLayout {
            header_row: 3,
            label_column: 0,
        };
        assert_eq!(
            detect_date_columns(&header(&["a"]), &layout, 2024),
            Err(StructureError::MissingHeaderRow { row: 3, rows: 1 })
        );
        assert_eq!(
            detect_date_columns(
                &header(&["Metric", "total", "x"]),
                &SheetLayout::DEFAULT_LAYOUT,
                2024
            ),
            Err(StructureError::NoDateColumns { row: 0 })
        );
    }
}
