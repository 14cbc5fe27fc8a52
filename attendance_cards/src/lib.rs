mod config;
pub mod builder;
pub mod dates;
pub mod ids;
pub mod labels;
pub mod manual;
pub mod tabular;
pub mod window;

use chrono::{Datelike, NaiveDate};
use log::{debug, info};

pub use crate::config::*;

/// The window of day records, ready to be rendered.
#[derive(PartialEq, Debug, Clone)]
pub struct PipelineOutput {
    /// The right edge of the window, if any day is on or before today.
    pub anchor: Option<NaiveDate>,
    /// Most recent first.
    pub days: Vec<DayRecord>,
}

impl PipelineOutput {
    pub fn is_anchor(&self, record: &DayRecord) -> bool {
        self.anchor == Some(record.date)
    }
}

/// Runs the whole extraction on the exported text of the sheet.
///
/// `today` is only used to place the window and to complete day labels
/// written without a year. The same inputs always give the same output.
///
/// ```
/// use attendance_cards::{run_pipeline, PipelineOptions};
/// use chrono::NaiveDate;
///
/// let raw = "Metric,08/01/2024,09/01/2024\nLinea TM,10,12\nInasistencias TM,1,0\n,1001,\n";
/// let today = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
/// let out = run_pipeline(raw, today, &PipelineOptions::default())?;
///
/// assert_eq!(out.anchor, Some(today));
/// assert_eq!(out.days.len(), 2);
/// assert_eq!(out.days[1].absence_ids, vec!["1001".to_string()]);
/// # Ok::<(), attendance_cards::StructureError>(())
/// ```
pub fn run_pipeline(
    raw: &str,
    today: NaiveDate,
    options: &PipelineOptions,
) -> Result<PipelineOutput, StructureError> {
    let matrix = tabular::parse(raw);
    run_pipeline_on_matrix(&matrix, today, options)
}

/// Same as [`run_pipeline`], for a sheet that is already split in cells.
pub fn run_pipeline_on_matrix(
    matrix: &Matrix,
    today: NaiveDate,
    options: &PipelineOptions,
) -> Result<PipelineOutput, StructureError> {
    info!(
        "Processing a sheet of {} rows, layout: {:?}, roster policy: {:?}",
        matrix.len(),
        options.layout,
        options.roster_policy
    );

    let columns = dates::detect_date_columns(matrix, &options.layout, today.year())?;
    info!("Found {} day columns", columns.len());

    let records = builder::build_records(matrix, &columns, options);
    for r in records.iter() {
        debug!(
            "run_pipeline: {} TM: {} TT: {} absent: {:?} metrics: {}",
            r.date,
            r.line_tm,
            r.line_tt,
            r.absence_ids,
            r.metrics.len()
        );
    }

    let anchor = window::anchor_date(&records, today);
    let days = window::select_window(&records, today, options.days_back);
    match anchor {
        Some(a) => info!("Anchor day {}: {} days in the window", a, days.len()),
        None => info!("No day on or before {}, the window is empty", today),
    }
    Ok(PipelineOutput { anchor, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SHEET: &str = "Métrica,Lunes 08/01,Martes 09/01,Miércoles 10/01,Jueves 11/01
Línea TM,10,12,11,
Línea TT,8,9,,
Legajos inasistencia,,,,
Productividad,\"95,5%\",90%,91%,
Inasistencias TM,2,0,1,
,\"1002, 1001\",,1500,
,1001,,,
Horas extra,6:26,,,
";

    #[test]
    fn full_sheet() {
        init_logger();
        let out = run_pipeline(SHEET, ymd(2024, 1, 10), &PipelineOptions::default()).unwrap();
        assert_eq!(out.anchor, Some(ymd(2024, 1, 10)));
        let days: Vec<NaiveDate> = out.days.iter().map(|d| d.date).collect();
        assert_eq!(days, vec![ymd(2024, 1, 10), ymd(2024, 1, 9), ymd(2024, 1, 8)]);

        let monday = &out.days[2];
        assert_eq!(monday.line_tm, "10");
        assert_eq!(monday.line_tt, "8");
        assert_eq!(monday.absence_ids, vec!["1001", "1002"]);
        assert_eq!(monday.reported_absences, 2.0);
        assert_eq!(
            monday.metrics,
            vec![
                MetricRow {
                    name: "Productividad".to_string(),
                    value: "95,5%".to_string()
                },
                MetricRow {
                    name: "Horas extra".to_string(),
                    value: "6:26".to_string()
                },
            ]
        );

        let wednesday = &out.days[0];
        assert!(out.is_anchor(wednesday));
        assert!(!out.is_anchor(monday));
        assert_eq!(wednesday.line_tt, NO_VALUE);
        assert_eq!(wednesday.absence_ids, vec!["1500"]);
    }

    #[test]
    fn same_input_same_output() {
        let today = ymd(2024, 1, 10);
        let options = PipelineOptions::default();
        let a = run_pipeline(SHEET, today, &options).unwrap();
        let b = run_pipeline(SHEET, today, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn structure_errors_stop_the_pipeline() {
        let today = ymd(2024, 1, 10);
        assert_eq!(
            run_pipeline("", today, &PipelineOptions::default()),
            Err(StructureError::NoDateColumns { row: 0 })
        );
        let options = PipelineOptions {
            layout: SheetLayout {
                header_row: 12,
                label_column: 0,
            },
            ..PipelineOptions::default()
        };
        assert_eq!(
            run_pipeline(SHEET, today, &options),
            Err(StructureError::MissingHeaderRow { row: 12, rows: 10 })
        );
    }

    #[test]
    fn label_column_can_be_elsewhere() {
        let raw = "08/01/2024,Metric\n7,Linea TM\n";
        let options = PipelineOptions {
            layout: SheetLayout {
                header_row: 0,
                label_column: 1,
            },
            ..PipelineOptions::default()
        };
        let out = run_pipeline(raw, ymd(2024, 1, 8), &options).unwrap();
        assert_eq!(out.days.len(), 1);
        assert_eq!(out.days[0].line_tm, "7");
    }
}
