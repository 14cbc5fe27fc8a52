use log::{debug, info, warn};

use attendance_cards::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::cards::config_reader::*;

pub mod config_reader;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum CardsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("No worksheet named {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read an index from {value}"))]
    ParsingIndex { value: String },
    #[snafu(display("Error writing the cards to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The sheet cannot be used: {source}"))]
    Structure { source: StructureError },
    #[snafu(display("Difference detected between the produced cards and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CardsResult<T> = Result<T, CardsError>;

fn metrics_to_json(metrics: &[MetricRow]) -> Vec<JSValue> {
    metrics
        .iter()
        .map(|m| json!({"name": m.name, "value": m.value}))
        .collect()
}

fn output_to_json(out: &PipelineOutput) -> JSValue {
    let mut days: Vec<JSValue> = Vec::new();
    for day in out.days.iter() {
        days.push(json!({
            "date": day.date.format("%Y-%m-%d").to_string(),
            "isAnchor": out.is_anchor(day),
            "lineTM": day.line_tm,
            "lineTT": day.line_tt,
            "absenceIds": day.absence_ids,
            "reportedAbsences": day.reported_absences,
            "metrics": metrics_to_json(&day.metrics),
        }));
    }
    json!({
        "anchor": out.anchor.map(|d| d.format("%Y-%m-%d").to_string()),
        "days": days,
    })
}

fn log_window(out: &PipelineOutput) {
    for day in out.days.iter() {
        let roster = if day.absence_ids.is_empty() {
            NO_VALUE.to_string()
        } else {
            day.absence_ids.join(", ")
        };
        info!(
            "{}{} TM: {} TT: {} absent: {}",
            day.date.format("%Y-%m-%d"),
            if out.is_anchor(day) { " (anchor)" } else { "" },
            day.line_tm,
            day.line_tt,
            roster
        );
    }
}

fn read_reference(path: &str) -> CardsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn write_output(pretty: &str, output_path: &Option<String>) -> CardsResult<()> {
    match output_path.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty);
        }
        Some(p) => {
            info!("Writing cards to {:?}", p);
            fs::write(p, pretty).context(WritingOutputSnafu { path: p })?;
        }
    }
    Ok(())
}

fn read_sheet(settings: &RunSettings) -> CardsResult<PipelineOutput> {
    let res = match settings.provider {
        Provider::Csv => {
            let raw = io_csv::read_csv_sheet(&settings.input_path)?;
            run_pipeline(&raw, settings.today, &settings.options)
        }
        Provider::Xlsx => {
            let matrix = io_xlsx::read_xlsx_sheet(&settings.input_path, &settings.worksheet)?;
            run_pipeline_on_matrix(&matrix, settings.today, &settings.options)
        }
    };
    res.context(StructureSnafu {})
}

/// Runs the whole program and returns the cards that were written.
pub fn run(args: &Args) -> CardsResult<JSValue> {
    let (config, config_dir): (CardsConfig, Option<PathBuf>) = match &args.config {
        Some(p) => {
            info!("Reading configuration {:?}", p);
            let config = read_config(p)?;
            let dir = Path::new(p).parent().map(|d| d.to_path_buf());
            (config, dir)
        }
        None => (CardsConfig::default(), None),
    };
    debug!("config: {:?}", config);

    let settings = resolve_settings(args, &config, config_dir.as_deref())?;
    info!(
        "Sheet {:?} ({:?}), today: {}",
        settings.input_path, settings.provider, settings.today
    );

    let out = read_sheet(&settings)?;
    log_window(&out);

    let result_js = output_to_json(&out);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(&pretty_js, &settings.output_path)?;

    // The reference cards, if provided for comparison
    if let Some(reference_p) = &settings.reference_path {
        let reference = read_reference(reference_p)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference cards");
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
        info!("The cards match the reference {:?}", reference_p);
    }

    Ok(result_js)
}
