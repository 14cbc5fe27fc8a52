use crate::cards::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceSettings {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayoutSettings {
    #[serde(rename = "headerRowIndex")]
    pub header_row_index: Option<JSValue>,
    #[serde(rename = "labelColumnIndex")]
    pub label_column_index: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct WindowSettings {
    #[serde(rename = "daysBack")]
    pub days_back: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleSettings {
    #[serde(rename = "rosterPolicy")]
    pub roster_policy: Option<String>,
    #[serde(rename = "rosterFirstRow")]
    pub roster_first_row: Option<JSValue>,
    #[serde(rename = "rosterLastRow")]
    pub roster_last_row: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct CardsConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub rules: RuleSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

pub fn read_config(path: &str) -> CardsResult<CardsConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: CardsConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl Provider {
    fn from_name(name: &str) -> CardsResult<Provider> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => {
                whatever!("Provider not implemented {:?}", x)
            }
        }
    }

    fn from_path(path: &Path) -> Provider {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
        {
            Some(e) if e == "xlsx" || e == "xlsm" => Provider::Xlsx,
            _ => Provider::Csv,
        }
    }
}

/// Everything needed for one run, after merging the configuration file
/// and the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: PathBuf,
    pub provider: Provider,
    pub worksheet: Option<String>,
    pub options: PipelineOptions,
    pub today: NaiveDate,
    pub output_path: Option<String>,
    pub reference_path: Option<String>,
}

/// Reads a 1-based index: a number, a string holding a number, or Excel
/// column letters ("A" is 1, "AB" is 28).
pub fn read_js_int(x: &JSValue) -> CardsResult<usize> {
    match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize).context(ParsingIndexSnafu {
            value: n.to_string(),
        }),
        JSValue::String(s) => read_index_str(s),
        _ => None.context(ParsingIndexSnafu {
            value: x.to_string(),
        }),
    }
}

fn read_index_str(s: &str) -> CardsResult<usize> {
    let s = s.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
        let mut res: usize = 0;
        for c in s.to_ascii_uppercase().chars() {
            res = res
                .checked_mul(26)
                .and_then(|r| r.checked_add((c as usize) - ('A' as usize) + 1))
                .context(ParsingIndexSnafu { value: s })?;
        }
        return Ok(res);
    }
    s.parse::<usize>()
        .ok()
        .context(ParsingIndexSnafu { value: s })
}

fn zero_based(x: usize, what: &str) -> CardsResult<usize> {
    if x == 0 {
        whatever!("{} starts at 1, got 0", what)
    }
    Ok(x - 1)
}

/// The 0-based index given on the command line or else in the file.
fn pick_index(
    cli: &Option<String>,
    file: &Option<JSValue>,
    default: usize,
    what: &str,
) -> CardsResult<usize> {
    let one_based = match (cli, file) {
        (Some(s), _) => read_index_str(s)?,
        (None, Some(js)) => read_js_int(js)?,
        (None, None) => default,
    };
    zero_based(one_based, what)
}

fn read_days_back(args: &Args, config: &CardsConfig) -> CardsResult<u32> {
    let days_back = match (args.days_back, &config.window.days_back) {
        (Some(d), _) => d,
        (None, Some(js)) => u32::try_from(read_js_int(js)?)
            .ok()
            .context(ParsingIndexSnafu {
                value: js.to_string(),
            })?,
        (None, None) => PipelineOptions::DEFAULT_DAYS_BACK,
    };
    if days_back == 0 {
        whatever!("daysBack must be at least 1")
    }
    Ok(days_back)
}

fn read_roster_policy(args: &Args, config: &CardsConfig) -> CardsResult<RosterPolicy> {
    let name = args
        .roster_policy
        .clone()
        .or_else(|| config.rules.roster_policy.clone())
        .unwrap_or_else(|| "rowOrder".to_string());
    let policy = match name.as_str() {
        "rowOrder" => RosterPolicy::RowOrder,
        "explicitFirst" => RosterPolicy::ExplicitFirst,
        "explicitOnly" => RosterPolicy::ExplicitOnly,
        "continuationOnly" => RosterPolicy::ContinuationOnly,
        "fixedRange" => {
            let first = args.roster_first_row.clone();
            let last = args.roster_last_row.clone();
            let file_first = config.rules.roster_first_row.clone();
            let file_last = config.rules.roster_last_row.clone();
            if (first.is_none() && file_first.is_none()) || (last.is_none() && file_last.is_none())
            {
                whatever!("The fixedRange roster policy needs rosterFirstRow and rosterLastRow")
            }
            let first_row = pick_index(&first, &file_first, 1, "rosterFirstRow")?;
            let last_row = pick_index(&last, &file_last, 1, "rosterLastRow")?;
            if last_row < first_row {
                whatever!(
                    "rosterLastRow ({}) is before rosterFirstRow ({})",
                    last_row + 1,
                    first_row + 1
                )
            }
            RosterPolicy::FixedRange {
                first_row,
                last_row,
            }
        }
        x => {
            whatever!("Unknown roster policy {:?}", x)
        }
    };
    Ok(policy)
}

fn read_today(args: &Args) -> CardsResult<NaiveDate> {
    match &args.today {
        Some(s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(d) => Ok(d),
            Err(e) => {
                whatever!("Could not read --today {:?}: {}", s, e)
            }
        },
        None => Ok(Local::now().date_naive()),
    }
}

/// Merges the command line with the (optional) configuration file.
///
/// `config_dir` is the directory of the configuration file; the input path
/// found in the file is relative to it.
pub fn resolve_settings(
    args: &Args,
    config: &CardsConfig,
    config_dir: Option<&Path>,
) -> CardsResult<RunSettings> {
    let input_path: PathBuf = match (&args.input, &config.source.file_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => match config_dir {
            Some(dir) => dir.join(p),
            None => PathBuf::from(p),
        },
        (None, None) => {
            whatever!("No input file: use --input or source.filePath")
        }
    };

    let provider = match args
        .input_type
        .clone()
        .or_else(|| config.source.provider.clone())
    {
        Some(name) => Provider::from_name(&name)?,
        None => Provider::from_path(&input_path),
    };

    let layout = SheetLayout {
        header_row: pick_index(
            &args.header_row,
            &config.layout.header_row_index,
            1,
            "headerRowIndex",
        )?,
        label_column: pick_index(
            &args.label_column,
            &config.layout.label_column_index,
            1,
            "labelColumnIndex",
        )?,
    };

    let options = PipelineOptions {
        layout,
        days_back: read_days_back(args, config)?,
        roster_policy: read_roster_policy(args, config)?,
        vocabulary: LabelVocabulary::default(),
    };

    Ok(RunSettings {
        input_path,
        provider,
        worksheet: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.source.excel_worksheet_name.clone()),
        options,
        today: read_today(args)?,
        output_path: args
            .out
            .clone()
            .or_else(|| config.output.output_path.clone()),
        reference_path: args.reference.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args_with_input() -> Args {
        Args {
            input: Some("sheet.csv".to_string()),
            today: Some("2024-01-10".to_string()),
            ..Args::default()
        }
    }

    #[test]
    fn indexes() {
        assert_eq!(read_js_int(&json!(3)).unwrap(), 3);
        assert_eq!(read_js_int(&json!("12")).unwrap(), 12);
        assert_eq!(read_js_int(&json!("A")).unwrap(), 1);
        assert_eq!(read_js_int(&json!("c")).unwrap(), 3);
        assert_eq!(read_js_int(&json!("AB")).unwrap(), 28);
        assert!(read_js_int(&json!("1a")).is_err());
        assert!(read_js_int(&json!(-1)).is_err());
        assert!(read_js_int(&json!(null)).is_err());
    }

    #[test]
    fn defaults_without_config() {
        let s = resolve_settings(&args_with_input(), &CardsConfig::default(), None).unwrap();
        assert_eq!(s.provider, Provider::Csv);
        assert_eq!(s.options, PipelineOptions::default());
        assert_eq!(s.today, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(s.output_path, None);
    }

    #[test]
    fn config_file_and_overrides() {
        let config: CardsConfig = serde_json::from_value(json!({
            "source": { "filePath": "book.xlsx", "excelWorksheetName": "Enero" },
            "layout": { "headerRowIndex": "2", "labelColumnIndex": "B" },
            "window": { "daysBack": 7 },
            "rules": { "rosterPolicy": "fixedRange", "rosterFirstRow": 5, "rosterLastRow": 9 },
            "output": { "outputPath": "cards.json" }
        }))
        .unwrap();
        let args = Args {
            today: Some("2024-01-10".to_string()),
            header_row: Some("3".to_string()),
            ..Args::default()
        };
        let s = resolve_settings(&args, &config, Some(Path::new("/data"))).unwrap();
        assert_eq!(s.input_path, PathBuf::from("/data/book.xlsx"));
        assert_eq!(s.provider, Provider::Xlsx);
        assert_eq!(s.worksheet, Some("Enero".to_string()));
        assert_eq!(
            s.options.layout,
            SheetLayout {
                header_row: 2,
                label_column: 1
            }
        );
        assert_eq!(s.options.days_back, 7);
        assert_eq!(
            s.options.roster_policy,
            RosterPolicy::FixedRange {
                first_row: 4,
                last_row: 8
            }
        );
        assert_eq!(s.output_path, Some("cards.json".to_string()));
    }

    #[test]
    fn invalid_settings() {
        let with = |f: fn(&mut Args)| {
            let mut args = args_with_input();
            f(&mut args);
            resolve_settings(&args, &CardsConfig::default(), None)
        };
        assert!(with(|a| a.header_row = Some("0".to_string())).is_err());
        assert!(with(|a| a.days_back = Some(0)).is_err());
        assert!(with(|a| a.roster_policy = Some("newest".to_string())).is_err());
        assert!(with(|a| a.roster_policy = Some("fixedRange".to_string())).is_err());
        assert!(with(|a| a.today = Some("10/01/2024".to_string())).is_err());
        assert!(with(|a| a.input_type = Some("ods".to_string())).is_err());
        assert!(with(|a| a.input = None).is_err());
        let too_many_days: CardsConfig =
            serde_json::from_value(json!({ "window": { "daysBack": 4294967297u64 } })).unwrap();
        assert!(matches!(
            resolve_settings(&args_with_input(), &too_many_days, None),
            Err(CardsError::ParsingIndex { .. })
        ));
        assert!(with(|a| {
            a.roster_policy = Some("fixedRange".to_string());
            a.roster_first_row = Some("9".to_string());
            a.roster_last_row = Some("3".to_string());
        })
        .is_err());
    }
}
