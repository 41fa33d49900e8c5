use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use topsis::*;

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::app::config_reader::*;
use crate::app::io_common::{resolve_path, InputType};

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum AppError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} does not contain a worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The input {path} does not contain a header row"))]
    MissingHeader { path: String },
    #[snafu(display("The input {path} does not contain any data row"))]
    EmptyInput { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error serializing the output table"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing the summary to JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot understand {field} in the configuration: {content}"))]
    ConfigValue { field: String, content: String },
    #[snafu(display("Missing {name}: pass it on the command line or in the configuration file"))]
    MissingArgument { name: String },
    #[snafu(display("Unknown input type {input_type:?}, expected csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Expected <input> <weights> <impacts> [output], got {count} positional arguments"))]
    Usage { count: usize },
    #[snafu(display("Invalid input for the scoring"))]
    Scoring { source: TopsisError },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type AppResult<T> = Result<T, AppError>;

/// Everything needed for one run. Any field can be left to the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunSettings {
    pub config: Option<String>,
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub weights: Option<String>,
    pub impacts: Option<String>,
    /// A file path or `stdout`.
    pub out: Option<String>,
    pub summary: Option<String>,
    pub reference: Option<String>,
}

impl RunSettings {
    // Fills the blanks with the content of the configuration file.
    fn merge_config(&self, config: &TopsisConfig, root: &Path) -> AppResult<RunSettings> {
        Ok(RunSettings {
            config: self.config.clone(),
            input: self
                .input
                .clone()
                .or_else(|| Some(resolve_path(root, &config.input.file_path))),
            input_type: self
                .input_type
                .clone()
                .or_else(|| config.input.provider.clone()),
            excel_worksheet_name: self
                .excel_worksheet_name
                .clone()
                .or_else(|| config.input.excel_worksheet_name.clone()),
            weights: match &self.weights {
                Some(w) => Some(w.clone()),
                None => config.weights_str()?,
            },
            impacts: match &self.impacts {
                Some(i) => Some(i.clone()),
                None => config.impacts_str()?,
            },
            out: self.out.clone().or_else(|| {
                config
                    .output_file
                    .as_ref()
                    .map(|p| resolve_output(root, p))
            }),
            summary: self.summary.clone().or_else(|| {
                config
                    .summary_file
                    .as_ref()
                    .map(|p| resolve_output(root, p))
            }),
            reference: self.reference.clone(),
        })
    }
}

fn resolve_output(root: &Path, p: &str) -> String {
    if p == "stdout" {
        p.to_string()
    } else {
        resolve_path(root, p)
    }
}

fn build_summary_js(scored: &ScoredTable) -> JSValue {
    let criteria: Vec<JSValue> = scored
        .criteria()
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "weight": c.weight,
                "impact": c.impact.to_string(),
                "norm": c.norm,
                "idealBest": c.ideal_best,
                "idealWorst": c.ideal_worst,
            })
        })
        .collect();
    let results: Vec<JSValue> = scored
        .row_scores()
        .iter()
        .enumerate()
        .map(|(idx, rs)| {
            json!({
                "row": idx + 1,
                "label": scored.table().row_label(idx),
                "distBest": rs.dist_best,
                "distWorst": rs.dist_worst,
                "score": rs.score,
                "rank": rs.rank,
            })
        })
        .collect();
    json!({ "criteria": criteria, "results": results })
}

fn summary_text(scored: &ScoredTable) -> AppResult<String> {
    serde_json::to_string_pretty(&build_summary_js(scored)).context(SerializingJsonSnafu {})
}

fn read_table(settings: &RunSettings) -> AppResult<Table> {
    let path = settings.input.clone().context(MissingArgumentSnafu {
        name: "input file",
    })?;
    let input_type = InputType::for_input(&path, settings.input_type.as_deref())?;
    info!("Attempting to read {:?} file {:?}", input_type, path);
    let table = match input_type {
        InputType::Csv => io_csv::read_csv_table(&path)?,
        InputType::Xlsx => {
            io_excel::read_excel_table(&path, settings.excel_worksheet_name.as_deref())?
        }
    };
    if table.num_rows() == 0 {
        return EmptyInputSnafu { path }.fail();
    }
    debug!("read_table: columns: {:?}", table.columns());
    Ok(table)
}

fn write_output(dest: Option<&str>, contents: &str) -> AppResult<()> {
    match dest {
        None | Some("stdout") => {
            print!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing {:?}", path);
            fs::write(path, contents).context(WritingFileSnafu { path })
        }
    }
}

// Line endings and a trailing newline are not significant.
fn normalize_csv_text(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

fn check_reference(reference_path: &str, output: &str) -> AppResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let reference = normalize_csv_text(&reference);
    let output = normalize_csv_text(output);
    if reference != output {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(reference.as_str(), output.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Output matches the reference {:?}", reference_path);
    Ok(())
}

/// Reads the table, scores it and writes the augmented table.
pub fn run_topsis(settings: &RunSettings) -> AppResult<ScoredTable> {
    let settings = match &settings.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .unwrap_or_else(|| Path::new(""));
            settings.merge_config(&config, root)?
        }
        None => settings.clone(),
    };
    debug!("run_topsis: settings: {:?}", settings);

    let weights_s = settings
        .weights
        .clone()
        .context(MissingArgumentSnafu { name: "weights" })?;
    let impacts_s = settings
        .impacts
        .clone()
        .context(MissingArgumentSnafu { name: "impacts" })?;

    let table = read_table(&settings)?;

    let weights = parse_weights(&weights_s).context(ScoringSnafu {})?;
    let impacts: Vec<&str> = impacts_s.split(',').map(|s| s.trim()).collect();
    let scored = score_symbols(&table, &weights, &impacts).context(ScoringSnafu {})?;

    let output = io_csv::write_csv_table(&scored)?;
    write_output(settings.out.as_deref(), &output)?;

    if let Some(summary_path) = &settings.summary {
        let pretty = summary_text(&scored)?;
        write_output(Some(summary_path.as_str()), &pretty)?;
    }

    if let Some(reference_path) = &settings.reference {
        check_reference(reference_path, &output)?;
    }

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    const PHONES: &str = "Model,Price,Storage,Camera,Looks\n\
                          M1,250,16,12,5\n\
                          M2,200,16,8,3\n\
                          M3,300,32,16,4\n\
                          M4,275,32,8,4\n";

    fn make_temp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        dir.push(format!("topsis_rank_app_{}_{}", std::process::id(), id));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> String {
        let p = dir.join(name);
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    fn phone_settings(dir: &Path) -> RunSettings {
        RunSettings {
            input: Some(write_file(dir, "phones.csv", PHONES)),
            weights: Some("0.25,0.25,0.25,0.25".to_string()),
            impacts: Some("-,+,+,+".to_string()),
            out: Some(dir.join("out.csv").display().to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn csv_end_to_end() {
        let dir = make_temp_dir();
        let settings = phone_settings(&dir);
        let scored = run_topsis(&settings).unwrap();
        assert_eq!(scored.ranks(), vec![3, 4, 1, 2]);

        let out = fs::read_to_string(dir.join("out.csv")).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Model,Price,Storage,Camera,Looks,Topsis Score,Rank");
        assert!(lines[1].starts_with("M1,250,16,12,5,0.45866"));
        assert!(lines[1].ends_with(",3"));
        assert!(lines[3].starts_with("M3,300,32,16,4,"));
        assert!(lines[3].ends_with(",1"));
    }

    #[test]
    fn reference_comparison() {
        let dir = make_temp_dir();
        let mut settings = phone_settings(&dir);
        run_topsis(&settings).unwrap();

        // The first output is a valid reference for the same run.
        let expected = fs::read_to_string(dir.join("out.csv")).unwrap();
        settings.reference = Some(write_file(&dir, "expected.csv", &expected));
        assert!(run_topsis(&settings).is_ok());

        let wrong = expected.replacen("M1,", "M9,", 1);
        settings.reference = Some(write_file(&dir, "wrong.csv", &wrong));
        assert!(matches!(
            run_topsis(&settings),
            Err(AppError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn config_file() {
        let dir = make_temp_dir();
        write_file(&dir, "phones.csv", PHONES);
        let config = r#"{
            "input": {"provider": "csv", "filePath": "phones.csv"},
            "weights": [1, 1, 1, 1],
            "impacts": ["cost", "benefit", "benefit", "benefit"],
            "outputFile": "result.csv",
            "summaryFile": "summary.json"
        }"#;
        let settings = RunSettings {
            config: Some(write_file(&dir, "run.json", config)),
            ..Default::default()
        };
        let scored = run_topsis(&settings).unwrap();
        assert_eq!(scored.ranks(), vec![3, 4, 1, 2]);
        assert!(dir.join("result.csv").exists());

        let summary: JSValue =
            serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["criteria"].as_array().unwrap().len(), 4);
        assert_eq!(summary["criteria"][0]["impact"], json!("cost"));
        assert_eq!(summary["results"][2]["label"], json!("M3"));
        assert_eq!(summary["results"][2]["rank"], json!(1));
    }

    #[test]
    fn command_line_overrides_config() {
        let dir = make_temp_dir();
        write_file(&dir, "phones.csv", PHONES);
        let config = r#"{
            "input": {"filePath": "phones.csv"},
            "weights": "1,1,1,1",
            "impacts": "+,+,+,+"
        }"#;
        let settings = RunSettings {
            config: Some(write_file(&dir, "run.json", config)),
            impacts: Some("-,+,+,+".to_string()),
            out: Some(dir.join("out.csv").display().to_string()),
            ..Default::default()
        };
        let scored = run_topsis(&settings).unwrap();
        assert_eq!(scored.criteria()[0].impact, Impact::Cost);
    }

    #[test]
    fn weight_mismatch_is_reported() {
        let dir = make_temp_dir();
        let mut settings = phone_settings(&dir);
        settings.weights = Some("1,1,1".to_string());
        let res = run_topsis(&settings);
        assert!(matches!(
            res,
            Err(AppError::Scoring {
                source: TopsisError::DimensionMismatch { .. }
            })
        ));
        assert!(!dir.join("out.csv").exists());
    }

    #[test]
    fn bad_weight_token() {
        let dir = make_temp_dir();
        let mut settings = phone_settings(&dir);
        settings.weights = Some("1,a,1,1".to_string());
        assert!(matches!(
            run_topsis(&settings),
            Err(AppError::Scoring {
                source: TopsisError::InvalidWeight { position: 2, .. }
            })
        ));
    }

    #[test]
    fn missing_impacts() {
        let dir = make_temp_dir();
        let mut settings = phone_settings(&dir);
        settings.impacts = None;
        assert!(matches!(
            run_topsis(&settings),
            Err(AppError::MissingArgument { .. })
        ));
    }

    #[test]
    fn summary_serialization() {
        let dir = make_temp_dir();
        let scored = run_topsis(&phone_settings(&dir)).unwrap();
        let text = summary_text(&scored).unwrap();
        let js: JSValue = serde_json::from_str(&text).unwrap();
        assert_eq!(js["results"].as_array().unwrap().len(), 4);

        let source = serde_json::from_str::<JSValue>("{").unwrap_err();
        let err = AppError::SerializingJson { source };
        assert_eq!(err.to_string(), "Error serializing the summary to JSON");
    }

    #[test]
    fn header_only_input() {
        let dir = make_temp_dir();
        let mut settings = phone_settings(&dir);
        settings.input = Some(write_file(&dir, "empty.csv", "Model,Price,Storage\n"));
        assert!(matches!(
            run_topsis(&settings),
            Err(AppError::EmptyInput { .. })
        ));
    }
}
