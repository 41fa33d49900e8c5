use clap::Parser;

use crate::app::{AppError, AppResult, RunSettings};

/// Ranks the rows of a table with TOPSIS (Technique for Order Preference by Similarity to Ideal Solution).
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The short form: <input> <weights> <impacts> [output]. Use `--` before the
    /// arguments if the impacts start with '-'.
    #[clap(value_parser)]
    pub positional: Vec<String>,

    /// (file path, optional) A JSON file with the settings of the run. Options given on the
    /// command line take precedence over it.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The table of alternatives, in CSV or Excel (xlsx) format. The first row is the header.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. Inferred from the extension of the input file if not provided.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. Defaults to the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (list of comma-separated numbers) One weight per numeric column, for example 1,1,0.5,2
    #[clap(short, long, value_parser, allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// (list of comma-separated values) One impact per numeric column: benefit (or +), cost (or -).
    #[clap(long, value_parser, allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the table with the scores and ranks, in CSV format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) If specified, a summary of the computation (ideal points, distances) is
    /// written in JSON format to the given location.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference CSV file with the expected output. If provided, the program
    /// checks that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> AppResult<RunSettings> {
        let mut settings = RunSettings {
            config: self.config.clone(),
            input: self.input.clone(),
            input_type: self.input_type.clone(),
            excel_worksheet_name: self.excel_worksheet_name.clone(),
            weights: self.weights.clone(),
            impacts: self.impacts.clone(),
            out: self.out.clone(),
            summary: self.summary.clone(),
            reference: self.reference.clone(),
        };
        match self.positional.as_slice() {
            [] => {}
            [input, weights, impacts, rest @ ..] if rest.len() <= 1 => {
                settings.input = Some(input.clone());
                settings.weights = Some(weights.clone());
                settings.impacts = Some(impacts.clone());
                if let Some(out) = rest.first() {
                    settings.out = Some(out.clone());
                }
            }
            other => {
                return Err(AppError::Usage { count: other.len() });
            }
        }
        Ok(settings)
    }
}
