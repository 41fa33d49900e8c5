use crate::app::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// `csv` or `xlsx`. Inferred from the file extension if missing.
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopsisConfig {
    pub input: FileSource,
    pub weights: Option<JSValue>,
    pub impacts: Option<JSValue>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
}

impl TopsisConfig {
    /// The weights as a comma-separated list.
    pub fn weights_str(&self) -> AppResult<Option<String>> {
        read_js_list("weights", &self.weights)
    }

    /// The impacts as a comma-separated list.
    pub fn impacts_str(&self) -> AppResult<Option<String>> {
        read_js_list("impacts", &self.impacts)
    }
}

pub fn read_config(path: &str) -> AppResult<TopsisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

// Accepts either "a,b,c" or ["a", "b", 3].
fn read_js_list(field: &str, x: &Option<JSValue>) -> AppResult<Option<String>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::String(s)) => Ok(Some(s.clone())),
        Some(JSValue::Array(elts)) => {
            let mut items: Vec<String> = Vec::new();
            for elt in elts {
                match elt {
                    JSValue::String(s) => items.push(s.clone()),
                    JSValue::Number(n) => items.push(n.to_string()),
                    _ => {
                        return ConfigValueSnafu {
                            field,
                            content: elt.to_string(),
                        }
                        .fail();
                    }
                }
            }
            Ok(Some(items.join(",")))
        }
        Some(js) => ConfigValueSnafu {
            field,
            content: js.to_string(),
        }
        .fail(),
    }
}
