use std::path::{Path, PathBuf};

use crate::app::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    /// The explicit type if one is given, otherwise the type suggested by the file
    /// extension. Unknown extensions are read as CSV.
    pub fn for_input(path: &str, explicit: Option<&str>) -> AppResult<InputType> {
        match explicit.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "csv" => Ok(InputType::Csv),
            Some(s) if s == "xlsx" || s == "excel" => Ok(InputType::Xlsx),
            Some(s) => UnknownInputTypeSnafu { input_type: s }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") => Ok(InputType::Xlsx),
                    _ => Ok(InputType::Csv),
                }
            }
        }
    }
}

/// Joins a path found in a configuration file with the directory of that file.
/// Absolute paths are kept as they are.
pub fn resolve_path(root: &Path, path: &str) -> String {
    let p: PathBuf = [root, Path::new(path)].iter().collect();
    p.as_path().display().to_string()
}
