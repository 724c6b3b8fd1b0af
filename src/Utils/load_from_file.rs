use crate::UserGuide::guide_errors::{GuideError, GuideResult};
use log::{debug, error};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Reads a UTF-8 guide document into memory.
/// Missing files and read failures are reported as `GuideError::Io`.
pub fn read_document_text(path: &Path) -> GuideResult<String> {
    fs::read_to_string(path).map_err(|source| GuideError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a JSON guide document already held in memory.
/// `origin` is only used for diagnostics (usually the file path).
/// On failure the offending line is logged with a pointer to the error column
/// and a `GuideError::Schema` carrying line and column is returned.
pub fn parse_document<T: DeserializeOwned>(text: &str, origin: &str) -> GuideResult<T> {
    match serde_json::from_str::<T>(text) {
        Ok(document) => Ok(document),
        Err(e) => {
            let message = describe_parse_error(text, origin, &e);
            Err(GuideError::schema(origin, message))
        }
    }
}

/// Reads and parses a JSON guide document in one step.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> GuideResult<T> {
    let text = read_document_text(path)?;
    let origin = path.display().to_string();
    let document = parse_document(&text, &origin)?;
    debug!("Parsed guide document '{}'", origin);
    Ok(document)
}

fn describe_parse_error(text: &str, origin: &str, e: &serde_json::Error) -> String {
    let error_line = e.line();
    let error_column = e.column();
    let error_msg = format!("line {}, column {}: {}", error_line, error_column, e);
    error!("Error parsing '{}' at {}", origin, error_msg);

    // serde_json reports line 0 for errors without a position
    if error_line > 0 {
        if let Some(problem_line) = text.lines().nth(error_line - 1) {
            error!("Problematic line: {}", problem_line);
            if error_column <= problem_line.len() + 1 {
                let pointer = " ".repeat(error_column.saturating_sub(1)) + "^";
                error!("                  {}", pointer);
            }
        }
    }
    error_msg
}
