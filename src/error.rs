//! Structured error types for the Trellis layout engine.
//!
//! Layout itself never fails: malformed tables are repaired and reported
//! as warnings. Errors only come from reading and parsing input.

use thiserror::Error;

/// The unified error type returned by the fallible public API.
#[derive(Debug, Error)]
pub enum TableError {
    /// JSON input failed to parse as a valid layout document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The layout could not be written out as JSON.
    #[error("Failed to write layout: {0}")]
    Output(#[source] serde_json::Error),
    /// Input or output file could not be accessed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names and types (cell content needs a \"type\" of Empty, Block or Table).".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        TableError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_has_hint() {
        let err: TableError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("Failed to parse document"));
        assert!(message.contains("trailing commas"));
    }

    #[test]
    fn eof_error_has_hint() {
        let err: TableError = serde_json::from_str::<serde_json::Value>("{\"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }
}
