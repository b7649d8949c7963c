//! JSON rendering for transpiled resumes.

use crate::error::{Error, Result};
use crate::model::ConversionResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result (tree and warnings) to JSON.
pub fn to_json(result: &ConversionResult, format: JsonFormat) -> Result<String> {
    let output = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    output.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
