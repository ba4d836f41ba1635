// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// Timestamp format used in log file names and informational records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// What the dispatch handler does with a created file that no tag matched.
///
/// - `None`: leave the file alone, just note it (default behaviour).
/// - `Delete`: remove the file from disk.
///
/// Parsed case-insensitively, so `"DELETE"` and `"delete"` are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum FallbackAction {
    None,
    Delete,
}

impl Default for FallbackAction {
    fn default() -> Self {
        FallbackAction::None
    }
}

impl FromStr for FallbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(FallbackAction::None),
            "delete" => Ok(FallbackAction::Delete),
            other => Err(format!(
                "invalid fallback action: {other} (expected \"none\" or \"delete\")"
            )),
        }
    }
}

impl TryFrom<String> for FallbackAction {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
