//! Argument conventions of external tools

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a tool's command line separates its own flags from target files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgStyle {
    /// Flags come before a literal `--`, files after it
    Separator,
    /// Existing paths and non-flag arguments are files, the rest are flags
    #[default]
    Heuristic,
}

impl fmt::Display for ArgStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator => f.write_str("separator"),
            Self::Heuristic => f.write_str("heuristic"),
        }
    }
}
