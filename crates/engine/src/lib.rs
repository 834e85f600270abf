//! # fmtgate engine
//!
//! Runs external formatters and checks their output against files on disk.
//!
//! - **Tools**: Preset table and resolution of the tool to run
//! - **Versions**: `--version` parsing and version pinning
//! - **Command runner**: Installation check, argument classification, execution
//! - **Format check**: Per-file diff and the fail-fast run over all files

pub mod check;
pub mod command;
pub mod tools;
pub mod version;

// Re-export error types from core
pub use fmtgate_core::{Error, Result};

// Re-export commonly used types
pub use check::{CheckOutcome, FormatCheck, RunSummary};
pub use command::{CommandRunner, ExecutionResult, FormatSource, ParsedArgs, parse_args};
pub use tools::{ToolOverrides, ToolPreset, ToolSpec};
pub use version::tool_version;
