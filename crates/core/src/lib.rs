//! Core types for fmtgate
//!
//! This is the foundation crate (Layer 0) that all other fmtgate crates depend on.
//! It provides:
//! - Base error types
//! - The tagged line diff between formatter output and file contents
//! - The bash-diff style report built from that diff
//! - Tool argument conventions
//!
//! This crate has no dependencies on other fmtgate crates.

pub mod diff;
pub mod error;
pub mod report;
pub mod style;

pub use diff::{DiffToken, line_diff};
pub use error::{Error, Result};
pub use report::{NormalizedDiffReport, ReportLine, format_as_diff};
pub use style::ArgStyle;
