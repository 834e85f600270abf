//! Configuration management for fmtgate
//!
//! This crate handles:
//! - Configuration file discovery and loading
//! - Logging initialization

pub mod config;
pub mod logging;

// Re-export error types from core
pub use fmtgate_core::{Error, Result};

pub use config::{CONFIG_FILE_NAME, Config, ToolConfig};
