//! Configuration management
//!
//! This module handles loading the optional `.fmtgate.toml` file that selects
//! which tool to run and how its arguments are shaped.

use crate::{Error, Result};
use fmtgate_core::ArgStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = ".fmtgate.toml";

/// Tool section of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Preset name or path of the executable to run
    #[serde(default)]
    pub command: Option<String>,

    /// Literal text preceding the version in `--version` output
    #[serde(default)]
    pub lookbehind: Option<String>,

    /// Argument convention of the tool
    #[serde(default)]
    pub style: Option<ArgStyle>,

    /// Arguments placed before the ones given on the command line
    #[serde(default)]
    pub args: Vec<String>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tool selection
    #[serde(default)]
    pub tool: ToolConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Locate and load configuration
    ///
    /// An explicit path must exist. Otherwise `.fmtgate.toml` in `dir` is used
    /// when present, and the defaults when it is not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let candidate = Self::default_path(dir);
        if candidate.is_file() {
            tracing::debug!("Loading config from {}", candidate.display());
            Self::load(&candidate)
        } else {
            tracing::debug!("No {CONFIG_FILE_NAME} found, using defaults");
            Ok(Self::default())
        }
    }

    /// Default config location inside `dir`
    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
[tool]
command = "clang-tidy"
lookbehind = "LLVM version "
style = "separator"
args = ["-quiet"]
"#,
        )
        .unwrap();

        assert_eq!(config.tool.command.as_deref(), Some("clang-tidy"));
        assert_eq!(config.tool.lookbehind.as_deref(), Some("LLVM version "));
        assert_eq!(config.tool.style, Some(ArgStyle::Separator));
        assert_eq!(config.tool.args, vec!["-quiet"]);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let err = Config::from_toml_str("[tool]\nstyle = \"magic\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml_str("[tool]\ncomand = \"typo\"\n").unwrap_err();
        assert!(err.to_string().contains("comand"));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_reads_file_in_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            Config::default_path(dir.path()),
            "[tool]\ncommand = \"uncrustify\"\n",
        )
        .unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.tool.command.as_deref(), Some("uncrustify"));
    }

    #[test]
    fn test_discover_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = Config::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
