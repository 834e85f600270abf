//! Format check workflow
//!
//! Compares what the formatter would write for each file with what is on
//! disk. Files are checked one at a time in the order given; the first file
//! that differs ends the run.

use crate::command::FormatSource;
use fmtgate_core::{Error, NormalizedDiffReport, Result, format_as_diff, line_diff};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// File that was checked
    pub path: PathBuf,
    /// Differences between formatter output and file contents
    pub report: NormalizedDiffReport,
}

impl CheckOutcome {
    /// Whether the file is already formatted
    pub fn passed(&self) -> bool {
        self.report.is_empty()
    }
}

/// Outcomes of a run, ending at the first failing file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    outcomes: Vec<CheckOutcome>,
}

impl RunSummary {
    /// Every file checked, in order
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    /// The file that stopped the run, if any
    pub fn failure(&self) -> Option<&CheckOutcome> {
        self.outcomes.last().filter(|outcome| !outcome.passed())
    }

    /// Whether every checked file passed
    pub fn passed(&self) -> bool {
        self.failure().is_none()
    }
}

/// Split decoded text into lines on `\n`
///
/// A trailing newline yields a final empty line on both sides, so it never
/// shows up as a difference on its own.
fn split_lines(bytes: Vec<u8>, origin: impl Into<String>) -> Result<Vec<String>> {
    let text = String::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 {
        path: origin.into(),
        source,
    })?;

    Ok(text.split('\n').map(str::to_string).collect())
}

/// Lines of `path` as they are on disk
pub fn actual_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    split_lines(bytes, path.display().to_string())
}

/// Checks files against a formatter
pub struct FormatCheck<'a, S: FormatSource> {
    source: &'a S,
}

impl<'a, S: FormatSource> FormatCheck<'a, S> {
    /// Create a check backed by `source`
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Lines the formatter produces for `path`
    ///
    /// Any output on stderr is a malfunction, even when stdout looks right.
    pub fn expected_lines(&self, path: &Path) -> Result<Vec<String>> {
        let result = self.source.run_command(path)?;

        if !result.stderr.is_empty() {
            return Err(Error::UnexpectedStderr {
                tool: self.source.tool().to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }
        if !result.success() {
            tracing::warn!(
                "{} exited with status {} on {}",
                self.source.tool(),
                result.status,
                path.display()
            );
        }

        split_lines(
            result.stdout,
            format!("{} output for {}", self.source.tool(), path.display()),
        )
    }

    /// Compare one file with its formatted form
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn check_file(&self, path: &Path) -> Result<CheckOutcome> {
        let expected = self.expected_lines(path)?;
        let actual = actual_lines(path)?;

        let report = format_as_diff(&line_diff(&expected, &actual));
        tracing::debug!(lines = report.len(), "Compared against formatter output");

        Ok(CheckOutcome {
            path: path.to_path_buf(),
            report,
        })
    }

    /// Check `files` in order, stopping at the first one that differs
    pub fn run(&self, files: &[PathBuf]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for path in files {
            let outcome = self.check_file(path)?;
            let passed = outcome.passed();
            summary.outcomes.push(outcome);

            if !passed {
                tracing::info!("{} is not formatted", path.display());
                break;
            }
        }

        tracing::debug!(checked = summary.outcomes.len(), "Format check finished");
        Ok(summary)
    }
}
