//! Bash-diff style report
//!
//! [`format_as_diff`] turns a token stream into the classic two-sided layout:
//! expected-only lines as `< line`, a `---` separator, then actual-only lines
//! as `> line`. Consecutive hunks are separated by a blank line.

use crate::diff::DiffToken;
use std::fmt;

/// Separator between the expected and actual side of a hunk
pub const SEPARATOR: &str = "---";

/// One display line of a [`NormalizedDiffReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// `---`
    Separator,
    /// Line the formatter expects, rendered as `< line`
    Expected(String),
    /// Line found on disk, rendered as `> line`
    Actual(String),
    /// Blank line between hunks
    Spacer,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator => f.write_str(SEPARATOR),
            Self::Expected(line) => write!(f, "< {line}"),
            Self::Actual(line) => write!(f, "> {line}"),
            Self::Spacer => Ok(()),
        }
    }
}

/// Display lines describing how a file differs from its formatted form
///
/// An empty report means the file is already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDiffReport {
    lines: Vec<ReportLine>,
}

impl NormalizedDiffReport {
    /// Whether the file matched its formatted form
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of display lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The display lines in order
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// The display lines as plain strings
    pub fn to_strings(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    /// Text written to stderr on mismatch: a blank line, the report, a blank line
    pub fn render(&self) -> String {
        format!("\n{}\n", self.to_strings().join("\n"))
    }
}

impl fmt::Display for NormalizedDiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Convert a token stream into a [`NormalizedDiffReport`]
///
/// Common and hint tokens are dropped. A `---` is emitted whenever an
/// actual-only line follows the expected side, and a blank spacer whenever an
/// expected-only line follows the actual side. The walk starts on the
/// expected side.
///
/// The spacer is one empty line, so rendered hunks are separated by exactly
/// one blank line rather than two.
pub fn format_as_diff(tokens: &[DiffToken]) -> NormalizedDiffReport {
    let mut lines = Vec::new();
    let mut on_expected_side = true;

    for token in tokens {
        match token {
            DiffToken::Removed(line) => {
                if !on_expected_side {
                    lines.push(ReportLine::Spacer);
                }
                lines.push(ReportLine::Expected(line.clone()));
                on_expected_side = true;
            }
            DiffToken::Added(line) => {
                if on_expected_side {
                    lines.push(ReportLine::Separator);
                }
                lines.push(ReportLine::Actual(line.clone()));
                on_expected_side = false;
            }
            DiffToken::Common(_) | DiffToken::Hint(_) => {}
        }
    }

    NormalizedDiffReport { lines }
}
