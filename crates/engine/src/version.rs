//! Tool version detection
//!
//! Runs `<tool> --version` and pulls a dotted version number out of whatever
//! banner the tool prints.

use crate::tools::ToolPreset;
use fmtgate_core::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Trailing banner printed by oclint after the LLVM version it was built with
const OCLINT_MARKER: &str = "OCLint version";

/// Dotted numeric version after a space or hyphen, with optional build metadata
const VERSION_BODY: &str = r"((?:\d+\.)+\d+[_+\-a-z\d]*)";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[- ]{VERSION_BODY}")).expect("Failed to compile version pattern")
});

/// Resolve a tool on the search path
pub fn locate(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| Error::ToolNotFound {
        tool: tool.to_string(),
    })
}

/// Extract the version from `--version` output
///
/// Numbers that appear before an `OCLint version` banner are skipped, so
/// oclint reports its own version rather than the bundled LLVM one.
pub fn parse_version(output: &str) -> Option<String> {
    let haystack = output
        .rfind(OCLINT_MARKER)
        .map_or(output, |idx| &output[idx..]);

    VERSION_PATTERN
        .captures(haystack)
        .map(|caps| caps[1].to_string())
}

/// Extract the version that immediately follows `lookbehind`
pub fn version_after_marker(output: &str, lookbehind: &str) -> Option<String> {
    if lookbehind.is_empty() {
        return None;
    }

    let pattern = Regex::new(&format!("{}{VERSION_BODY}", regex::escape(lookbehind))).ok()?;
    pattern.captures(output).map(|caps| caps[1].to_string())
}

/// Run `<program> --version` and return its standard output
///
/// Anything written to stderr is treated as a malfunction.
pub(crate) fn version_output(program: &Path, tool: &str) -> Result<String> {
    tracing::debug!("Running {} --version", program.display());

    let output = duct::cmd(program, ["--version"])
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|source| Error::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    if !output.stderr.is_empty() {
        return Err(Error::UnexpectedStderr {
            tool: tool.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|source| Error::InvalidUtf8 {
        path: format!("{tool} --version"),
        source,
    })
}

/// Get the installed version of `tool`
///
/// Fails with [`Error::ToolNotFound`] before running anything if the tool is
/// not on the search path.
#[tracing::instrument]
pub fn tool_version(tool: &str) -> Result<String> {
    let program = locate(tool)?;
    let output = version_output(&program, tool)?;

    parse_version(&output).ok_or_else(|| Error::VersionParse {
        tool: tool.to_string(),
        output: output.trim().to_string(),
    })
}

/// Versions of every preset tool, in table order
///
/// Stops at the first tool that is missing or unparsable.
pub fn inspect_all(presets: &[ToolPreset]) -> Result<Vec<(&'static str, String)>> {
    presets
        .iter()
        .map(|preset| Ok((preset.name, tool_version(preset.name)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clang_format() {
        let output = "Ubuntu clang-format version 14.0.0-1ubuntu1.1\n";
        assert_eq!(parse_version(output).as_deref(), Some("14.0.0-1ubuntu1"));
    }

    #[test]
    fn test_parse_plain_release() {
        let output = "clang-format version 10.0.1 \n";
        assert_eq!(parse_version(output).as_deref(), Some("10.0.1"));
    }

    #[test]
    fn test_parse_uncrustify() {
        assert_eq!(
            parse_version("Uncrustify-0.70.1_f\n").as_deref(),
            Some("0.70.1_f")
        );
    }

    #[test]
    fn test_parse_cppcheck() {
        assert_eq!(parse_version("Cppcheck 2.7\n").as_deref(), Some("2.7"));
    }

    #[test]
    fn test_parse_skips_llvm_version_before_oclint_banner() {
        let output = "LLVM (http://llvm.org/):\n  \
                      LLVM version 5.0.0svn-r313528\n  \
                      Optimized build.\n\n\
                      OCLint (http://oclint.org/):\n  \
                      OCLint version 0.13.\n  \
                      Built Sep 18 2017 (08:58:40).\n";

        assert_eq!(parse_version(output).as_deref(), Some("0.13"));
    }

    #[test]
    fn test_parse_requires_dotted_number() {
        assert_eq!(parse_version("tool version 7\n"), None);
        assert_eq!(parse_version("no version here"), None);
    }

    #[test]
    fn test_version_after_marker() {
        let output = "Ubuntu clang-format version 14.0.0-1ubuntu1.1\n";
        assert_eq!(
            version_after_marker(output, "clang-format version ").as_deref(),
            Some("14.0.0-1ubuntu1")
        );
    }

    #[test]
    fn test_version_after_marker_escapes_marker() {
        let output = "tool (v) 1.2.3\n";
        assert_eq!(
            version_after_marker(output, "tool (v) ").as_deref(),
            Some("1.2.3")
        );
    }

    #[test]
    fn test_version_after_missing_or_empty_marker() {
        assert_eq!(version_after_marker("Cppcheck 2.7", "cpplint "), None);
        assert_eq!(version_after_marker("Cppcheck 2.7", ""), None);
    }

    #[test]
    fn test_missing_tool_is_not_found() {
        let err = tool_version("fmtgate-no-such-tool-4d1c").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { ref tool } if tool == "fmtgate-no-such-tool-4d1c"));
    }
}
