//! Generic wrapper around one external tool
//!
//! [`CommandRunner`] checks the tool is installed, splits raw arguments into
//! flags for the tool and target files, and runs the tool on one file at a
//! time. Tools disagree on how flags and files are separated on the command
//! line; [`ArgStyle`] captures the two conventions in use.

use crate::tools::ToolSpec;
use crate::version::{self, locate};
use fmtgate_core::{ArgStyle, Error, Result};
use std::path::{Path, PathBuf};

/// Argument that pins the expected tool version, e.g. `--version=14.0.0`
const VERSION_PIN_PREFIX: &str = "--version=";

/// Captured result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Standard output
    pub stdout: Vec<u8>,
    /// Standard error
    pub stderr: Vec<u8>,
    /// Exit code, `-1` when terminated by a signal
    pub status: i32,
}

impl ExecutionResult {
    /// Whether the tool exited with status zero
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Raw arguments split into their roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Flags forwarded to the tool before each file
    pub flags: Vec<String>,
    /// Target files in command-line order
    pub files: Vec<PathBuf>,
    /// Version requested with `--version=`
    pub pinned_version: Option<String>,
}

/// Split `raw` into tool flags and target files
///
/// With [`ArgStyle::Separator`] everything before the first `--` is a flag and
/// everything after it is a file. With [`ArgStyle::Heuristic`] an argument is
/// a file if it exists on disk or does not start with `-`.
///
/// A `--version=X` flag is removed from the flags and returned as the pinned
/// version.
pub fn parse_args(tool: &str, raw: &[String], style: ArgStyle) -> Result<ParsedArgs> {
    let (flags, files): (Vec<String>, Vec<PathBuf>) = match style {
        ArgStyle::Separator => {
            let split = raw
                .iter()
                .position(|arg| arg == "--")
                .ok_or_else(|| Error::MissingSeparator {
                    tool: tool.to_string(),
                })?;

            (
                raw[..split].to_vec(),
                raw[split + 1..].iter().map(PathBuf::from).collect(),
            )
        }
        ArgStyle::Heuristic => {
            let (files, flags): (Vec<&String>, Vec<&String>) =
                raw.iter().partition(|arg| is_file_arg(arg));

            (
                flags.into_iter().cloned().collect(),
                files.into_iter().map(PathBuf::from).collect(),
            )
        }
    };

    let mut pinned_version = None;
    let flags = flags
        .into_iter()
        .filter(|flag| match flag.strip_prefix(VERSION_PIN_PREFIX) {
            Some(version) => {
                pinned_version = Some(version.to_string());
                false
            }
            None => true,
        })
        .collect();

    Ok(ParsedArgs {
        flags,
        files,
        pinned_version,
    })
}

fn is_file_arg(arg: &str) -> bool {
    Path::new(arg).exists() || !arg.starts_with('-')
}

/// Source of formatter output for a single file
///
/// Implemented by [`CommandRunner`]; tests substitute canned output.
pub trait FormatSource {
    /// Tool name used in diagnostics
    fn tool(&self) -> &str;

    /// Run the tool on `file` and capture what it printed
    fn run_command(&self, file: &Path) -> Result<ExecutionResult>;
}

/// Wrapper around one installed external tool
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: String,
    lookbehind: String,
    program: PathBuf,
    args: ParsedArgs,
}

impl CommandRunner {
    /// Validate installation and classify `raw_args`
    ///
    /// Fails with [`Error::ToolNotFound`] before anything else if `command`
    /// cannot be resolved. When `raw_args` pins a version, the installed
    /// version is checked as well.
    #[tracing::instrument(skip(lookbehind, raw_args))]
    pub fn new(
        command: &str,
        lookbehind: &str,
        raw_args: &[String],
        style: ArgStyle,
    ) -> Result<Self> {
        let program = Self::check_installed(command)?;
        let args = parse_args(command, raw_args, style)?;

        tracing::debug!(
            flags = ?args.flags,
            files = args.files.len(),
            "Classified arguments for {command} ({style})"
        );

        let runner = Self {
            command: command.to_string(),
            lookbehind: lookbehind.to_string(),
            program,
            args,
        };

        if let Some(expected) = &runner.args.pinned_version {
            runner.assert_version(expected)?;
        }

        Ok(runner)
    }

    /// Build a runner from a resolved tool description
    pub fn from_spec(spec: &ToolSpec, cli_args: &[String]) -> Result<Self> {
        Self::new(
            &spec.command,
            &spec.lookbehind,
            &spec.full_args(cli_args),
            spec.style,
        )
    }

    /// Resolve `command` on the search path
    pub fn check_installed(command: &str) -> Result<PathBuf> {
        let program = locate(command)?;
        tracing::debug!("Found {command} at {}", program.display());
        Ok(program)
    }

    /// Tool name as configured
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Flags forwarded before each file
    pub fn flags(&self) -> &[String] {
        &self.args.flags
    }

    /// Target files in command-line order
    pub fn files(&self) -> &[PathBuf] {
        &self.args.files
    }

    /// Installed version of the tool
    ///
    /// Prefers the number right after the tool's lookbehind text and falls
    /// back to the generic version pattern.
    pub fn version(&self) -> Result<String> {
        let output = version::version_output(&self.program, &self.command)?;

        version::version_after_marker(&output, &self.lookbehind)
            .or_else(|| version::parse_version(&output))
            .ok_or_else(|| Error::VersionParse {
                tool: self.command.clone(),
                output: output.trim().to_string(),
            })
    }

    /// Fail unless the installed version equals `expected`
    pub fn assert_version(&self, expected: &str) -> Result<()> {
        let actual = self.version()?;
        if actual == expected {
            tracing::debug!("{} version {actual} matches", self.command);
            Ok(())
        } else {
            Err(Error::VersionMismatch {
                tool: self.command.clone(),
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

impl FormatSource for CommandRunner {
    fn tool(&self) -> &str {
        &self.command
    }

    /// Run `<tool> <flags> <file>` and wait for it
    fn run_command(&self, file: &Path) -> Result<ExecutionResult> {
        let mut args: Vec<std::ffi::OsString> =
            self.args.flags.iter().map(Into::into).collect();
        args.push(file.into());

        tracing::debug!("Executing {} {:?}", self.program.display(), args);

        let output = duct::cmd(self.program.as_path(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| Error::Spawn {
                tool: self.command.clone(),
                source,
            })?;

        Ok(ExecutionResult {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code().unwrap_or(-1),
        })
    }
}
