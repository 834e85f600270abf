//! fmtgate CLI library
//!
//! This library contains all the CLI logic for fmtgate, making it reusable
//! for testing and integration with other tools.

use anyhow::{Context, Result};
use clap::Parser;
use fmtgate_config::Config;
use fmtgate_core::ArgStyle;
use fmtgate_engine::tools::inspectable_presets;
use fmtgate_engine::{CommandRunner, FormatCheck, ToolOverrides, ToolSpec};
use std::io::Write;
use std::path::PathBuf;

/// fmtgate - fail a commit when files are not formatted
#[derive(Debug, Parser)]
#[command(name = "fmtgate")]
#[command(about = "Check that files match their formatter's output")]
#[command(long_about = "Check that files match their formatter's output

Runs the formatter on every file, compares its output with the file on disk,
and prints a diff to stderr for the first file that differs.

Exit status:
  • 0 when every file is already formatted
  • 1 when a file differs or the tool cannot be run

Examples:
  • fmtgate src/main.c src/util.c
      → Check two files with clang-format

  • fmtgate -style=google --version=14.0.0 src/main.c
      → Pass a flag to clang-format and require version 14.0.0

  • fmtgate --tool uncrustify -c uncrustify.cfg -f src/main.c
      → Use uncrustify instead

  • fmtgate --list-versions
      → Print the versions of all known tools

Tool arguments follow fmtgate's own options. For tools that separate their
flags from files with `--`, a leading `--` is taken by fmtgate itself, so
write `fmtgate --tool oclint -- -- main.c` when there are no tool flags.")]
pub struct Cli {
    /// Tool to run: a preset name or a path to an executable
    #[arg(long, env = "FMTGATE_TOOL", value_name = "NAME")]
    pub tool: Option<String>,

    /// The tool separates its flags from files with `--`
    #[arg(long, conflicts_with = "heuristic")]
    pub separator: bool,

    /// Treat existing paths and non-flag arguments as files
    #[arg(long)]
    pub heuristic: bool,

    /// Path to the config file (default: .fmtgate.toml in the working directory)
    #[arg(long, env = "FMTGATE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "FMTGATE_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the versions of all known tools and exit
    #[arg(long)]
    pub list_versions: bool,

    /// Tool flags and files to check
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// Tool settings given on the command line
    pub fn overrides(&self) -> ToolOverrides {
        let style = if self.separator {
            Some(ArgStyle::Separator)
        } else if self.heuristic {
            Some(ArgStyle::Heuristic)
        } else {
            None
        };

        ToolOverrides {
            command: self.tool.clone(),
            style,
        }
    }
}

/// Print `<tool> <version>` for every known tool
fn list_versions<W: Write>(out: &mut W) -> Result<()> {
    let versions = fmtgate_engine::version::inspect_all(&inspectable_presets())?;
    for (name, version) in versions {
        writeln!(out, "{name} {version}")?;
    }
    Ok(())
}

/// Main entry point for the CLI logic
///
/// Returns `Ok(false)` when a file is not formatted; its diff has already been
/// written to stderr. Errors mean the check could not be carried out.
pub fn run(cli: Cli) -> Result<bool> {
    fmtgate_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.list_versions {
        list_versions(&mut std::io::stdout().lock())?;
        return Ok(true);
    }

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = Config::discover(cli.config.as_deref(), &cwd)?;
    let spec = ToolSpec::resolve(&config.tool, &cli.overrides());
    tracing::debug!(?spec, "Resolved tool");

    let runner = CommandRunner::from_spec(&spec, &cli.args)
        .with_context(|| format!("Cannot use {}", spec.command))?;
    let summary = FormatCheck::new(&runner).run(runner.files())?;

    match summary.failure() {
        Some(failure) => {
            tracing::debug!(
                "{} differs from {} output",
                failure.path.display(),
                runner.command()
            );
            let mut stderr = std::io::stderr().lock();
            stderr.write_all(failure.report.render().as_bytes())?;
            stderr.flush()?;
            Ok(false)
        }
        None => {
            tracing::info!("{} file(s) formatted correctly", summary.outcomes().len());
            Ok(true)
        }
    }
}
