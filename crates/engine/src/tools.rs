//! Known tools and how to invoke them
//!
//! A [`ToolSpec`] is the fully resolved description of the tool a run uses.
//! It is built from the preset table, the configuration file and command-line
//! overrides, in increasing order of precedence.

use fmtgate_config::ToolConfig;
use fmtgate_core::ArgStyle;

/// Tool used when nothing else is configured
pub const DEFAULT_TOOL: &str = "clang-format";

/// Built-in knowledge about one external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolPreset {
    /// Executable name
    pub name: &'static str,
    /// Literal text preceding the version in `--version` output
    pub lookbehind: &'static str,
    /// Argument convention
    pub style: ArgStyle,
}

/// Preset table
pub const PRESETS: &[ToolPreset] = &[
    ToolPreset {
        name: "clang-format",
        lookbehind: "clang-format version ",
        style: ArgStyle::Heuristic,
    },
    ToolPreset {
        name: "clang-tidy",
        lookbehind: "LLVM version ",
        style: ArgStyle::Separator,
    },
    ToolPreset {
        name: "uncrustify",
        lookbehind: "Uncrustify-",
        style: ArgStyle::Heuristic,
    },
    ToolPreset {
        name: "cppcheck",
        lookbehind: "Cppcheck ",
        style: ArgStyle::Heuristic,
    },
    ToolPreset {
        name: "cpplint",
        lookbehind: "cpplint ",
        style: ArgStyle::Heuristic,
    },
    ToolPreset {
        name: "include-what-you-use",
        lookbehind: "include-what-you-use ",
        style: ArgStyle::Separator,
    },
    ToolPreset {
        name: "oclint",
        lookbehind: "OCLint version ",
        style: ArgStyle::Separator,
    },
];

/// Look up a preset by executable name
pub fn preset(name: &str) -> Option<&'static ToolPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Presets whose versions can be queried on this platform
///
/// oclint has no Windows build.
pub fn inspectable_presets() -> Vec<ToolPreset> {
    PRESETS
        .iter()
        .filter(|p| !(cfg!(windows) && p.name == "oclint"))
        .copied()
        .collect()
}

/// Command-line overrides for the tool section
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    /// Replaces the configured command
    pub command: Option<String>,
    /// Replaces the configured argument style
    pub style: Option<ArgStyle>,
}

/// Resolved tool description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Executable name or path
    pub command: String,
    /// Version lookbehind, empty when unknown
    pub lookbehind: String,
    /// Argument convention
    pub style: ArgStyle,
    /// Arguments placed before the command-line ones
    pub base_args: Vec<String>,
}

impl ToolSpec {
    /// Merge preset, config and overrides
    ///
    /// A preset only contributes defaults when the final command names it.
    pub fn resolve(config: &ToolConfig, overrides: &ToolOverrides) -> Self {
        let command = overrides
            .command
            .clone()
            .or_else(|| config.command.clone())
            .unwrap_or_else(|| DEFAULT_TOOL.to_string());
        let known = preset(&command);

        let lookbehind = config
            .lookbehind
            .clone()
            .or_else(|| known.map(|p| p.lookbehind.to_string()))
            .unwrap_or_default();

        let style = overrides
            .style
            .or(config.style)
            .or_else(|| known.map(|p| p.style))
            .unwrap_or_default();

        Self {
            command,
            lookbehind,
            style,
            base_args: config.args.clone(),
        }
    }

    /// Configured arguments followed by `args`
    pub fn full_args(&self, args: &[String]) -> Vec<String> {
        self.base_args.iter().chain(args).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clang_format() {
        let spec = ToolSpec::resolve(&ToolConfig::default(), &ToolOverrides::default());

        assert_eq!(spec.command, "clang-format");
        assert_eq!(spec.lookbehind, "clang-format version ");
        assert_eq!(spec.style, ArgStyle::Heuristic);
        assert!(spec.base_args.is_empty());
    }

    #[test]
    fn test_preset_supplies_style() {
        let config = ToolConfig {
            command: Some("clang-tidy".to_string()),
            ..ToolConfig::default()
        };
        let spec = ToolSpec::resolve(&config, &ToolOverrides::default());

        assert_eq!(spec.style, ArgStyle::Separator);
        assert_eq!(spec.lookbehind, "LLVM version ");
    }

    #[test]
    fn test_overrides_beat_config() {
        let config = ToolConfig {
            command: Some("clang-tidy".to_string()),
            style: Some(ArgStyle::Separator),
            ..ToolConfig::default()
        };
        let overrides = ToolOverrides {
            command: Some("uncrustify".to_string()),
            style: Some(ArgStyle::Heuristic),
        };
        let spec = ToolSpec::resolve(&config, &overrides);

        assert_eq!(spec.command, "uncrustify");
        assert_eq!(spec.lookbehind, "Uncrustify-");
        assert_eq!(spec.style, ArgStyle::Heuristic);
    }

    #[test]
    fn test_unknown_command_gets_plain_defaults() {
        let config = ToolConfig {
            command: Some("/opt/bin/my-formatter".to_string()),
            ..ToolConfig::default()
        };
        let spec = ToolSpec::resolve(&config, &ToolOverrides::default());

        assert_eq!(spec.lookbehind, "");
        assert_eq!(spec.style, ArgStyle::Heuristic);
    }

    #[test]
    fn test_full_args_prepends_config_args() {
        let config = ToolConfig {
            args: vec!["-style=file".to_string()],
            ..ToolConfig::default()
        };
        let spec = ToolSpec::resolve(&config, &ToolOverrides::default());

        assert_eq!(
            spec.full_args(&["main.c".to_string()]),
            vec!["-style=file", "main.c"]
        );
    }

    #[test]
    fn test_inspectable_presets_includes_clang_format() {
        assert!(inspectable_presets().iter().any(|p| p.name == "clang-format"));
    }
}
