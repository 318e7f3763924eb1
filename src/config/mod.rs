/// Unknown-key warnings for the configuration file.
pub mod validator;

use crate::crawler::CompareScope;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration loaded from `config.toml`.
///
/// Every section is optional; command-line flags always win over these values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// `[filter]`: globs shared by all commands
    #[serde(default)]
    pub filter: FilterConfig,

    /// `[generate]`: manifest writing
    #[serde(default)]
    pub generate: GenerateConfig,

    /// `[unchecked]`: unreferenced-file search
    #[serde(default)]
    pub unchecked: UncheckedConfig,

    /// `[output]`: console output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Globs applied to every command.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Appended to each command's `--exclude` list
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Used when a command gives no `--include`
    #[serde(default)]
    pub include: Vec<String>,
}

/// Settings for `generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Rename a manifest to `<name>.bak` before replacing it (`--no-backup` wins)
    #[serde(default = "default_backup")]
    pub backup: bool,
}

/// Settings for `unchecked`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UncheckedConfig {
    /// When files are compared against referenced paths (`--scope` wins)
    #[serde(default)]
    pub scope: CompareScope,
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Colorize status tags
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            backup: default_backup(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is created on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or values of the wrong type
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Exclude globs for a command: the command's own followed by the
    /// configured ones.
    #[must_use]
    pub fn merge_exclude(&self, cli: &[String]) -> Vec<String> {
        cli.iter()
            .chain(self.filter.exclude.iter())
            .cloned()
            .collect()
    }

    /// Include globs for a command: the command's own if given, else the
    /// configured ones.
    #[must_use]
    pub fn merge_include(&self, cli: &[String]) -> Vec<String> {
        if cli.is_empty() {
            self.filter.include.clone()
        } else {
            cli.to_vec()
        }
    }
}

/// Where the configuration file lives: `$HASHTOOL_CONFIG` if set, else
/// `<config_dir>/hashtool/config.toml`.
///
/// # Errors
///
/// Returns an error if neither the variable nor a platform config directory
/// is available.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(crate::CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().context("Could not find configuration directory")?;
    Ok(dir.join(crate::DEFAULT_CONFIG_PATH))
}

// Default functions for serde
const fn default_backup() -> bool {
    true
}

const fn default_color() -> bool {
    true
}
