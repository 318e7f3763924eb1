#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Hashtool - Checksum Manifest Generator and Verifier
//!
//! Hashtool walks directory trees and maintains plain-text checksum
//! manifests in the classic `<hexdigest> *<path>` format understood by
//! `md5sum`/`sha256sum`.
//!
//! ## Features
//!
//! - **Generate**: write one manifest per directory, or a single tree-wide
//!   manifest at the root, with optional backup of the previous one
//! - **Verify**: re-hash every listed file and report `OK`, `MISSING` or
//!   `INVALID` entries per manifest
//! - **Unchecked**: find files that no manifest in the tree references
//! - **Algorithms**: md5, sha1, sha224, sha256, sha384, sha512 and crc32
//!
//! ## Architecture
//!
//! - [`digest`]: Streaming digest engine over the supported algorithms
//! - [`filter`]: Include/exclude glob filtering of bare file names
//! - [`manifest`]: Manifest text codec and file I/O
//! - [`scanner`]: Deterministic directory walking
//! - [`crawler`]: The three directory crawlers (generator, verifier, unchecked finder)
//! - [`commands`]: CLI command implementations wiring config and flags to crawlers
//! - [`config`]: Configuration parsing and validation
//! - [`output`]: Leveled, colored console output
//!
//! ## Example Usage
//!
//! ```no_run
//! use hashtool::crawler::{DirectoryCrawler, GenerateOptions, Generator};
//! use hashtool::digest::Algorithm;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut options = GenerateOptions::new(Algorithm::Sha256);
//! options.recursive = true;
//!
//! let report = Generator::new(options)?.process_directory(Path::new("/srv/archive"))?;
//! println!("hashed {} files", report.files_hashed);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Generator, verifier and unchecked-file finder.
pub mod crawler;

/// Digest algorithms and streaming file hashing.
pub mod digest;

/// Typed library errors.
pub mod error;

/// Include/exclude glob filtering.
pub mod filter;

/// Manifest format: parsing, formatting, reading and writing.
pub mod manifest;

/// Output formatting and verbosity control.
pub mod output;

/// Filesystem scanning and directory traversal utilities.
pub mod scanner;

#[cfg(test)]
pub mod test_utils;

use anyhow::Result;
use std::path::PathBuf;

/// Current version of the hashtool binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stem of the default manifest file name (`checksums.<algorithm>`).
pub const DEFAULT_MANIFEST_STEM: &str = "checksums";

/// Suffix appended to a manifest when it is backed up before overwriting.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Default configuration file path relative to the platform config directory.
pub const DEFAULT_CONFIG_PATH: &str = "hashtool/config.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "HASHTOOL_CONFIG";

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "HASHTOOL_LOG";

/// Configuration shared by all commands of one invocation.
#[derive(Debug, Clone)]
pub struct HashtoolContext {
    /// Path the configuration was loaded from (it may not exist).
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl HashtoolContext {
    /// Creates a context by loading the configuration from its default location.
    ///
    /// Unknown keys in the file are reported as warnings.
    ///
    /// # Errors
    /// Returns an error if no configuration location can be determined, or if
    /// the file exists but cannot be read or parsed.
    pub fn new() -> Result<Self> {
        let config_path = config::default_config_path()?;
        let config = config::Config::load(&config_path)?;

        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&config_path) {
            output::warning(&format!("Warning: Configuration validation failed: {e}"));
        }

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Creates a context around an in-memory configuration.
    #[must_use]
    pub fn from_config(config: config::Config) -> Self {
        Self {
            config_path: PathBuf::new(),
            config,
        }
    }
}
