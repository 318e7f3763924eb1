//! Command-line interface definitions for hashtool.
//!
//! This module contains all CLI argument parsing structures using clap's derive macros.
//! The CLI definitions are shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes and doc comments,
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::crawler::CompareScope;
use crate::digest::Algorithm;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for hashtool.
#[derive(Parser)]
#[command(
    name = "hashtool",
    version = crate::VERSION,
    about = "Generate and verify checksum manifests for directory trees",
    long_about = "Generate and verify md5sum/sha*sum style checksum manifests, \
                  and find files that no manifest covers"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show informational messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show per-file debug messages
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Globs shared by every crawling command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only process files whose name matches this glob (repeatable)
    #[arg(short, long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip files whose name matches this glob (repeatable, wins over --include)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

/// Arguments of `hashtool generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Hash algorithm
    #[arg(value_parser = parse_algorithm, value_name = "ALGORITHM")]
    pub algorithm: Algorithm,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Write a single manifest at each root with tree-relative paths
    #[arg(short, long = "basedir")]
    pub basedir: bool,

    /// Manifest file name (default: checksums.<algorithm>)
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Overwrite existing files matching this glob instead of --filename (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub overwrite: Vec<String>,

    /// Do not keep a .bak copy of a replaced manifest
    #[arg(short, long)]
    pub no_backup: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directories to process
    #[arg(required = true, value_name = "DIR")]
    pub directories: Vec<PathBuf>,
}

/// Arguments of `hashtool verify`.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Hash algorithm
    #[arg(value_parser = parse_algorithm, value_name = "ALGORITHM")]
    pub algorithm: Algorithm,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Glob selecting manifest files (repeatable, default: *.<algorithm>)
    #[arg(short = 'f', long = "checkfile", value_name = "GLOB")]
    pub checkfiles: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directories to process
    #[arg(required = true, value_name = "DIR")]
    pub directories: Vec<PathBuf>,
}

/// Arguments of `hashtool unchecked`.
#[derive(Args, Debug, Clone)]
pub struct UncheckedArgs {
    /// Glob selecting manifest files (repeatable, at least one required)
    #[arg(short = 'f', long = "checkfile", value_name = "GLOB", required = true)]
    pub checkfiles: Vec<String>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Compare after the whole walk (tree) or per directory (directory)
    #[arg(long, value_name = "SCOPE")]
    pub scope: Option<CompareScope>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directories to process
    #[arg(required = true, value_name = "DIR")]
    pub directories: Vec<PathBuf>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Write checksum manifests for directories
    Generate(GenerateArgs),

    /// Check files against existing checksum manifests
    Verify(VerifyArgs),

    /// List files that no checksum manifest references
    Unchecked(UncheckedArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Value parser turning an algorithm name into an [`Algorithm`].
fn parse_algorithm(value: &str) -> Result<Algorithm, String> {
    value.parse().map_err(|e: crate::error::HashtoolError| e.to_string())
}
