//! The three tree operations: generate, verify and find unchecked files.
//!
//! Each crawler owns an immutable options struct, compiles its globs once at
//! construction and exposes a single [`DirectoryCrawler::process_directory`]
//! entry point that walks one root and returns a report. They share the
//! walker in [`crate::scanner`], the filter in [`crate::filter`], the codec
//! in [`crate::manifest`] and the digest engine in [`crate::digest`].

/// Manifest generation.
pub mod generator;

/// Cross-referencing tree files against manifests.
pub mod unchecked;

/// Manifest verification.
pub mod verifier;

use anyhow::Result;
use std::path::Path;

pub use generator::{GenerateOptions, GenerateReport, Generator};
pub use unchecked::{CompareScope, FileStatus, UncheckedFinder, UncheckedOptions, UncheckedReport};
pub use verifier::{
    EntryReport, EntryStatus, ManifestReport, ManifestStatus, VerifyOptions, VerifyReport, Verifier,
};

/// A walker that processes one root directory per call.
pub trait DirectoryCrawler {
    /// What one call reports back.
    type Report;

    /// Walk `root` according to the crawler's recursion policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a directory or any file or
    /// manifest cannot be read or written.
    fn process_directory(&self, root: &Path) -> Result<Self::Report>;
}
