//! Typed failures raised by the checksum core.
//!
//! I/O failures are not listed here: they travel as `anyhow::Error` with the
//! offending path attached as context. Per-entry verification findings
//! (missing files, digest mismatches) are report values, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an operation before or during a walk.
#[derive(Debug, Error)]
pub enum HashtoolError {
    /// The requested digest name is not one of the supported algorithms.
    #[error("Unsupported hash algorithm: '{0}' (expected one of md5, sha1, sha224, sha256, sha384, sha512, crc32)")]
    UnsupportedAlgorithm(String),

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob {
        /// The pattern as given by the user
        pattern: String,
        /// Why the glob crate rejected it
        reason: String,
    },

    /// A per-directory manifest was handed a nested path.
    #[error("Path '{path}' is not a bare file name; per-directory manifests cannot hold tree-relative paths")]
    MixedPathModes {
        /// The rejected entry path
        path: String,
    },

    /// A root passed for processing is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The unchecked-file finder needs to know which files are manifests.
    #[error("At least one checksum file glob is required")]
    MissingCheckfileGlobs,
}
