use super::DirectoryCrawler;
use crate::digest::{Algorithm, hash_file};
use crate::filter::GlobFilter;
use crate::manifest::read_manifest;
use crate::output::{self, Level};
use crate::scanner::walk_directories;
use anyhow::Result;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Level as TraceLevel, debug, span};

/// Settings for one verification run.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Hash function the manifests were generated with
    pub algorithm: Algorithm,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Files matching any of these globs are treated as manifests
    pub checkfiles: Vec<String>,
    /// Only verify entries whose file name matches one of these (all if empty)
    pub include: Vec<String>,
    /// Skip entries whose file name matches one of these
    pub exclude: Vec<String>,
}

impl VerifyOptions {
    /// Defaults for `algorithm`: single level, manifests found by `*.<algorithm>`.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            recursive: false,
            checkfiles: vec![algorithm.default_checkfile_glob()],
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Outcome for one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Digest matches
    Ok,
    /// Referenced file does not exist
    Missing,
    /// Digest differs
    Invalid,
    /// Entry filtered out by include/exclude
    Skipped,
}

impl EntryStatus {
    /// Whether this outcome fails its manifest.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Missing | Self::Invalid)
    }

    /// Tag printed in front of the path.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Missing => "MISSING",
            Self::Invalid => "INVALID",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Console level the outcome is reported at.
    const fn level(self) -> Level {
        match self {
            Self::Ok | Self::Skipped => Level::Debug,
            Self::Missing | Self::Invalid => Level::Error,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Overall outcome for one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStatus {
    /// Every checked entry matched
    Ok,
    /// At least one entry was missing or invalid
    Error,
}

/// One entry's verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Entry path resolved against the manifest's directory
    pub path: PathBuf,
    /// What was found
    pub status: EntryStatus,
}

/// One manifest's verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    /// Path of the manifest file
    pub path: PathBuf,
    /// Overall status
    pub status: ManifestStatus,
    /// Per-entry results in manifest order
    pub entries: Vec<EntryReport>,
}

impl ManifestReport {
    /// Number of entries with the given status.
    #[must_use]
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Everything a verification run found, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Manifest results
    pub manifests: Vec<ManifestReport>,
}

impl VerifyReport {
    /// Number of entries with the given status across all manifests.
    #[must_use]
    pub fn count(&self, status: EntryStatus) -> usize {
        self.manifests.iter().map(|m| m.count(status)).sum()
    }

    /// Number of manifests with status `Error`.
    #[must_use]
    pub fn failed_manifests(&self) -> usize {
        self.manifests
            .iter()
            .filter(|m| m.status == ManifestStatus::Error)
            .count()
    }

    /// Whether every manifest verified.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failed_manifests() == 0
    }

    /// Fold another root's results into this report.
    pub fn merge(&mut self, other: Self) {
        self.manifests.extend(other.manifests);
    }
}

/// Finds manifests in a directory tree and checks every entry they list.
#[derive(Debug)]
pub struct Verifier {
    /// Run settings
    options: VerifyOptions,
    /// Entry filter on the referenced file's name
    filter: GlobFilter,
    /// Which files are manifests
    checkfiles: GlobFilter,
}

impl Verifier {
    /// Validate `options` and build a verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob does not compile.
    pub fn new(options: VerifyOptions) -> Result<Self> {
        let filter = GlobFilter::new(&options.include, &options.exclude)?;
        let checkfiles = if options.checkfiles.is_empty() {
            GlobFilter::including(&[options.algorithm.default_checkfile_glob()])?
        } else {
            GlobFilter::including(&options.checkfiles)?
        };
        Ok(Self {
            options,
            filter,
            checkfiles,
        })
    }

    /// Check one entry of a manifest living in `dir`.
    fn verify_entry(&self, dir: &Path, entry_path: &str, stored: &str) -> Result<EntryReport> {
        let path = dir.join(entry_path);
        let name = Path::new(entry_path)
            .file_name()
            .unwrap_or_else(|| OsStr::new(entry_path));

        let status = if !self.filter.matches(name) {
            EntryStatus::Skipped
        } else if !path.is_file() {
            EntryStatus::Missing
        } else {
            let actual = hash_file(self.options.algorithm, &path)?;
            if actual.eq_ignore_ascii_case(stored) {
                EntryStatus::Ok
            } else {
                debug!(expected = stored, actual = %actual, path = %path.display(), "Digest mismatch");
                EntryStatus::Invalid
            }
        };

        output::status(status.level(), status.tag(), &path.display().to_string());
        Ok(EntryReport { path, status })
    }

    /// Verify every entry listed in the manifest at `manifest_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or an existing listed file cannot be read.
    pub fn verify_manifest(&self, dir: &Path, manifest_path: &Path) -> Result<ManifestReport> {
        let span = span!(TraceLevel::DEBUG, "verify_manifest", path = %manifest_path.display());
        let _guard = span.enter();

        output::debug(&format!("Verifying file {} ...", manifest_path.display()));

        let entries = read_manifest(manifest_path)?
            .iter()
            .map(|entry| self.verify_entry(dir, &entry.path, &entry.digest))
            .collect::<Result<Vec<_>>>()?;

        let status = if entries.iter().any(|e| e.status.is_failure()) {
            output::error(&format!("{}: ERROR!", manifest_path.display()));
            ManifestStatus::Error
        } else {
            output::info(&format!("{}: OK", manifest_path.display()));
            ManifestStatus::Ok
        };

        Ok(ManifestReport {
            path: manifest_path.to_path_buf(),
            status,
            entries,
        })
    }
}

impl DirectoryCrawler for Verifier {
    type Report = VerifyReport;

    fn process_directory(&self, root: &Path) -> Result<VerifyReport> {
        let span = span!(TraceLevel::DEBUG, "verify", root = %root.display());
        let _guard = span.enter();

        let mut report = VerifyReport::default();
        for listing in walk_directories(root, self.options.recursive)? {
            output::debug(&format!(
                "Processing files in directory {} ...",
                listing.path.display()
            ));

            for name in listing.files.iter().filter(|n| self.checkfiles.matches(n)) {
                let manifest_path = listing.join(name);
                report
                    .manifests
                    .push(self.verify_manifest(&listing.path, &manifest_path)?);
            }
        }
        Ok(report)
    }
}
