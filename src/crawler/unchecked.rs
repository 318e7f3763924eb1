use super::DirectoryCrawler;
use crate::error::HashtoolError;
use crate::filter::GlobFilter;
use crate::manifest::read_manifest;
use crate::output::{self, Level};
use crate::scanner::{DirListing, normalize_path, walk_directories};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{Level as TraceLevel, debug, span};

/// When files are compared against the referenced paths collected so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareScope {
    /// After the whole walk: a manifest anywhere in the tree covers a file
    /// anywhere in the tree.
    #[default]
    Tree,
    /// Right after each directory's manifests are read: only manifests in
    /// the directory itself or its ancestors cover a file.
    Directory,
}

impl CompareScope {
    /// Name used on the command line and in the config file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for CompareScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompareScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "directory" | "dir" => Ok(Self::Directory),
            other => Err(format!("unknown scope '{other}' (expected 'tree' or 'directory')")),
        }
    }
}

/// Settings for one unchecked-file search.
#[derive(Debug, Clone)]
pub struct UncheckedOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Files matching any of these globs are read as manifests; required
    pub checkfiles: Vec<String>,
    /// Only consider files whose name matches one of these (all if empty)
    pub include: Vec<String>,
    /// Never consider files whose name matches one of these
    pub exclude: Vec<String>,
    /// When to compare
    pub scope: CompareScope,
}

impl UncheckedOptions {
    /// Defaults for the given manifest globs: single level, tree-wide comparison.
    #[must_use]
    pub const fn new(checkfiles: Vec<String>) -> Self {
        Self {
            recursive: false,
            checkfiles,
            include: Vec::new(),
            exclude: Vec::new(),
            scope: CompareScope::Tree,
        }
    }
}

/// Whether a tree file is referenced by some manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Listed in a manifest
    Ok,
    /// Not listed anywhere
    Unchecked,
}

/// Classification of every considered file, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncheckedReport {
    /// `(path, status)` per considered file
    pub files: Vec<(PathBuf, FileStatus)>,
}

impl UncheckedReport {
    /// Paths no manifest references.
    #[must_use]
    pub fn unchecked(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|(_, status)| *status == FileStatus::Unchecked)
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// Fold another root's results into this report.
    pub fn merge(&mut self, other: Self) {
        self.files.extend(other.files);
    }
}

/// Reports files in a tree that no manifest references.
///
/// Manifest files themselves are never candidates.
#[derive(Debug)]
pub struct UncheckedFinder {
    /// Run settings
    options: UncheckedOptions,
    /// Candidate file filter
    filter: GlobFilter,
    /// Which files are manifests
    checkfiles: GlobFilter,
}

impl UncheckedFinder {
    /// Validate `options` and build a finder.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkfile glob is given or any glob does not
    /// compile.
    pub fn new(options: UncheckedOptions) -> Result<Self> {
        if options.checkfiles.is_empty() {
            return Err(HashtoolError::MissingCheckfileGlobs.into());
        }
        let filter = GlobFilter::new(&options.include, &options.exclude)?;
        let checkfiles = GlobFilter::including(&options.checkfiles)?;
        Ok(Self {
            options,
            filter,
            checkfiles,
        })
    }

    /// Add every path referenced by manifests in `listing` to `known`.
    fn collect_references(&self, listing: &DirListing, known: &mut HashSet<PathBuf>) -> Result<()> {
        for name in listing.files.iter().filter(|n| self.checkfiles.matches(n)) {
            let manifest_path = listing.join(name);
            let entries = read_manifest(&manifest_path)?;
            debug!(path = %manifest_path.display(), entries = entries.len(), "Manifest read");
            known.extend(
                entries
                    .iter()
                    .map(|entry| normalize_path(&listing.path.join(&entry.path))),
            );
        }
        Ok(())
    }

    /// Candidate files of one directory.
    fn candidates(&self, listing: &DirListing) -> Vec<PathBuf> {
        listing
            .files
            .iter()
            .filter(|n| self.filter.matches(n) && !self.checkfiles.matches(n))
            .map(|n| listing.join(n))
            .collect()
    }

    /// Classify `files` against `known` and report each one.
    fn classify(files: Vec<PathBuf>, known: &HashSet<PathBuf>, report: &mut UncheckedReport) {
        for path in files {
            let status = if known.contains(&normalize_path(&path)) {
                output::status(Level::Debug, "OK", &path.display().to_string());
                FileStatus::Ok
            } else {
                output::status(Level::Warning, "UNCHECKED", &path.display().to_string());
                FileStatus::Unchecked
            };
            report.files.push((path, status));
        }
    }
}

impl DirectoryCrawler for UncheckedFinder {
    type Report = UncheckedReport;

    fn process_directory(&self, root: &Path) -> Result<UncheckedReport> {
        let span = span!(TraceLevel::DEBUG, "unchecked", root = %root.display(), scope = %self.options.scope);
        let _guard = span.enter();

        let mut known = HashSet::new();
        let mut pending = Vec::new();
        let mut report = UncheckedReport::default();

        for listing in walk_directories(root, self.options.recursive)? {
            output::debug(&format!(
                "Processing files in directory {} ...",
                listing.path.display()
            ));

            self.collect_references(&listing, &mut known)?;
            let files = self.candidates(&listing);
            match self.options.scope {
                CompareScope::Directory => Self::classify(files, &known, &mut report),
                CompareScope::Tree => pending.extend(files),
            }
        }

        Self::classify(pending, &known, &mut report);
        Ok(report)
    }
}
