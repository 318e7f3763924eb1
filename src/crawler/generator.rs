use super::DirectoryCrawler;
use crate::digest::{Algorithm, hash_file};
use crate::filter::{GlobFilter, compile_globs};
use crate::manifest::{Manifest, ManifestEntry, PathScope, write_manifest};
use crate::output;
use crate::scanner::{DirListing, walk_directories};
use anyhow::{Context, Result};
use glob::Pattern;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Hash function for every file
    pub algorithm: Algorithm,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Write a single tree-wide manifest at the root instead of one per directory
    pub basedir_only: bool,
    /// Manifest file name used when no overwrite glob selects a target
    pub filename: String,
    /// Existing files matching any of these globs are replaced by the manifest
    pub overwrite: Vec<String>,
    /// Rename replaced files to `<name>.bak` first
    pub backup: bool,
    /// Only hash files whose name matches one of these (all if empty)
    pub include: Vec<String>,
    /// Never hash files whose name matches one of these
    pub exclude: Vec<String>,
}

impl GenerateOptions {
    /// Defaults for `algorithm`: single level, per-directory manifests named
    /// `checksums.<algorithm>`, backups on, no filtering.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            recursive: false,
            basedir_only: false,
            filename: algorithm.default_manifest_name(),
            overwrite: Vec::new(),
            backup: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Number of files hashed
    pub files_hashed: usize,
    /// Manifest files written, in write order
    pub manifests: Vec<PathBuf>,
    /// Backup files created, in creation order
    pub backups: Vec<PathBuf>,
}

impl GenerateReport {
    /// Fold another root's results into this report.
    pub fn merge(&mut self, other: Self) {
        self.files_hashed += other.files_hashed;
        self.manifests.extend(other.manifests);
        self.backups.extend(other.backups);
    }
}

/// Creates checksum manifests for the files in a directory tree.
///
/// ```no_run
/// use hashtool::crawler::{DirectoryCrawler, GenerateOptions, Generator};
/// use hashtool::digest::Algorithm;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut options = GenerateOptions::new(Algorithm::Sha256);
/// options.recursive = true;
/// options.exclude = vec!["*.tmp".into(), "*.bak".into()];
///
/// let report = Generator::new(options)?.process_directory("/home/foo/bar".as_ref())?;
/// println!("{} files hashed", report.files_hashed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Generator {
    /// Run settings
    options: GenerateOptions,
    /// Compiled include/exclude filter
    filter: GlobFilter,
    /// Compiled overwrite globs
    overwrite: Vec<Pattern>,
}

impl Generator {
    /// Validate `options` and build a generator.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob does not compile.
    pub fn new(options: GenerateOptions) -> Result<Self> {
        let filter = GlobFilter::new(&options.include, &options.exclude)?;
        let overwrite = compile_globs(&options.overwrite)?;
        Ok(Self {
            options,
            filter,
            overwrite,
        })
    }

    /// Whether `name` is a file this generator writes (or backs up).
    fn is_own_output(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        let is_target =
            |n: &str| n == self.options.filename || self.overwrite.iter().any(|g| g.matches(n));
        is_target(&name)
            || name
                .strip_suffix(crate::BACKUP_SUFFIX)
                .is_some_and(is_target)
    }

    /// Hash the selected files of one directory into both manifests.
    fn hash_directory(
        &self,
        root: &Path,
        listing: &DirListing,
        local: &mut Manifest,
        tree: &mut Manifest,
    ) -> Result<()> {
        let selected = listing
            .files
            .iter()
            .filter(|name| self.filter.matches(name) && !self.is_own_output(name));

        for name in selected {
            let path = listing.join(name);
            let digest = hash_file(self.options.algorithm, &path)?;
            let text = name.to_string_lossy();
            output::debug(&format!("{text} -> {digest}"));
            if name.to_str().is_none() {
                output::warning(&format!(
                    "File name {} is not valid UTF-8; its manifest entry will not match it",
                    path.display()
                ));
            }

            let relative = path.strip_prefix(root).unwrap_or(&path);
            tree.push(ManifestEntry::new(
                relative.to_string_lossy().into_owned(),
                digest.clone(),
            ))?;
            local.push(ManifestEntry::new(text.into_owned(), digest))?;
        }
        Ok(())
    }

    /// Pick the file names a manifest for `dir` is written to.
    ///
    /// Every existing regular file matching an overwrite glob is a target.
    /// Without overwrite globs, or when none matches, the configured file
    /// name is the single target.
    fn write_targets(&self, dir: &Path) -> Result<Vec<OsString>> {
        let mut targets: Vec<OsString> = Vec::new();

        if !self.overwrite.is_empty() {
            let listing = DirListing::read(dir)?;
            for glob in &self.overwrite {
                for name in &listing.files {
                    if glob.matches(&name.to_string_lossy())
                        && !targets.contains(name)
                        && listing.join(name).is_file()
                    {
                        targets.push(name.clone());
                    }
                }
            }
        }

        if targets.is_empty() {
            targets.push(OsString::from(&self.options.filename));
        }
        Ok(targets)
    }

    /// Write `manifest` into `dir` following the overwrite and backup policy.
    fn write_hashinfo(
        &self,
        dir: &Path,
        manifest: &Manifest,
        report: &mut GenerateReport,
    ) -> Result<()> {
        for target in self.write_targets(dir)? {
            let path = dir.join(&target);

            if self.options.backup && path.exists() {
                let backup = backup_path(&path);
                fs::rename(&path, &backup).with_context(|| {
                    format!(
                        "Failed to back up {} to {}",
                        path.display(),
                        backup.display()
                    )
                })?;
                output::info(&format!("Backing-up {} ...", path.display()));
                report.backups.push(backup);
            }

            write_manifest(&path, manifest.entries())?;
            output::info(&format!("Checksum file {} generated.", path.display()));
            debug!(path = %path.display(), entries = manifest.len(), "Manifest written");
            report.manifests.push(path);
        }
        Ok(())
    }
}

impl DirectoryCrawler for Generator {
    type Report = GenerateReport;

    fn process_directory(&self, root: &Path) -> Result<GenerateReport> {
        let span = span!(Level::DEBUG, "generate", root = %root.display());
        let _guard = span.enter();

        let mut report = GenerateReport::default();
        let mut tree = Manifest::new(PathScope::Tree);

        for listing in walk_directories(root, self.options.recursive)? {
            output::debug(&format!(
                "Processing files in directory {} ...",
                listing.path.display()
            ));

            let mut local = Manifest::new(PathScope::Directory);
            self.hash_directory(root, &listing, &mut local, &mut tree)?;
            report.files_hashed += local.len();

            if !self.options.basedir_only && !local.is_empty() {
                self.write_hashinfo(&listing.path, &local, &mut report)?;
            }
        }

        if self.options.basedir_only && !tree.is_empty() {
            self.write_hashinfo(root, &tree, &mut report)?;
        }

        Ok(report)
    }
}

/// `<path>.bak`, keeping the full original file name.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(crate::BACKUP_SUFFIX);
    PathBuf::from(name)
}
