//! Checksum manifest codec.
//!
//! A manifest is a plain text file in the conventional checksum-file style:
//!
//! ```text
//! # Generated on 2024-01-15 10:30:00
//! d41d8cd98f00b204e9800998ecf8427e *empty.txt
//! 900150983cd24fb0d6963f7d28e17f72 *sub/abc.txt
//! ```
//!
//! The `*` marks binary mode. Reading is lenient: a `<hash> <path>` line is
//! accepted as well, and lines that do not split into a non-empty hash and
//! path are skipped without error so hand-edited manifests still load.

use crate::error::HashtoolError;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::Path;

/// Platform line separator used when writing manifests.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Platform line separator used when writing manifests.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Timestamp layout of the generation comment.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One `(path, digest)` line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the manifest's directory (or the processing root)
    pub path: String,
    /// Hex digest as written in the file
    pub digest: String,
}

impl ManifestEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: digest.into(),
        }
    }
}

/// How the paths inside a manifest are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathScope {
    /// Bare file names relative to the manifest's own directory
    Directory,
    /// Paths relative to the processing root, possibly nested
    Tree,
}

/// An in-memory manifest, built for one directory (or one tree) and then written.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Path convention every entry follows
    scope: PathScope,
    /// Entries in walk order
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Empty manifest for the given path convention.
    #[must_use]
    pub const fn new(scope: PathScope) -> Self {
        Self {
            scope,
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns [`HashtoolError::MixedPathModes`] when a directory-scoped
    /// manifest is given a path with a platform separator in it. A `\` is
    /// part of a legal file name on Unix and is accepted there.
    pub fn push(&mut self, entry: ManifestEntry) -> Result<(), HashtoolError> {
        if self.scope == PathScope::Directory
            && entry.path.chars().any(std::path::is_separator)
        {
            return Err(HashtoolError::MixedPathModes { path: entry.path });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render entries as manifest text stamped with `generated`.
#[must_use]
pub fn format_manifest(entries: &[ManifestEntry], generated: NaiveDateTime) -> String {
    let mut out = format!(
        "# Generated on {}{LINE_ENDING}",
        generated.format(TIMESTAMP_FORMAT)
    );
    for entry in entries {
        out.push_str(&entry.digest);
        out.push_str(" *");
        out.push_str(&entry.path);
        out.push_str(LINE_ENDING);
    }
    out
}

/// Parse manifest text into entries, preserving file order.
#[must_use]
pub fn parse_manifest(content: &str) -> Vec<ManifestEntry> {
    content.lines().filter_map(parse_line).collect()
}

/// Parse one manifest line. Comments and malformed lines yield `None`.
fn parse_line(line: &str) -> Option<ManifestEntry> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }

    let (digest, path) = line
        .split_once(" *")
        .or_else(|| line.split_once(' '))?;
    if digest.is_empty() || path.is_empty() {
        return None;
    }
    Some(ManifestEntry::new(path, digest))
}

/// Write `entries` to the manifest file at `path`, stamped with the local time.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let content = format_manifest(entries, Local::now().naive_local());
    fs::write(path, content)
        .with_context(|| format!("Failed to write checksum file: {}", path.display()))
}

/// Read and parse the manifest file at `path`.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read checksum file: {}", path.display()))?;
    Ok(parse_manifest(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_format_manifest_layout() {
        let entries = vec![
            ManifestEntry::new("a.txt", "0cc175b9c0f1b6a831c399e269772661"),
            ManifestEntry::new("sub/b.txt", "92eb5ffee6ae2fec3ad71c777531578f"),
        ];
        let text = format_manifest(&entries, fixed_time());
        let expected = [
            "# Generated on 2024-01-15 10:30:00",
            "0cc175b9c0f1b6a831c399e269772661 *a.txt",
            "92eb5ffee6ae2fec3ad71c777531578f *sub/b.txt",
            "",
        ]
        .join(LINE_ENDING);
        assert_eq!(text, expected);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# Generated on 2024-01-15 10:30:00\n\nabc *one.txt\n  # indented comment\n";
        assert_eq!(parse_manifest(text), vec![ManifestEntry::new("one.txt", "abc")]);
    }

    #[test]
    fn test_parse_accepts_single_space_form() {
        let entries = parse_manifest("abc123 plain.txt\n");
        assert_eq!(entries, vec![ManifestEntry::new("plain.txt", "abc123")]);
    }

    #[test]
    fn test_parse_keeps_spaces_inside_binary_paths() {
        let entries = parse_manifest("abc *name with spaces.txt\n");
        assert_eq!(entries, vec![ManifestEntry::new("name with spaces.txt", "abc")]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let entries = parse_manifest("# c\r\nabc *a.txt\r\ndef *b.txt\r\n");
        assert_eq!(
            entries,
            vec![ManifestEntry::new("a.txt", "abc"), ManifestEntry::new("b.txt", "def")]
        );
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = "justahash\n *leadingstar\nabc *\nabc *ok.txt\n";
        assert_eq!(parse_manifest(text), vec![ManifestEntry::new("ok.txt", "abc")]);
    }

    #[test]
    fn test_directory_scope_rejects_nested_paths() {
        let mut manifest = Manifest::new(PathScope::Directory);
        manifest.push(ManifestEntry::new("a.txt", "00")).unwrap();
        let err = manifest.push(ManifestEntry::new("sub/b.txt", "11")).unwrap_err();
        assert!(matches!(err, HashtoolError::MixedPathModes { .. }));
        assert_eq!(manifest.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_scope_accepts_backslash_names() {
        let mut manifest = Manifest::new(PathScope::Directory);
        manifest.push(ManifestEntry::new("a\\b.txt", "00")).unwrap();
        assert_eq!(manifest.entries()[0].path, "a\\b.txt");
    }

    #[cfg(windows)]
    #[test]
    fn test_directory_scope_rejects_backslash_paths() {
        let mut manifest = Manifest::new(PathScope::Directory);
        let err = manifest.push(ManifestEntry::new("sub\\b.txt", "11")).unwrap_err();
        assert!(matches!(err, HashtoolError::MixedPathModes { .. }));
    }

    #[test]
    fn test_tree_scope_accepts_nested_paths() {
        let mut manifest = Manifest::new(PathScope::Tree);
        manifest.push(ManifestEntry::new("a.txt", "00")).unwrap();
        manifest.push(ManifestEntry::new("sub/b.txt", "11")).unwrap();
        assert_eq!(manifest.entries()[1].path, "sub/b.txt");
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_write_then_read_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("checksums.md5");
        let entries = vec![
            ManifestEntry::new("z.txt", "aa"),
            ManifestEntry::new("a.txt", "bb"),
        ];
        write_manifest(&path, &entries)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("# Generated on "));
        assert_eq!(read_manifest(&path)?, entries);
        Ok(())
    }

    #[test]
    fn test_read_missing_manifest_fails() {
        let dir = tempdir().unwrap();
        assert!(read_manifest(&dir.path().join("missing.md5")).is_err());
    }
}
