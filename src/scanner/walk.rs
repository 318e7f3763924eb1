use crate::error::HashtoolError;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The contents of one visited directory.
///
/// Names are bare entry names as the filesystem reports them, sorted, so
/// names that are not valid UTF-8 still join back to the real entry. Symlinks are classified by what they
/// point to; dangling links are listed as files so that a manifest entry for
/// them is reported rather than silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// Absolute or root-prefixed path of the directory
    pub path: PathBuf,
    /// Names of immediate subdirectories
    pub subdirs: Vec<OsString>,
    /// Names of immediate non-directory entries
    pub files: Vec<OsString>,
}

impl DirListing {
    /// Read the immediate children of `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn read(dir: &Path) -> Result<Self> {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
            let name = entry.file_name();
            let is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
            if is_dir {
                subdirs.push(name);
            } else {
                files.push(name);
            }
        }

        subdirs.sort();
        files.sort();

        Ok(Self {
            path: dir.to_path_buf(),
            subdirs,
            files,
        })
    }

    /// Full path of a child entry.
    #[must_use]
    pub fn join<N: AsRef<OsStr>>(&self, name: N) -> PathBuf {
        self.path.join(name.as_ref())
    }
}

/// Walk `root` top-down and list every visited directory.
///
/// With `recursive == false` only `root` itself is listed. Otherwise the
/// whole subtree is visited pre-order, parents before children, siblings by
/// name. Symlinked directories are listed but not descended into.
///
/// # Errors
///
/// Returns [`HashtoolError::NotADirectory`] if `root` is not a directory, or
/// an I/O error if any directory in the tree cannot be read.
pub fn walk_directories(root: &Path, recursive: bool) -> Result<Vec<DirListing>> {
    if !root.is_dir() {
        return Err(HashtoolError::NotADirectory(root.to_path_buf()).into());
    }

    let max_depth = if recursive { usize::MAX } else { 0 };
    let mut listings = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_type().is_dir())
    {
        let entry = entry
            .with_context(|| format!("Failed to walk directory tree: {}", root.display()))?;
        listings.push(DirListing::read(entry.path())?);
    }

    Ok(listings)
}

/// Lexically normalize a path: `.` components are dropped and `..` removes
/// the preceding normal component. Symlinks are not consulted.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) =>
            {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir_all(root.join("zeta/inner")).unwrap();
        fs::create_dir_all(root.join("alpha")).unwrap();
        fs::write(root.join("zeta/inner/deep.txt"), "deep").unwrap();
        fs::write(root.join("alpha/one.txt"), "1").unwrap();
        temp
    }

    #[test]
    fn test_single_level_lists_only_root() {
        let temp = sample_tree();
        let listings = walk_directories(temp.path(), false).unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].path, temp.path());
        assert_eq!(listings[0].files, vec!["a.txt", "b.txt"]);
        assert_eq!(listings[0].subdirs, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_recursive_is_preorder_and_sorted() {
        let temp = sample_tree();
        let root = temp.path();
        let listings = walk_directories(root, true).unwrap();

        let visited: Vec<_> = listings.iter().map(|l| l.path.clone()).collect();
        assert_eq!(
            visited,
            vec![
                root.to_path_buf(),
                root.join("alpha"),
                root.join("zeta"),
                root.join("zeta/inner"),
            ]
        );
        assert_eq!(listings[3].files, vec!["deep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_join_back_to_real_file() {
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(temp.path().join(name), "latin-1").unwrap();

        let listing = DirListing::read(temp.path()).unwrap();

        assert_eq!(listing.files, vec![name.to_os_string()]);
        assert!(listing.join(&listing.files[0]).is_file());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = sample_tree();
        let err = walk_directories(&temp.path().join("a.txt"), true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HashtoolError>(),
            Some(HashtoolError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_normalize_path_drops_current_dir() {
        assert_eq!(
            normalize_path(Path::new("/data/./sub/./a.txt")),
            PathBuf::from("/data/sub/a.txt")
        );
        assert_eq!(normalize_path(Path::new("data/a.txt")), PathBuf::from("data/a.txt"));
        assert_eq!(
            normalize_path(Path::new("/data/sub/../a.txt")),
            PathBuf::from("/data/a.txt")
        );
        assert_eq!(normalize_path(Path::new("../a.txt")), PathBuf::from("../a.txt"));
    }
}
