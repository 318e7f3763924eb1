pub mod fixtures {
    use anyhow::Result;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A throwaway directory tree to run crawlers against.
    pub struct TestTree {
        pub temp_dir: TempDir,
    }

    impl TestTree {
        pub fn new() -> Result<Self> {
            Ok(Self {
                temp_dir: tempfile::tempdir()?,
            })
        }

        /// A tree with two top-level files and one nested subdirectory:
        ///
        /// ```text
        /// a.txt  b.txt  sub/c.txt  sub/deeper/d.txt
        /// ```
        pub fn sample() -> Result<Self> {
            let tree = Self::new()?;
            tree.create_file("a.txt", "alpha")?;
            tree.create_file("b.txt", "bravo")?;
            tree.create_file("sub/c.txt", "charlie")?;
            tree.create_file("sub/deeper/d.txt", "delta")?;
            Ok(tree)
        }

        pub fn root(&self) -> &Path {
            self.temp_dir.path()
        }

        pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
            let path = self.root().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            Ok(path)
        }

        pub fn read(&self, name: &str) -> Result<String> {
            Ok(fs::read_to_string(self.root().join(name))?)
        }
    }
}
