#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory tree fixture for end-to-end runs
pub struct TestTree {
    pub temp_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestTree {
    /// Create an empty tree
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            config_dir: TempDir::new()?,
        })
    }

    /// A small archive layout:
    ///
    /// ```text
    /// root/
    ///   readme.txt
    ///   notes.tmp
    ///   photos/
    ///     one.jpg
    ///     two.jpg
    ///     raw/
    ///       one.cr2
    /// ```
    pub fn archive() -> Result<Self> {
        let tree = Self::new()?;
        tree.write("readme.txt", "hello archive\n")?;
        tree.write("notes.tmp", "scratch")?;
        tree.write("photos/one.jpg", "jpeg-1")?;
        tree.write("photos/two.jpg", "jpeg-2")?;
        tree.write("photos/raw/one.cr2", "raw-1")?;
        Ok(tree)
    }

    /// Get the tree root
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a tree-relative name
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Read a file as text
    pub fn read(&self, name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(name))?)
    }

    /// The `hashtool` binary, isolated from the user's configuration
    pub fn hashtool(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("hashtool")?;
        cmd.env("HASHTOOL_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("HASHTOOL_LOG");
        Ok(cmd)
    }

    /// Location the binary reads its configuration from, outside the tree
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    /// Write the configuration file
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(self.config_path(), content)?;
        Ok(())
    }
}
