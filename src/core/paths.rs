//! core::paths
//!
//! Centralized path routing for repository storage.
//!
//! # Storage Layout
//!
//! A repository is a directory (default `.tmod`) holding:
//! - `config.toml` - Target game version and mod loader
//! - `tmod.json` - Manually added mods (the roots)
//! - `tmod.lock` - Pinned file for every root and dependency
//!
//! No code outside this module should compute `*.join("tmod.lock")` style
//! paths.
//!
//! # Example
//!
//! ```
//! use tmod::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/srv/pack/.tmod"));
//!
//! assert_eq!(paths.config_path(), PathBuf::from("/srv/pack/.tmod/config.toml"));
//! assert_eq!(paths.lock_path(), PathBuf::from("/srv/pack/.tmod/tmod.lock"));
//! ```

use std::path::{Path, PathBuf};

/// Default repository directory, relative to the working directory.
pub const DEFAULT_REPO_DIR: &str = ".tmod";

/// Default install directory, relative to the working directory.
pub const DEFAULT_MODS_DIR: &str = "mods";

const CONFIG_FILE: &str = "config.toml";
const MANIFEST_FILE: &str = "tmod.json";
const LOCK_FILE: &str = "tmod.lock";

/// Paths of the files backing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    root: PathBuf,
}

impl RepoPaths {
    /// Create paths rooted at the given repository directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/config.toml`
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `<root>/tmod.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// `<root>/tmod.lock`
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Whether a repository has been initialized here.
    ///
    /// The configuration file is the marker; the manifest and lock file are
    /// optional and read as empty when absent.
    pub fn exists(&self) -> bool {
        self.config_path().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_are_under_root() {
        let paths = RepoPaths::new("/repo/.tmod");
        assert_eq!(paths.root(), Path::new("/repo/.tmod"));
        assert_eq!(paths.manifest_path(), PathBuf::from("/repo/.tmod/tmod.json"));
    }

    #[test]
    fn exists_requires_config_file() {
        let temp = TempDir::new().unwrap();
        let paths = RepoPaths::new(temp.path().join(".tmod"));
        assert!(!paths.exists());

        std::fs::create_dir_all(paths.root()).unwrap();
        assert!(!paths.exists());

        std::fs::write(paths.config_path(), "").unwrap();
        assert!(paths.exists());
    }
}
