//! core::repository::store
//!
//! Whole-repository persistence.
//!
//! # Semantics
//!
//! - [`RepoStore::read`] loads all three files; a missing repository
//!   directory or `config.toml` is [`RepositoryError::Missing`]. A missing
//!   `tmod.json` or `tmod.lock` reads as empty.
//! - [`RepoStore::write`] overwrites all three files unconditionally. Each
//!   file is written to a sibling temp file, synced, then renamed into
//!   place, so a crash leaves either the old or the new version of each
//!   file. The three renames are not one transaction.
//! - No locking. Two processes writing the same repository race, and the
//!   last writer wins.
//!
//! # Example
//!
//! ```no_run
//! use tmod::core::repository::{Configuration, RepoStore, Repository};
//! use tmod::core::types::{GameVersion, ModLoader};
//!
//! let store = RepoStore::new(".tmod");
//! let repo = Repository::new(Configuration::new(
//!     GameVersion::new("1.20.1").unwrap(),
//!     ModLoader::Forge,
//! ));
//! store.create(&repo).unwrap();
//!
//! let loaded = store.read().unwrap();
//! assert_eq!(loaded, repo);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::schema::{Configuration, LockEntry};
use super::Repository;
use crate::core::paths::RepoPaths;
use crate::core::types::Slug;

/// Errors from repository persistence.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No repository at the given location.
    #[error("no repository found at '{0}' (run `tmod init` first)")]
    Missing(PathBuf),

    /// `create` was called where a repository already exists.
    #[error("a repository already exists at '{0}'")]
    AlreadyExists(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize '{path}': {message}")]
    Serialize { path: PathBuf, message: String },
}

/// Reads and writes one repository directory.
#[derive(Debug, Clone)]
pub struct RepoStore {
    paths: RepoPaths,
}

impl RepoStore {
    /// Create a store for the repository at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: RepoPaths::new(root),
        }
    }

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    pub fn exists(&self) -> bool {
        self.paths.exists()
    }

    /// Load the full repository snapshot.
    pub fn read(&self) -> Result<Repository, RepositoryError> {
        if !self.paths.exists() {
            return Err(RepositoryError::Missing(self.paths.root().to_path_buf()));
        }

        let config_path = self.paths.config_path();
        let config: Configuration = toml::from_str(&read_file(&config_path)?).map_err(|e| {
            RepositoryError::Parse {
                path: config_path.clone(),
                message: e.to_string(),
            }
        })?;

        let manually_added: BTreeSet<Slug> =
            read_optional(&self.paths.manifest_path(), |text| {
                serde_json::from_str(text).map_err(|e| e.to_string())
            })?;

        let locks: BTreeMap<Slug, LockEntry> = read_optional(&self.paths.lock_path(), |text| {
            toml::from_str(text).map_err(|e| e.to_string())
        })?;

        debug!(
            repo = %self.paths.root().display(),
            roots = manually_added.len(),
            locks = locks.len(),
            "loaded repository"
        );

        Ok(Repository::from_parts(config, manually_added, locks))
    }

    /// Overwrite all persisted state with `repo`.
    pub fn write(&self, repo: &Repository) -> Result<(), RepositoryError> {
        let root = self.paths.root();
        fs::create_dir_all(root).map_err(|e| RepositoryError::Write {
            path: root.to_path_buf(),
            source: e,
        })?;

        let config_path = self.paths.config_path();
        let config = toml::to_string_pretty(repo.config()).map_err(|e| {
            RepositoryError::Serialize {
                path: config_path.clone(),
                message: e.to_string(),
            }
        })?;

        let manifest_path = self.paths.manifest_path();
        let manifest = serde_json::to_string_pretty(repo.manually_added()).map_err(|e| {
            RepositoryError::Serialize {
                path: manifest_path.clone(),
                message: e.to_string(),
            }
        })?;

        let lock_path = self.paths.lock_path();
        let locks = toml::to_string_pretty(repo.locks()).map_err(|e| {
            RepositoryError::Serialize {
                path: lock_path.clone(),
                message: e.to_string(),
            }
        })?;

        // Lock before manifest: a crash in between leaves extra locks, which
        // every reader tolerates, rather than roots without locks.
        write_atomic(&lock_path, &locks)?;
        write_atomic(&manifest_path, &manifest)?;
        write_atomic(&config_path, &config)?;

        debug!(
            repo = %root.display(),
            roots = repo.manually_added().len(),
            locks = repo.locks().len(),
            "wrote repository"
        );

        Ok(())
    }

    /// Write a brand-new repository, refusing to clobber an existing one.
    pub fn create(&self, repo: &Repository) -> Result<(), RepositoryError> {
        if self.paths.exists() {
            return Err(RepositoryError::AlreadyExists(
                self.paths.root().to_path_buf(),
            ));
        }
        self.write(repo)
    }
}

fn read_file(path: &Path) -> Result<String, RepositoryError> {
    fs::read_to_string(path).map_err(|e| RepositoryError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse a file that may legitimately be absent.
fn read_optional<T, F>(path: &Path, parse: F) -> Result<T, RepositoryError>
where
    T: DeserializeOwned + Default,
    F: FnOnce(&str) -> Result<T, String>,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let text = read_file(path)?;
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    parse(&text).map_err(|message| RepositoryError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Write a file via temp file + rename.
fn write_atomic(path: &Path, contents: &str) -> Result<(), RepositoryError> {
    let temp_path = temp_path_for(path);
    let write_err = |source| RepositoryError::Write {
        path: temp_path.clone(),
        source,
    };

    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| RepositoryError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GameVersion, ModLoader};
    use tempfile::TempDir;

    fn slug(s: &str) -> Slug {
        Slug::new(s).unwrap()
    }

    fn sample() -> Repository {
        let mut repo = Repository::new(Configuration::new(
            GameVersion::new("1.20.1").unwrap(),
            ModLoader::Forge,
        ));
        repo.add_root(slug("waystones"));
        repo.upsert_lock(
            slug("waystones"),
            LockEntry::new("2023-09-14T18:22:05.307Z", false, vec![slug("balm")]),
        );
        repo.upsert_lock(
            slug("balm"),
            LockEntry::new("2023-09-10T08:01:44.117Z", false, vec![]),
        );
        repo
    }

    #[test]
    fn read_missing_repository() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));

        match store.read() {
            Err(RepositoryError::Missing(path)) => assert!(path.ends_with(".tmod")),
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        let repo = sample();

        store.write(&repo).unwrap();
        assert_eq!(store.read().unwrap(), repo);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        store.write(&sample()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.paths().root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_overwrites_instead_of_merging() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        store.write(&sample()).unwrap();

        let mut smaller = sample();
        smaller.remove_root(&slug("waystones"));
        smaller.remove_lock(&slug("waystones"));
        store.write(&smaller).unwrap();

        let loaded = store.read().unwrap();
        assert!(loaded.manually_added().is_empty());
        assert_eq!(loaded.locks().len(), 1);
    }

    #[test]
    fn missing_manifest_and_lock_read_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        fs::create_dir_all(store.paths().root()).unwrap();
        fs::write(
            store.paths().config_path(),
            "game_version = \"1.21\"\nloader = \"Fabric\"\n",
        )
        .unwrap();

        let repo = store.read().unwrap();
        assert_eq!(repo.config().loader, ModLoader::Fabric);
        assert!(repo.manually_added().is_empty());
        assert!(repo.locks().is_empty());
    }

    #[test]
    fn corrupt_lock_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        store.write(&sample()).unwrap();
        fs::write(store.paths().lock_path(), "[waystones\n").unwrap();

        assert!(matches!(
            store.read(),
            Err(RepositoryError::Parse { .. })
        ));
    }

    #[test]
    fn manifest_is_sorted_json_array() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        let mut repo = sample();
        repo.add_root(slug("jei"));
        store.write(&repo).unwrap();

        let text = fs::read_to_string(store.paths().manifest_path()).unwrap();
        let roots: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(roots, vec!["jei".to_string(), "waystones".to_string()]);
    }

    #[test]
    fn create_refuses_existing_repository() {
        let temp = TempDir::new().unwrap();
        let store = RepoStore::new(temp.path().join(".tmod"));
        store.create(&sample()).unwrap();

        assert!(matches!(
            store.create(&sample()),
            Err(RepositoryError::AlreadyExists(_))
        ));
    }
}
