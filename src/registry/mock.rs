//! registry::mock
//!
//! Mock registry implementation for deterministic testing.
//!
//! # Design
//!
//! The mock registry stores mods and their files in memory, records every
//! call, and can be configured to fail a given operation. Downloads write
//! a small deterministic payload and are counted, so install idempotency
//! can be asserted without a network.
//!
//! # Example
//!
//! ```
//! use tmod::registry::mock::MockRegistry;
//! use tmod::registry::Registry;
//!
//! # tokio_test::block_on(async {
//! let registry = MockRegistry::new();
//! let waystones = registry.add_mod(245755, "waystones");
//! let balm = registry.add_mod(531761, "balm");
//! registry.add_file(&balm, "2024-01-01T00:00:00Z", &[]);
//! registry.add_file(&waystones, "2024-02-01T00:00:00Z", &[531761]);
//!
//! let found = registry.search_mod_by_id(245755).await.unwrap();
//! assert_eq!(found.slug.as_str(), "waystones");
//! # });
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{select_file, Registry, RegistryError};
use super::types::{Mod, ModFile, ModLinks, Relation, RelationKind};
use crate::core::types::{GameVersion, ModLoader, Slug};

/// Game id the mock reports for Minecraft.
pub const MOCK_GAME_ID: u32 = 432;

/// Mock registry for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockRegistry {
    inner: Arc<Mutex<MockRegistryInner>>,
}

#[derive(Debug, Default)]
struct MockRegistryInner {
    mods: HashMap<u32, Mod>,
    /// Files per mod id. Every file is offered for every target.
    files: HashMap<u32, Vec<ModFile>>,
    next_file_id: u32,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
    downloads: usize,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail search_mod_by_id with the given error.
    SearchModById(RegistryError),
    /// Fail search_mod_by_slug with the given error.
    SearchModBySlug(RegistryError),
    /// Fail get_file for the given mod id.
    GetFile(u32, RegistryError),
    /// Fail downloading the given file name.
    Download(String, RegistryError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    SearchModById { id: u32 },
    SearchModBySlug { slug: String },
    GetFile { mod_id: u32, timestamp: Option<String> },
    Download { file_name: String },
}

impl MockRegistry {
    /// Create a new empty mock registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRegistryInner {
                next_file_id: 1,
                ..Default::default()
            })),
        }
    }

    /// Register a Minecraft mod and return it.
    pub fn add_mod(&self, id: u32, slug: &str) -> Mod {
        self.insert_mod(id, slug, MOCK_GAME_ID)
    }

    /// Register a mod that belongs to some other game.
    pub fn add_foreign_mod(&self, id: u32, slug: &str, game_id: u32) -> Mod {
        self.insert_mod(id, slug, game_id)
    }

    fn insert_mod(&self, id: u32, slug: &str, game_id: u32) -> Mod {
        let m = Mod {
            id,
            game_id,
            name: slug.to_string(),
            slug: Slug::new(slug).expect("mock slug must be valid"),
            summary: format!("The {} mod", slug),
            links: ModLinks {
                website_url: Some(format!("https://www.curseforge.com/minecraft/mc-mods/{}", slug)),
            },
            download_count: 0.0,
        };
        let mut inner = self.inner.lock().unwrap();
        inner.mods.insert(id, m.clone());
        m
    }

    /// Add a file with required dependencies on `requires`.
    pub fn add_file(&self, m: &Mod, file_date: &str, requires: &[u32]) -> ModFile {
        let relations = requires
            .iter()
            .map(|&mod_id| Relation {
                mod_id,
                kind: RelationKind::RequiredDependency,
            })
            .collect();
        self.add_file_with_relations(m, file_date, relations)
    }

    /// Add a file with arbitrary relations.
    pub fn add_file_with_relations(
        &self,
        m: &Mod,
        file_date: &str,
        relations: Vec<Relation>,
    ) -> ModFile {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_file_id;
        inner.next_file_id += 1;

        let file = ModFile {
            id,
            mod_id: m.id,
            display_name: format!("{} {}", m.name, id),
            file_name: format!("{}-{}.jar", m.slug, id),
            file_date: file_date.to_string(),
            file_length: 0,
            download_url: Some(format!("https://mock.invalid/{}/{}", m.id, id)),
            hashes: vec![],
            relations,
        };
        inner.files.entry(m.id).or_default().push(file.clone());
        file
    }

    /// Withdraw every file of a mod (as if delisted).
    pub fn remove_files(&self, mod_id: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.files.remove(&mod_id);
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.set_fail_on(fail_on);
        self
    }

    /// Configure a failure on a shared handle.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail_on);
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Number of downloads that wrote a file.
    pub fn download_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.downloads
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn check_fail(&self, op: &MockOperation) -> Option<RegistryError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, op) {
            (Some(FailOn::SearchModById(e)), MockOperation::SearchModById { .. }) => {
                Some(e.clone())
            }
            (Some(FailOn::SearchModBySlug(e)), MockOperation::SearchModBySlug { .. }) => {
                Some(e.clone())
            }
            (Some(FailOn::GetFile(id, e)), MockOperation::GetFile { mod_id, .. })
                if id == mod_id =>
            {
                Some(e.clone())
            }
            (Some(FailOn::Download(name, e)), MockOperation::Download { file_name })
                if name == file_name =>
            {
                Some(e.clone())
            }
            _ => None,
        }
    }

    /// Record `op` and return the configured failure for it, if any.
    fn enter(&self, op: MockOperation) -> Result<(), RegistryError> {
        let failure = self.check_fail(&op);
        self.record(op);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn minecraft_only(m: Option<Mod>, query: String) -> Result<Mod, RegistryError> {
        m.filter(|m| m.game_id == MOCK_GAME_ID)
            .ok_or(RegistryError::ModSearchFailed(query))
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_mod_by_id(&self, id: u32) -> Result<Mod, RegistryError> {
        self.enter(MockOperation::SearchModById { id })?;

        let found = self.inner.lock().unwrap().mods.get(&id).cloned();
        Self::minecraft_only(found, id.to_string())
    }

    async fn search_mod_by_slug(&self, slug: &Slug) -> Result<Mod, RegistryError> {
        self.enter(MockOperation::SearchModBySlug {
            slug: slug.to_string(),
        })?;

        let found = self
            .inner
            .lock()
            .unwrap()
            .mods
            .values()
            .find(|m| &m.slug == slug)
            .cloned();
        Self::minecraft_only(found, slug.to_string())
    }

    async fn get_file(
        &self,
        m: &Mod,
        game_version: &GameVersion,
        loader: ModLoader,
        timestamp: Option<&str>,
    ) -> Result<ModFile, RegistryError> {
        self.enter(MockOperation::GetFile {
            mod_id: m.id,
            timestamp: timestamp.map(str::to_string),
        })?;

        let candidates = self
            .inner
            .lock()
            .unwrap()
            .files
            .get(&m.id)
            .cloned()
            .unwrap_or_default();
        select_file(m, game_version, loader, candidates, timestamp)
    }

    async fn download(&self, file: &ModFile, dest: &Path) -> Result<(), RegistryError> {
        self.enter(MockOperation::Download {
            file_name: file.file_name.clone(),
        })?;

        if file.download_url.is_none() {
            return Err(RegistryError::DownloadUnavailable {
                file_name: file.file_name.clone(),
            });
        }

        let contents = format!("{}:{}\n", file.mod_id, file.id);
        tokio::fs::write(dest, contents)
            .await
            .map_err(|e| RegistryError::Io {
                path: dest.display().to_string(),
                message: e.to_string(),
            })?;

        self.inner.lock().unwrap().downloads += 1;
        Ok(())
    }
}
