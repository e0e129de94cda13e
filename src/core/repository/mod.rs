//! core::repository
//!
//! In-memory repository model and its persistence.
//!
//! # Modules
//!
//! - [`schema`] - Persisted records: configuration and lock entries
//! - [`store`] - Whole-repository read/write
//!
//! # Model
//!
//! A repository is three pieces of state:
//! - the [`Configuration`] (game version + loader), fixed at `init`
//! - the manually added roots, a set of slugs
//! - the locks, one [`LockEntry`] per root and per transitive dependency
//!
//! Every command loads one fresh snapshot, mutates it in memory, and (for
//! mutating commands) writes it back in full.
//!
//! # Invariants
//!
//! - Every root has a lock entry
//! - Every dependency named by a lock entry has a lock entry
//!
//! These are checked by [`crate::core::verify`], not enforced by the type,
//! because a hand-edited lock file may violate them and read-only commands
//! must still be able to show it.

pub mod schema;
pub mod store;

pub use schema::{Configuration, LockEntry};
pub use store::{RepoStore, RepositoryError};

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::Slug;

/// Loaded repository state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    config: Configuration,
    manually_added: BTreeSet<Slug>,
    locks: BTreeMap<Slug, LockEntry>,
}

impl Repository {
    /// A fresh, empty repository for the given target.
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            manually_added: BTreeSet::new(),
            locks: BTreeMap::new(),
        }
    }

    /// Assemble a repository from already-loaded parts.
    pub fn from_parts(
        config: Configuration,
        manually_added: BTreeSet<Slug>,
        locks: BTreeMap<Slug, LockEntry>,
    ) -> Self {
        Self {
            config,
            manually_added,
            locks,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The user-declared roots.
    pub fn manually_added(&self) -> &BTreeSet<Slug> {
        &self.manually_added
    }

    pub fn locks(&self) -> &BTreeMap<Slug, LockEntry> {
        &self.locks
    }

    pub fn lock(&self, slug: &Slug) -> Option<&LockEntry> {
        self.locks.get(slug)
    }

    pub fn is_root(&self, slug: &Slug) -> bool {
        self.manually_added.contains(slug)
    }

    pub fn is_locked(&self, slug: &Slug) -> bool {
        self.locks.contains_key(slug)
    }

    /// Add a root. Returns `false` if it was already present.
    pub fn add_root(&mut self, slug: Slug) -> bool {
        self.manually_added.insert(slug)
    }

    /// Remove a root. Returns `false` if it was not present.
    pub fn remove_root(&mut self, slug: &Slug) -> bool {
        self.manually_added.remove(slug)
    }

    /// Insert or replace the lock entry for a slug.
    pub fn upsert_lock(&mut self, slug: Slug, entry: LockEntry) -> Option<LockEntry> {
        self.locks.insert(slug, entry)
    }

    /// Drop the lock entry for a slug, returning it if it existed.
    pub fn remove_lock(&mut self, slug: &Slug) -> Option<LockEntry> {
        self.locks.remove(slug)
    }
}
