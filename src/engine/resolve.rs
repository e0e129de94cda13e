//! engine::resolve
//!
//! Dependency resolution: the transitive closure of a mod.
//!
//! # Algorithm
//!
//! Depth-first over an explicit worklist. For each mod:
//! 1. Ask the registry for its newest file on the target
//! 2. Take the file's required and embedded relations as its direct
//!    dependencies
//! 3. Look each dependency up by id and queue it unless already seen
//!
//! A slug enters the worklist at most once, so cyclic or diamond-shaped
//! relations produce a finite closure. Any registry failure aborts the
//! whole resolution.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::EngineError;
use crate::core::repository::{Configuration, LockEntry};
use crate::core::types::Slug;
use crate::registry::{Mod, ModFile, Registry};

/// One resolved mod within a closure.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureEntry {
    pub mod_info: Mod,
    /// The chosen (newest) file.
    pub file: ModFile,
    /// Direct dependencies, in registry order, without duplicates.
    pub dependencies: Vec<Mod>,
}

impl ClosureEntry {
    pub fn dependency_slugs(&self) -> Vec<Slug> {
        self.dependencies.iter().map(|m| m.slug.clone()).collect()
    }

    /// The lock entry this resolution pins.
    pub fn to_lock(&self, client_only: bool) -> LockEntry {
        LockEntry::new(
            self.file.file_date.clone(),
            client_only,
            self.dependency_slugs(),
        )
    }
}

/// The transitive closure of a root mod, keyed by slug.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    root: Slug,
    entries: BTreeMap<Slug, ClosureEntry>,
}

impl Closure {
    pub fn root(&self) -> &Slug {
        &self.root
    }

    pub fn root_entry(&self) -> Option<&ClosureEntry> {
        self.entries.get(&self.root)
    }

    pub fn get(&self, slug: &Slug) -> Option<&ClosureEntry> {
        self.entries.get(slug)
    }

    pub fn contains(&self, slug: &Slug) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &Slug> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Slug, &ClosureEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve `root` and everything it transitively requires.
///
/// # Errors
///
/// Any registry error, notably `NoFilesFetched` when some mod in the
/// closure has no file for the target.
pub async fn resolve_closure(
    registry: &dyn Registry,
    root: &Mod,
    config: &Configuration,
) -> Result<Closure, EngineError> {
    let mut entries = BTreeMap::new();
    let mut seen: HashSet<Slug> = HashSet::from([root.slug.clone()]);
    let mut by_id: HashMap<u32, Mod> = HashMap::from([(root.id, root.clone())]);
    let mut stack = vec![root.clone()];

    while let Some(current) = stack.pop() {
        let file = registry
            .get_file(&current, &config.game_version, config.loader, None)
            .await?;
        debug!(slug = %current.slug, file = %file.file_name, "resolved file");

        let mut dependencies: Vec<Mod> = Vec::new();
        for id in file.required_mod_ids() {
            let dep = match by_id.get(&id) {
                Some(m) => m.clone(),
                None => {
                    let m = registry.search_mod_by_id(id).await?;
                    by_id.insert(id, m.clone());
                    m
                }
            };
            if !dependencies.iter().any(|d| d.slug == dep.slug) {
                dependencies.push(dep);
            }
        }

        // Reverse so the first-listed dependency is expanded first.
        for dep in dependencies.iter().rev() {
            if seen.insert(dep.slug.clone()) {
                stack.push(dep.clone());
            }
        }

        entries.insert(
            current.slug.clone(),
            ClosureEntry {
                mod_info: current,
                file,
                dependencies,
            },
        );
    }

    debug!(root = %root.slug, size = entries.len(), "closure resolved");
    Ok(Closure {
        root: root.slug.clone(),
        entries,
    })
}

/// Re-resolve the exact file pinned by a lock entry.
///
/// # Errors
///
/// `NoSuchModFile` when the pinned file is no longer offered.
pub async fn locked_file(
    registry: &dyn Registry,
    slug: &Slug,
    lock: &LockEntry,
    config: &Configuration,
) -> Result<(Mod, ModFile), EngineError> {
    let m = registry.search_mod_by_slug(slug).await?;
    let file = registry
        .get_file(
            &m,
            &config.game_version,
            config.loader,
            Some(&lock.timestamp),
        )
        .await?;
    Ok((m, file))
}
