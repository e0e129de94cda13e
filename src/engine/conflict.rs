//! engine::conflict
//!
//! Incompatibility check between a candidate closure and the locks.
//!
//! Incompatibility is declared one way on the registry (a file lists the
//! mods it cannot run with), so both directions are checked:
//!
//! 1. each locked file (re-resolved at its pinned timestamp) against the
//!    closure's slugs; a hit reports the locked mod
//! 2. each closure file against the locked slugs; a hit reports the
//!    candidate mod
//!
//! The first hit wins. Relations name mods by id, so ids are mapped to
//! slugs through a per-check memo seeded with every mod already in hand.

use std::collections::HashMap;

use tracing::debug;

use super::resolve::{locked_file, Closure};
use super::EngineError;
use crate::core::repository::Repository;
use crate::core::types::Slug;
use crate::registry::{Mod, ModFile, Registry, RegistryError};

struct SlugMemo<'a> {
    registry: &'a dyn Registry,
    slugs: HashMap<u32, Option<Slug>>,
}

impl<'a> SlugMemo<'a> {
    fn new(registry: &'a dyn Registry, closure: &Closure) -> Self {
        let slugs = closure
            .iter()
            .map(|(slug, entry)| (entry.mod_info.id, Some(slug.clone())))
            .collect();
        Self { registry, slugs }
    }

    fn remember(&mut self, m: &Mod) {
        self.slugs.insert(m.id, Some(m.slug.clone()));
    }

    /// The slug of mod `id`, or `None` if the registry no longer knows it.
    async fn slug_of(&mut self, id: u32) -> Result<Option<Slug>, EngineError> {
        if let Some(known) = self.slugs.get(&id) {
            return Ok(known.clone());
        }
        let slug = match self.registry.search_mod_by_id(id).await {
            Ok(m) => Some(m.slug),
            // A delisted mod cannot be locked or in the closure.
            Err(RegistryError::ModSearchFailed(_)) => None,
            Err(e) => return Err(e.into()),
        };
        self.slugs.insert(id, slug.clone());
        Ok(slug)
    }

    /// First incompatible slug of `file` accepted by `hit`.
    async fn first_incompatible(
        &mut self,
        file: &ModFile,
        hit: impl Fn(&Slug) -> bool,
    ) -> Result<Option<Slug>, EngineError> {
        for id in file.incompatible_mod_ids() {
            if let Some(slug) = self.slug_of(id).await? {
                if hit(&slug) {
                    return Ok(Some(slug));
                }
            }
        }
        Ok(None)
    }
}

/// Find a mod that makes `candidate` and the repository's locks mutually
/// exclusive.
///
/// Returns the locked mod (first pass) or the candidate mod (second pass)
/// that declares the incompatibility, or `None`.
///
/// # Errors
///
/// Any registry error, including `NoSuchModFile` when a locked file can no
/// longer be re-resolved: an unverifiable lock is not treated as safe.
pub async fn find_conflict(
    registry: &dyn Registry,
    candidate: &Closure,
    repo: &Repository,
) -> Result<Option<Mod>, EngineError> {
    let mut memo = SlugMemo::new(registry, candidate);

    for (slug, lock) in repo.locks() {
        let (locked_mod, file) = locked_file(registry, slug, lock, repo.config()).await?;
        memo.remember(&locked_mod);

        if let Some(hit) = memo
            .first_incompatible(&file, |s| candidate.contains(s))
            .await?
        {
            debug!(locked = %slug, candidate = %hit, "locked mod rejects candidate");
            return Ok(Some(locked_mod));
        }
    }

    for (slug, entry) in candidate.iter() {
        if let Some(hit) = memo
            .first_incompatible(&entry.file, |s| repo.is_locked(s))
            .await?
        {
            debug!(candidate = %slug, locked = %hit, "candidate rejects locked mod");
            return Ok(Some(entry.mod_info.clone()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::{Configuration, LockEntry};
    use crate::core::types::{GameVersion, ModLoader};
    use crate::engine::resolve::resolve_closure;
    use crate::registry::mock::MockRegistry;
    use crate::registry::{Relation, RelationKind};

    const DATE: &str = "2024-01-01T00:00:00Z";

    fn config() -> Configuration {
        Configuration::new(GameVersion::new("1.20.1").unwrap(), ModLoader::Forge)
    }

    fn incompatible(mod_id: u32) -> Vec<Relation> {
        vec![Relation {
            mod_id,
            kind: RelationKind::Incompatible,
        }]
    }

    fn locked(repo: &mut Repository, m: &Mod) {
        repo.add_root(m.slug.clone());
        repo.upsert_lock(m.slug.clone(), LockEntry::new(DATE, false, vec![]));
    }

    #[tokio::test]
    async fn no_conflict_on_empty_repository() {
        let registry = MockRegistry::new();
        let jei = registry.add_mod(238222, "jei");
        registry.add_file(&jei, DATE, &[]);
        let closure = resolve_closure(&registry, &jei, &config()).await.unwrap();

        let found = find_conflict(&registry, &closure, &Repository::new(config()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn locked_mod_declaring_incompatibility_is_reported() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let b = registry.add_mod(2, "b");
        registry.add_file(&a, DATE, &[]);
        registry.add_file_with_relations(&b, DATE, incompatible(a.id));

        let mut repo = Repository::new(config());
        locked(&mut repo, &b);
        let closure = resolve_closure(&registry, &a, &config()).await.unwrap();

        let found = find_conflict(&registry, &closure, &repo).await.unwrap();
        assert_eq!(found.map(|m| m.slug), Some(b.slug));
    }

    #[tokio::test]
    async fn candidate_declaring_incompatibility_is_reported() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let b = registry.add_mod(2, "b");
        registry.add_file_with_relations(&a, DATE, incompatible(b.id));
        registry.add_file(&b, DATE, &[]);

        let mut repo = Repository::new(config());
        locked(&mut repo, &b);
        let closure = resolve_closure(&registry, &a, &config()).await.unwrap();

        let found = find_conflict(&registry, &closure, &repo).await.unwrap();
        assert_eq!(found.map(|m| m.slug), Some(a.slug));
    }

    #[tokio::test]
    async fn incompatible_transitive_dependency_is_reported() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let lib = registry.add_mod(2, "lib");
        let b = registry.add_mod(3, "b");
        registry.add_file(&a, DATE, &[lib.id]);
        registry.add_file_with_relations(&lib, DATE, incompatible(b.id));
        registry.add_file(&b, DATE, &[]);

        let mut repo = Repository::new(config());
        locked(&mut repo, &b);
        let closure = resolve_closure(&registry, &a, &config()).await.unwrap();

        let found = find_conflict(&registry, &closure, &repo).await.unwrap();
        assert_eq!(found.map(|m| m.slug), Some(lib.slug));
    }

    #[tokio::test]
    async fn delisted_incompatible_mod_is_ignored() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        registry.add_file_with_relations(&a, DATE, incompatible(999));

        let closure = resolve_closure(&registry, &a, &config()).await.unwrap();
        let found = find_conflict(&registry, &closure, &Repository::new(config()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn unresolvable_lock_is_an_error() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let b = registry.add_mod(2, "b");
        registry.add_file(&a, DATE, &[]);
        registry.add_file(&b, "2020-01-01T00:00:00Z", &[]);

        let mut repo = Repository::new(config());
        locked(&mut repo, &b);
        let closure = resolve_closure(&registry, &a, &config()).await.unwrap();

        let err = find_conflict(&registry, &closure, &repo).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Registry(RegistryError::NoSuchModFile { .. })
        ));
    }
}
