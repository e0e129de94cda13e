//! engine::add
//!
//! Add transaction: resolve a mod's closure and lock all of it.
//!
//! All-or-nothing. Every registry call (target lookup, closure, conflict
//! check) happens before the repository is touched, and the new root's
//! closure in the mutated copy must verify before it replaces the original
//! or is written. Dangling edges left elsewhere by an earlier remove are
//! only logged.

use tracing::{info, warn};

use super::conflict::find_conflict;
use super::resolve::resolve_closure;
use super::EngineError;
use crate::core::repository::{RepoStore, Repository};
use crate::core::types::{ModTarget, Slug};
use crate::core::verify::{verify, verify_closure};
use crate::registry::{search_mod, Mod, Registry};

/// What an add changed.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// The mod that was added as a root.
    pub root: Mod,
    /// Every slug whose lock entry was written, in slug order.
    pub locked: Vec<Slug>,
    /// Whether the mod was already a root before this add.
    pub was_root: bool,
}

/// Add `target` to an in-memory repository.
///
/// On error `repo` is left exactly as it was.
///
/// `client_only` is recorded on every lock entry of the closure, not only
/// the root's.
pub async fn apply_add(
    registry: &dyn Registry,
    repo: &mut Repository,
    target: &ModTarget,
    client_only: bool,
) -> Result<AddOutcome, EngineError> {
    let root = search_mod(registry, target).await?;
    info!(slug = %root.slug, id = root.id, "adding mod");

    let closure = resolve_closure(registry, &root, repo.config()).await?;

    if let Some(conflicting) = find_conflict(registry, &closure, repo).await? {
        return Err(EngineError::IncompatibilityConflict {
            conflicting: conflicting.slug,
            candidate_root: root.slug,
        });
    }

    let mut next = repo.clone();
    let was_root = !next.add_root(root.slug.clone());
    for (slug, entry) in closure.iter() {
        next.upsert_lock(slug.clone(), entry.to_lock(client_only));
    }
    verify_closure(&next, &root.slug).into_result()?;
    for stale in verify(&next).errors {
        warn!(%stale, "repository has an unlocked dependency outside this add");
    }

    *repo = next;
    Ok(AddOutcome {
        root,
        locked: closure.slugs().cloned().collect(),
        was_root,
    })
}

/// Load the repository, add `target`, and persist.
pub async fn add(
    registry: &dyn Registry,
    store: &RepoStore,
    target: &ModTarget,
    client_only: bool,
) -> Result<AddOutcome, EngineError> {
    let mut repo = store.read()?;
    let outcome = apply_add(registry, &mut repo, target, client_only).await?;
    store.write(&repo)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::{Configuration, LockEntry};
    use crate::core::types::{GameVersion, ModLoader};
    use crate::registry::mock::MockRegistry;
    use crate::registry::{Relation, RegistryError, RelationKind};

    const DATE: &str = "2024-01-01T00:00:00Z";

    fn repo() -> Repository {
        Repository::new(Configuration::new(
            GameVersion::new("1.20.1").unwrap(),
            ModLoader::Forge,
        ))
    }

    fn slug(s: &str) -> Slug {
        Slug::new(s).unwrap()
    }

    fn target(s: &str) -> ModTarget {
        ModTarget::parse(s).unwrap()
    }

    #[tokio::test]
    async fn add_by_id_locks_single_mod() {
        let registry = MockRegistry::new();
        let jei = registry.add_mod(238222, "jei");
        registry.add_file(&jei, DATE, &[]);
        let mut repo = repo();

        let outcome = apply_add(&registry, &mut repo, &target("238222"), false)
            .await
            .unwrap();

        assert_eq!(outcome.root.slug, slug("jei"));
        assert!(!outcome.was_root);
        assert_eq!(repo.locks().len(), 1);
        assert_eq!(repo.lock(&slug("jei")).unwrap().timestamp, DATE);
    }

    #[tokio::test]
    async fn dependency_is_locked_but_not_a_root() {
        let registry = MockRegistry::new();
        let waystones = registry.add_mod(245755, "waystones");
        let balm = registry.add_mod(531761, "balm");
        registry.add_file(&balm, DATE, &[]);
        registry.add_file(&waystones, DATE, &[balm.id]);
        let mut repo = repo();

        apply_add(&registry, &mut repo, &target("waystones"), false)
            .await
            .unwrap();

        assert!(repo.is_root(&slug("waystones")));
        assert!(!repo.is_root(&slug("balm")));
        assert!(repo.is_locked(&slug("balm")));
        assert_eq!(
            repo.lock(&slug("waystones")).unwrap().dependencies,
            vec![slug("balm")]
        );
    }

    #[tokio::test]
    async fn client_only_applies_to_whole_closure() {
        let registry = MockRegistry::new();
        let waystones = registry.add_mod(245755, "waystones");
        let balm = registry.add_mod(531761, "balm");
        registry.add_file(&balm, DATE, &[]);
        registry.add_file(&waystones, DATE, &[balm.id]);
        let mut repo = repo();

        apply_add(&registry, &mut repo, &target("waystones"), true)
            .await
            .unwrap();

        assert!(repo.locks().values().all(|lock| lock.client_only));
    }

    #[tokio::test]
    async fn unknown_mod_leaves_repository_unchanged() {
        let registry = MockRegistry::new();
        let mut repo = repo();
        let before = repo.clone();

        let err = apply_add(&registry, &mut repo, &target("nope"), false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Registry(RegistryError::ModSearchFailed(_))
        ));
        assert_eq!(repo, before);
    }

    #[tokio::test]
    async fn conflict_leaves_repository_unchanged() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let b = registry.add_mod(2, "b");
        registry.add_file(&a, DATE, &[]);
        registry.add_file_with_relations(
            &b,
            DATE,
            vec![Relation {
                mod_id: a.id,
                kind: RelationKind::Incompatible,
            }],
        );
        let mut repo = repo();
        repo.add_root(slug("b"));
        repo.upsert_lock(slug("b"), LockEntry::new(DATE, false, vec![]));
        let before = repo.clone();

        let err = apply_add(&registry, &mut repo, &target("a"), false)
            .await
            .unwrap_err();

        match err {
            EngineError::IncompatibilityConflict {
                conflicting,
                candidate_root,
            } => {
                assert_eq!(conflicting, slug("b"));
                assert_eq!(candidate_root, slug("a"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(repo, before);
    }

    #[tokio::test]
    async fn shared_dependency_lock_is_refreshed() {
        let registry = MockRegistry::new();
        let a = registry.add_mod(1, "a");
        let b = registry.add_mod(2, "b");
        let lib = registry.add_mod(3, "lib");
        registry.add_file(&lib, "2023-01-01T00:00:00Z", &[]);
        registry.add_file(&a, DATE, &[lib.id]);
        registry.add_file(&b, DATE, &[lib.id]);
        let mut repo = repo();

        apply_add(&registry, &mut repo, &target("a"), false)
            .await
            .unwrap();
        registry.add_file(&lib, "2024-06-01T00:00:00Z", &[]);
        apply_add(&registry, &mut repo, &target("b"), false)
            .await
            .unwrap();

        assert_eq!(
            repo.lock(&slug("lib")).unwrap().timestamp,
            "2024-06-01T00:00:00Z"
        );
    }

    #[tokio::test]
    async fn re_adding_root_reports_it() {
        let registry = MockRegistry::new();
        let jei = registry.add_mod(238222, "jei");
        registry.add_file(&jei, DATE, &[]);
        let mut repo = repo();

        apply_add(&registry, &mut repo, &target("jei"), false)
            .await
            .unwrap();
        let again = apply_add(&registry, &mut repo, &target("jei"), false)
            .await
            .unwrap();

        assert!(again.was_root);
        assert_eq!(repo.manually_added().len(), 1);
    }

    #[tokio::test]
    async fn add_succeeds_after_shared_dependency_was_removed() {
        let registry = MockRegistry::new();
        let balm = registry.add_mod(531761, "balm");
        let waystones = registry.add_mod(245755, "waystones");
        let jei = registry.add_mod(238222, "jei");
        registry.add_file(&balm, DATE, &[]);
        registry.add_file(&waystones, DATE, &[balm.id]);
        registry.add_file(&jei, DATE, &[]);
        let mut repo = repo();

        apply_add(&registry, &mut repo, &target("waystones"), false)
            .await
            .unwrap();
        crate::engine::apply_remove(&mut repo, &[slug("balm")]);

        apply_add(&registry, &mut repo, &target("jei"), false)
            .await
            .unwrap();

        assert!(repo.is_root(&slug("jei")));
        assert!(repo.is_locked(&slug("jei")));
        assert!(!repo.is_locked(&slug("balm")));
    }
}
