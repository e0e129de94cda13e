//! core::verify
//!
//! Repository invariant verification.
//!
//! # Checks
//!
//! - Every manually added root has a lock entry
//! - Every dependency named by a lock entry has a lock entry
//!
//! [`verify`] checks the whole repository. [`verify_closure`] checks only
//! what hangs off one root, which is what an add writes; a lock entry
//! dropped by an explicit remove may leave dangling edges elsewhere, and
//! those must not block unrelated additions.
//!
//! Cycles are not a violation: every traversal over the lock graph
//! tolerates them.
//!
//! # Invariants
//!
//! - Never mutates the repository
//! - Deterministic (errors are reported in slug order)

use std::collections::BTreeSet;

use thiserror::Error;

use super::graph::LockGraph;
use super::repository::Repository;
use super::types::Slug;

/// An invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("root '{0}' has no lock entry")]
    RootNotLocked(String),

    #[error("'{dependent}' depends on '{dependency}', which has no lock entry")]
    DependencyNotLocked {
        dependent: String,
        dependency: String,
    },
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Violations found
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }

    /// The first violation, if any, as a `Result`.
    pub fn into_result(self) -> Result<(), VerifyError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Verify the closure invariants of a repository.
pub fn verify(repo: &Repository) -> VerifyResult {
    let mut errors = Vec::new();

    for root in repo.manually_added() {
        if !repo.is_locked(root) {
            errors.push(VerifyError::RootNotLocked(root.to_string()));
        }
    }

    let graph = LockGraph::from_locks(repo.locks());
    for (dependent, dependency) in graph.dangling() {
        errors.push(VerifyError::DependencyNotLocked {
            dependent: dependent.to_string(),
            dependency: dependency.to_string(),
        });
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

/// Verify that `root` and everything reachable from it is locked.
///
/// Dangling edges outside the root's closure are ignored.
pub fn verify_closure(repo: &Repository, root: &Slug) -> VerifyResult {
    if !repo.is_locked(root) {
        return VerifyResult::failure(vec![VerifyError::RootNotLocked(root.to_string())]);
    }

    let graph = LockGraph::from_locks(repo.locks());
    let reachable: BTreeSet<Slug> = graph.reachable_from(root).into_iter().collect();

    let errors: Vec<VerifyError> = graph
        .dangling()
        .into_iter()
        .filter(|(dependent, _)| reachable.contains(dependent))
        .map(|(dependent, dependency)| VerifyError::DependencyNotLocked {
            dependent: dependent.to_string(),
            dependency: dependency.to_string(),
        })
        .collect();

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::{Configuration, LockEntry};
    use crate::core::types::{GameVersion, ModLoader, Slug};

    fn slug(s: &str) -> Slug {
        Slug::new(s).unwrap()
    }

    fn repo() -> Repository {
        Repository::new(Configuration::new(
            GameVersion::new("1.20.1").unwrap(),
            ModLoader::Forge,
        ))
    }

    #[test]
    fn empty_repository_verifies() {
        assert!(verify(&repo()).ok);
    }

    #[test]
    fn complete_closure_verifies() {
        let mut repo = repo();
        repo.add_root(slug("waystones"));
        repo.upsert_lock(slug("waystones"), LockEntry::new("t", false, vec![slug("balm")]));
        repo.upsert_lock(slug("balm"), LockEntry::new("t", false, vec![]));

        let result = verify(&repo);
        assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn unlocked_root_is_reported() {
        let mut repo = repo();
        repo.add_root(slug("jei"));

        let result = verify(&repo);
        assert!(!result.ok);
        assert_eq!(result.errors, vec![VerifyError::RootNotLocked("jei".into())]);
    }

    #[test]
    fn unlocked_dependency_is_reported() {
        let mut repo = repo();
        repo.add_root(slug("waystones"));
        repo.upsert_lock(slug("waystones"), LockEntry::new("t", false, vec![slug("balm")]));

        let err = verify(&repo).into_result().unwrap_err();
        assert_eq!(
            err,
            VerifyError::DependencyNotLocked {
                dependent: "waystones".into(),
                dependency: "balm".into(),
            }
        );
    }

    #[test]
    fn cycle_alone_is_not_a_violation() {
        let mut repo = repo();
        repo.add_root(slug("a"));
        repo.upsert_lock(slug("a"), LockEntry::new("t", false, vec![slug("b")]));
        repo.upsert_lock(slug("b"), LockEntry::new("t", false, vec![slug("a")]));

        assert!(verify(&repo).ok);
    }

    #[test]
    fn closure_check_ignores_unrelated_dangling_edges() {
        let mut repo = repo();
        repo.add_root(slug("waystones"));
        repo.add_root(slug("jei"));
        repo.upsert_lock(slug("waystones"), LockEntry::new("t", false, vec![slug("balm")]));
        repo.upsert_lock(slug("jei"), LockEntry::new("t", false, vec![]));

        assert!(!verify(&repo).ok);
        assert!(verify_closure(&repo, &slug("jei")).ok);

        let err = verify_closure(&repo, &slug("waystones"))
            .into_result()
            .unwrap_err();
        assert_eq!(
            err,
            VerifyError::DependencyNotLocked {
                dependent: "waystones".into(),
                dependency: "balm".into(),
            }
        );
    }

    #[test]
    fn closure_check_requires_root_lock() {
        let mut repo = repo();
        repo.add_root(slug("jei"));

        assert_eq!(
            verify_closure(&repo, &slug("jei")).errors,
            vec![VerifyError::RootNotLocked("jei".into())]
        );
    }
}
