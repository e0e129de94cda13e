//! engine::remove
//!
//! Remove transaction.
//!
//! Best-effort per target: a slug that is not a root is reported and
//! processing continues. The target's own lock entry is dropped; locks of
//! its dependencies are kept even when nothing else needs them.
//!
//! When asked to, the removed mods' installed files are deleted too. Their
//! names are looked up from the lock entries before those are dropped, and
//! deletion happens only after the repository has been written. Lookup and
//! deletion problems are warnings, never errors.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::resolve::locked_file;
use super::EngineError;
use crate::core::repository::{RepoStore, Repository};
use crate::core::types::Slug;
use crate::registry::Registry;

/// Options for [`remove`].
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Directory to delete installed files from; `None` keeps files.
    pub files_in: Option<PathBuf>,
}

/// What a remove changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    /// Targets that were roots and are no longer.
    pub removed: Vec<Slug>,
    /// Targets that were not roots.
    pub not_present: Vec<Slug>,
    /// Installed files that were deleted.
    pub deleted_files: Vec<PathBuf>,
    /// Problems locating or deleting installed files.
    pub file_warnings: Vec<String>,
}

/// Remove `targets` from an in-memory repository.
pub fn apply_remove(repo: &mut Repository, targets: &[Slug]) -> RemoveReport {
    let mut report = RemoveReport::default();

    for slug in targets {
        if repo.remove_root(slug) {
            report.removed.push(slug.clone());
        } else {
            debug!(%slug, "not a root");
            report.not_present.push(slug.clone());
        }
        repo.remove_lock(slug);
    }

    report
}

/// Load the repository, remove `targets`, persist, then delete files.
pub async fn remove(
    registry: &dyn Registry,
    store: &RepoStore,
    targets: &[Slug],
    options: &RemoveOptions,
) -> Result<RemoveReport, EngineError> {
    let mut repo = store.read()?;
    let mut warnings = Vec::new();

    let mut doomed: Vec<PathBuf> = Vec::new();
    if let Some(dir) = &options.files_in {
        for slug in targets {
            let Some(lock) = repo.lock(slug) else {
                continue;
            };
            match locked_file(registry, slug, lock, repo.config()).await {
                Ok((_, file)) => doomed.push(dir.join(file.file_name)),
                Err(e) => warnings.push(format!("could not locate file of '{}': {}", slug, e)),
            }
        }
    }

    let mut report = apply_remove(&mut repo, targets);
    store.write(&repo)?;

    for path in doomed {
        match delete_file(&path) {
            Ok(()) => report.deleted_files.push(path),
            Err(message) => warnings.push(message),
        }
    }

    for message in &warnings {
        warn!("{}", message);
    }
    report.file_warnings = warnings;
    Ok(report)
}

fn delete_file(path: &Path) -> Result<(), String> {
    std::fs::remove_file(path)
        .map_err(|e| format!("couldn't delete the file '{}': {}", path.display(), e))
}
