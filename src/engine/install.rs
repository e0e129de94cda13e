//! engine::install
//!
//! Materialize the locked files into a directory.
//!
//! # Walk
//!
//! Each root is walked depth-first through the lock graph. With `server`
//! set, a root whose lock is client-only is skipped along with whatever is
//! reachable only through it; dependencies themselves are never filtered.
//!
//! A slug is attempted at most once per run, so a dependency shared by two
//! roots is downloaded once and a cycle in the locks terminates.
//!
//! # Failure isolation
//!
//! A failure stops the walk of the root it occurred under and is recorded;
//! the remaining roots are still installed. Only failing to create the
//! target directory aborts the whole run.
//!
//! # Idempotency
//!
//! A file whose name already exists in the target directory is assumed to
//! be complete and is not downloaded again. Registry downloads go through a
//! temporary name, so an existing file is never a partial one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::resolve::locked_file;
use super::EngineError;
use crate::core::graph::LockGraph;
use crate::core::paths::DEFAULT_MODS_DIR;
use crate::core::repository::Repository;
use crate::core::types::Slug;
use crate::registry::Registry;

/// Options for [`install`].
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Target directory, created if missing.
    pub out_dir: PathBuf,
    /// Skip client-only roots.
    pub server: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_MODS_DIR),
            server: false,
        }
    }
}

/// A slug that could not be installed.
#[derive(Debug)]
pub struct InstallFailure {
    /// The root whose walk was interrupted.
    pub root: Slug,
    /// The slug that failed.
    pub slug: Slug,
    pub error: EngineError,
}

/// What an install did.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Newly downloaded files.
    pub installed: Vec<(Slug, PathBuf)>,
    /// Files that were already in place.
    pub already_present: Vec<(Slug, PathBuf)>,
    /// Client-only roots skipped for a server install.
    pub skipped_client_only: Vec<Slug>,
    pub failures: Vec<InstallFailure>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Placed {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Install every root of `repo` and its locked dependencies.
///
/// # Errors
///
/// Only if the target directory cannot be created; per-slug problems are
/// collected in [`InstallReport::failures`].
pub async fn install(
    registry: &dyn Registry,
    repo: &Repository,
    options: &InstallOptions,
) -> Result<InstallReport, EngineError> {
    std::fs::create_dir_all(&options.out_dir).map_err(|e| EngineError::Io {
        path: options.out_dir.clone(),
        source: e,
    })?;

    let graph = LockGraph::from_locks(repo.locks());
    let mut report = InstallReport::default();
    let mut attempted: HashSet<Slug> = HashSet::new();

    for root in repo.manually_added() {
        if options.server && repo.lock(root).is_some_and(|lock| lock.client_only) {
            debug!(%root, "skipping client-only root");
            report.skipped_client_only.push(root.clone());
            continue;
        }

        let mut stack = vec![root.clone()];
        while let Some(slug) = stack.pop() {
            if !attempted.insert(slug.clone()) {
                continue;
            }

            match install_one(registry, repo, &slug, &options.out_dir).await {
                Ok(Placed::Downloaded(path)) => {
                    info!(%slug, path = %path.display(), "installed");
                    report.installed.push((slug.clone(), path));
                }
                Ok(Placed::AlreadyPresent(path)) => {
                    debug!(%slug, path = %path.display(), "already present");
                    report.already_present.push((slug.clone(), path));
                }
                Err(error) => {
                    report.failures.push(InstallFailure {
                        root: root.clone(),
                        slug,
                        error,
                    });
                    break;
                }
            }

            stack.extend(graph.dependencies_of(&slug).iter().rev().cloned());
        }
    }

    Ok(report)
}

async fn install_one(
    registry: &dyn Registry,
    repo: &Repository,
    slug: &Slug,
    out_dir: &Path,
) -> Result<Placed, EngineError> {
    let lock = repo
        .lock(slug)
        .ok_or_else(|| EngineError::MissingLock(slug.clone()))?;
    let (_, file) = locked_file(registry, slug, lock, repo.config()).await?;

    if !is_plain_file_name(&file.file_name) {
        return Err(EngineError::InvalidFileName(file.file_name));
    }

    let dest = out_dir.join(&file.file_name);
    if dest.exists() {
        return Ok(Placed::AlreadyPresent(dest));
    }

    registry.download(&file, &dest).await?;
    Ok(Placed::Downloaded(dest))
}

/// A single path component that stays inside the target directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
