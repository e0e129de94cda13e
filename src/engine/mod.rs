//! engine
//!
//! Resolution, conflict detection, and the operations built on them.
//!
//! # Architecture
//!
//! Every operation works against one freshly loaded [`Repository`]
//! snapshot and a `&dyn Registry`:
//!
//! ```text
//! read -> resolve closure -> check conflicts -> mutate in memory -> verify -> write
//! ```
//!
//! Read-only operations (install, tree) stop after reading.
//!
//! # Modules
//!
//! - [`resolve`]: Transitive dependency closure of a mod
//! - [`conflict`]: Incompatibility check between a closure and the locks
//! - [`add`]: Add transaction (all-or-nothing)
//! - [`remove`]: Remove transaction (best-effort per target)
//! - [`install`]: Materialize locked files (isolated per root)
//! - [`tree`]: Rooted forest view of the locks
//!
//! # Invariants
//!
//! - Every registry call of a mutating operation completes before the
//!   repository is touched
//! - A mutated repository is verified before it is written; a violation
//!   is a bug and nothing is persisted
//! - Every graph walk carries a visited set, so cyclic locks terminate
//!
//! [`Repository`]: crate::core::repository::Repository

pub mod add;
pub mod conflict;
pub mod install;
pub mod remove;
pub mod resolve;
pub mod tree;

pub use add::{add, apply_add, AddOutcome};
pub use conflict::find_conflict;
pub use install::{install, InstallFailure, InstallOptions, InstallReport};
pub use remove::{apply_remove, remove, RemoveOptions, RemoveReport};
pub use resolve::{locked_file, resolve_closure, Closure, ClosureEntry};
pub use tree::{build_tree, TreeNode};

use std::path::PathBuf;

use crate::core::paths::DEFAULT_REPO_DIR;
use crate::core::repository::RepositoryError;
use crate::core::types::Slug;
use crate::core::verify::VerifyError;
use crate::registry::RegistryError;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Repository directory.
    pub repo: PathBuf,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            repo: PathBuf::from(DEFAULT_REPO_DIR),
            debug: false,
            quiet: false,
            interactive: true,
        }
    }
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A registry lookup or download failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Loading or storing the repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The candidate closure and the locks cannot coexist.
    #[error("'{conflicting}' is incompatible with adding '{candidate_root}'")]
    IncompatibilityConflict {
        conflicting: Slug,
        candidate_root: Slug,
    },

    /// A mutated repository broke a closure invariant.
    #[error("internal error, repository left unchanged: {0}")]
    Verify(#[from] VerifyError),

    /// A slug reached through the locks has no lock entry.
    #[error("'{0}' has no lock entry")]
    MissingLock(Slug),

    /// The registry named a file that cannot be stored safely.
    #[error("refusing to write file named '{0}'")]
    InvalidFileName(String),

    /// Local filesystem failure.
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
