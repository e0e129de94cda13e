//! registry::traits
//!
//! Registry trait definition for looking up mods and their files.
//!
//! # Design
//!
//! The `Registry` trait is async because every lookup is network I/O.
//! All methods return `Result` with a closed set of [`RegistryError`]
//! variants so the engine can tell "the mod does not exist" apart from
//! "the network is down".
//!
//! The engine never talks to a concrete registry; commands construct a
//! [`CurseForgeClient`](super::curseforge::CurseForgeClient) and tests use
//! [`MockRegistry`](super::mock::MockRegistry).
//!
//! # Example
//!
//! ```ignore
//! use tmod::registry::{Registry, RegistryError};
//!
//! async fn newest(registry: &dyn Registry, slug: &Slug) -> Result<String, RegistryError> {
//!     let m = registry.search_mod_by_slug(slug).await?;
//!     let file = registry.get_file(&m, &version, ModLoader::Forge, None).await?;
//!     Ok(file.file_name)
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{newest_first, Mod, ModFile};
use crate::core::types::{GameVersion, ModLoader, ModTarget, Slug};

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No mod with that id or slug, or it belongs to another game.
    #[error("mod '{0}' not found")]
    ModSearchFailed(String),

    /// The mod has no file at all for the target.
    #[error("no files for '{slug}' on {game_version} ({loader})")]
    NoFilesFetched {
        slug: String,
        game_version: String,
        loader: String,
    },

    /// A pinned file is no longer offered.
    #[error("no file of '{slug}' matches the locked timestamp {timestamp}")]
    NoSuchModFile { slug: String, timestamp: String },

    /// The registry withholds the download URL for this file.
    #[error("'{file_name}' cannot be downloaded by third-party tools")]
    DownloadUnavailable { file_name: String },

    /// Downloaded bytes do not match the published digest.
    #[error("checksum mismatch for '{file_name}': expected {expected}, got {actual}")]
    HashMismatch {
        file_name: String,
        expected: String,
        actual: String,
    },

    /// Network, HTTP status, or response decoding failure.
    #[error("registry request failed: {0}")]
    Transport(String),

    /// Local filesystem failure while storing a download.
    #[error("failed to write '{path}': {message}")]
    Io { path: String, message: String },
}

/// The Registry trait for resolving mods and their downloadable files.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single client can be shared
/// behind `&dyn Registry` for a whole command.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Get the registry name (e.g., "curseforge").
    fn name(&self) -> &'static str;

    /// Look a mod up by numeric id.
    ///
    /// # Errors
    ///
    /// - `ModSearchFailed` if absent or not a Minecraft mod
    async fn search_mod_by_id(&self, id: u32) -> Result<Mod, RegistryError>;

    /// Look a mod up by slug within the Minecraft mods category.
    ///
    /// # Errors
    ///
    /// - `ModSearchFailed` if absent or not a Minecraft mod
    async fn search_mod_by_slug(&self, slug: &Slug) -> Result<Mod, RegistryError>;

    /// Resolve one file of `m` for the target.
    ///
    /// With `timestamp == None` this is the newest file; otherwise the file
    /// whose `file_date` equals the timestamp exactly.
    ///
    /// # Errors
    ///
    /// - `NoFilesFetched` if the mod has no file for the target at all
    /// - `NoSuchModFile` if no file matches the requested timestamp
    async fn get_file(
        &self,
        m: &Mod,
        game_version: &GameVersion,
        loader: ModLoader,
        timestamp: Option<&str>,
    ) -> Result<ModFile, RegistryError>;

    /// Store the file's bytes at `dest`.
    ///
    /// On failure nothing is left at `dest`.
    async fn download(&self, file: &ModFile, dest: &Path) -> Result<(), RegistryError>;
}

/// Look up a user-supplied `<id|slug>`.
pub async fn search_mod(registry: &dyn Registry, target: &ModTarget) -> Result<Mod, RegistryError> {
    match target {
        ModTarget::Id(id) => registry.search_mod_by_id(*id).await,
        ModTarget::Slug(slug) => registry.search_mod_by_slug(slug).await,
    }
}

/// Pick the file a `get_file` call should return from every candidate
/// the registry offered for the target.
///
/// Shared by every [`Registry`] implementation so newest-first ordering
/// and exact pin matching behave identically.
pub fn select_file(
    m: &Mod,
    game_version: &GameVersion,
    loader: ModLoader,
    mut candidates: Vec<ModFile>,
    timestamp: Option<&str>,
) -> Result<ModFile, RegistryError> {
    if candidates.is_empty() {
        return Err(RegistryError::NoFilesFetched {
            slug: m.slug.to_string(),
            game_version: game_version.to_string(),
            loader: loader.to_string(),
        });
    }

    candidates.sort_by(newest_first);

    match timestamp {
        None => Ok(candidates.swap_remove(0)),
        Some(ts) => candidates
            .into_iter()
            .find(|f| f.file_date == ts)
            .ok_or_else(|| RegistryError::NoSuchModFile {
                slug: m.slug.to_string(),
                timestamp: ts.to_string(),
            }),
    }
}
