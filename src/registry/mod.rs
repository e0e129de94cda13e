//! registry
//!
//! Abstraction for the remote mod registry.
//!
//! # Architecture
//!
//! The [`Registry`] trait is the only way the engine reaches the network.
//! Commands build a [`CurseForgeClient`] from user settings and hand it to
//! the engine as `&dyn Registry`; tests hand it a [`MockRegistry`].
//!
//! Registry failures never compromise local state: mutating operations
//! finish every registry call before touching the repository.
//!
//! # Modules
//!
//! - `traits`: Core `Registry` trait, errors, and file selection
//! - [`types`]: Remote model types (mods, files, relations)
//! - [`curseforge`]: CurseForge REST implementation
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! [`CurseForgeClient`]: curseforge::CurseForgeClient
//! [`MockRegistry`]: mock::MockRegistry

pub mod curseforge;
pub mod mock;
mod traits;
pub mod types;

pub use traits::*;
pub use types::{Mod, ModFile, Relation, RelationKind};
