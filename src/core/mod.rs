//! core
//!
//! Core domain types, repository model, and persistence for tmod.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Slug, GameVersion, ModLoader, ModTarget
//! - [`paths`] - Centralized path routing for repository storage
//! - [`repository`] - Repository model, lock entries, and persistence
//! - [`graph`] - Dependency graph over the lock table
//! - [`verify`] - Repository invariant verification
//! - [`config`] - User settings
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Persisted schemas are strict (unknown fields are rejected)
//! - Nothing here talks to the network

pub mod config;
pub mod graph;
pub mod paths;
pub mod repository;
pub mod types;
pub mod verify;
