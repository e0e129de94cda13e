//! tmod - A command-line manager for Minecraft mods
//!
//! tmod keeps a small repository (`.tmod/`) describing a mod set for one
//! game version and loader: the mods the user asked for and a lock entry
//! for every mod in their dependency closure. Mods come from a registry
//! (CurseForge); the lock pins each one to a file timestamp so `install`
//! is reproducible.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Resolution, conflict checking, add/remove, install, tree
//! - [`core`] - Domain types, repository schema and store, verification, config
//! - [`registry`] - Registry abstraction, CurseForge client and test double
//! - [`ui`] - Output formatting and prompts
//!
//! # Correctness Invariants
//!
//! 1. Every manually added mod has a lock entry
//! 2. Every dependency named by a lock entry has its own lock entry
//! 3. A failed add or remove leaves the repository on disk untouched

pub mod cli;
pub mod core;
pub mod engine;
pub mod registry;
pub mod ui;
