//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT perform repository mutations directly.
//!
//! # Async Commands
//!
//! Commands that reach the registry are async because they involve network
//! I/O. Each one builds a tokio runtime and blocks on its async body, so
//! the rest of the CLI stays synchronous.

mod add;
mod completion;
mod info;
mod init;
mod install;
mod list;
mod remove;
mod tree;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use completion::completion;
pub use info::info;
pub use init::init;
pub use install::install;
pub use list::list;
pub use remove::remove;
pub use tree::tree;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::core::config::Settings;
use crate::core::repository::RepoStore;
use crate::engine::Context;
use crate::registry::curseforge::CurseForgeClient;
use crate::ui::output::Verbosity;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init {
            game_version,
            loader,
            force,
        } => init::init(ctx, game_version, loader, force),
        Command::Add {
            target,
            client_only,
        } => add::add(ctx, &target, client_only),
        Command::Remove {
            slugs,
            from,
            keep_file,
        } => remove::remove(ctx, &slugs, from, keep_file),
        Command::Install { server, out_dir } => install::install(ctx, server, out_dir),
        Command::List { names } => list::list(ctx, names),
        Command::Info { target, web, json } => info::info(ctx, &target, web, json),
        Command::Tree => tree::tree(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_flags(ctx.quiet, ctx.debug)
}

fn store(ctx: &Context) -> RepoStore {
    RepoStore::new(&ctx.repo)
}

fn settings() -> Result<Settings> {
    Settings::load().context("Failed to load settings")
}

fn registry(settings: &Settings) -> Result<CurseForgeClient> {
    CurseForgeClient::new(settings.api_base(), settings.api_key())
        .context("Failed to create registry client")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}
