//! init command - Create a repository

use anyhow::{bail, Context as _, Result};

use super::{store, verbosity};
use crate::core::repository::{Configuration, Repository};
use crate::core::types::{GameVersion, ModLoader};
use crate::engine::Context;
use crate::ui::{output, prompts};

/// Create a repository at `ctx.repo`.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `game_version` - Target game version; prompted for if omitted
/// * `loader` - Target loader; prompted for if omitted
/// * `force` - Replace an existing repository
pub fn init(
    ctx: &Context,
    game_version: Option<GameVersion>,
    loader: Option<ModLoader>,
    force: bool,
) -> Result<()> {
    let store = store(ctx);

    if store.exists() && !force {
        bail!(
            "A repository already exists at '{}'. Use --force to replace it.",
            ctx.repo.display()
        );
    }

    let game_version = match game_version {
        Some(v) => v,
        None => prompt_game_version(ctx.interactive)?,
    };
    let loader = match loader {
        Some(l) => l,
        None => prompt_loader(ctx.interactive)?,
    };

    let repo = Repository::new(Configuration::new(game_version.clone(), loader));
    let written = if force {
        store.write(&repo)
    } else {
        store.create(&repo)
    };
    written.context("Failed to write repository")?;

    output::print(
        format!(
            "Initialized repository for Minecraft {} ({}) in {}",
            game_version,
            loader,
            ctx.repo.display()
        ),
        verbosity(ctx),
    );
    Ok(())
}

fn prompt_game_version(interactive: bool) -> Result<GameVersion> {
    if !interactive {
        bail!("--game-version is required in non-interactive mode");
    }
    loop {
        let answer = prompts::input("Game version", None, true)?;
        match GameVersion::new(answer) {
            Ok(v) => return Ok(v),
            Err(e) => output::error(e),
        }
    }
}

fn prompt_loader(interactive: bool) -> Result<ModLoader> {
    if !interactive {
        bail!("--loader is required in non-interactive mode");
    }
    let names: Vec<String> = ModLoader::ALL.iter().map(|l| l.to_string()).collect();
    let index = prompts::select("Mod loader", &names, Some(0), true)?;
    Ok(ModLoader::ALL[index])
}
