//! remove command - Remove mods from the repository

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{registry, runtime, settings, store, verbosity};
use crate::core::types::Slug;
use crate::engine::{self, Context, RemoveOptions};
use crate::ui::output;

/// Remove `slugs`, deleting their installed files unless `keep_file`.
pub fn remove(ctx: &Context, slugs: &[Slug], from: Option<PathBuf>, keep_file: bool) -> Result<()> {
    let settings = settings()?;
    let registry = registry(&settings)?;
    let store = store(ctx);

    let options = RemoveOptions {
        files_in: (!keep_file).then(|| from.unwrap_or_else(|| settings.out_dir())),
    };

    let report = runtime()?
        .block_on(engine::remove(&registry, &store, slugs, &options))
        .context("Failed to remove mods")?;

    let v = verbosity(ctx);
    for slug in &report.removed {
        output::print(format!("Removed {}", slug), v);
    }
    for slug in &report.not_present {
        output::warn(format!("the mod {} wasn't present in the repo", slug), v);
    }
    for path in &report.deleted_files {
        output::print(format!("  deleted {}", path.display()), v);
    }
    for message in &report.file_warnings {
        output::warn(message, v);
    }

    Ok(())
}
