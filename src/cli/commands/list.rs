//! list command - List the manually added mods

use anyhow::{Context as _, Result};

use super::{registry, runtime, settings, store};
use crate::engine::Context;
use crate::registry::Registry;
use crate::ui::output;

/// Print the roots, numbered. With `names`, show registry display names.
pub fn list(ctx: &Context, names: bool) -> Result<()> {
    let repo = store(ctx).read().context("Failed to read repository")?;

    let lines: Vec<String> = if names {
        let registry = registry(&settings()?)?;
        runtime()?.block_on(async {
            let mut lines = Vec::new();
            for slug in repo.manually_added() {
                let m = registry
                    .search_mod_by_slug(slug)
                    .await
                    .with_context(|| format!("Failed to look up {}", slug))?;
                lines.push(m.name);
            }
            anyhow::Ok(lines)
        })?
    } else {
        repo.manually_added().iter().map(|s| s.to_string()).collect()
    };

    // The list is the command's result, so it is printed even with --quiet.
    if !lines.is_empty() {
        println!("{}", output::format_numbered(&lines));
    }
    Ok(())
}
