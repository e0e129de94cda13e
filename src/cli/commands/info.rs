//! info command - Look a mod up on the registry

use anyhow::{Context as _, Result};

use super::{registry, runtime, settings};
use crate::core::types::ModTarget;
use crate::engine::Context;
use crate::registry::search_mod;
use crate::ui::output;

/// Print one line about the mod; `web` adds its page, `json` the full record.
///
/// With `web` and an interactive terminal, the page is also opened in the
/// browser.
pub fn info(ctx: &Context, target: &ModTarget, web: bool, json: bool) -> Result<()> {
    let registry = registry(&settings()?)?;

    let m = runtime()?
        .block_on(search_mod(&registry, target))
        .with_context(|| format!("Failed to look up {}", target))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&m)?);
        return Ok(());
    }

    println!("{}", output::format_mod(&m, web));

    if web && ctx.interactive {
        if let Some(url) = &m.links.website_url {
            if let Err(e) = open::that(url) {
                tracing::debug!(%url, error = %e, "could not open browser");
            }
        }
    }

    Ok(())
}
