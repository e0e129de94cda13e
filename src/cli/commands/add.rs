//! add command - Add a mod and lock its dependencies

use anyhow::{Context as _, Result};

use super::{registry, runtime, settings, store, verbosity};
use crate::core::types::ModTarget;
use crate::engine::{self, Context};
use crate::ui::output;

/// Add `target` as a root and lock its closure.
pub fn add(ctx: &Context, target: &ModTarget, client_only: bool) -> Result<()> {
    let settings = settings()?;
    let registry = registry(&settings)?;
    let store = store(ctx);

    let outcome = runtime()?
        .block_on(engine::add(&registry, &store, target, client_only))
        .with_context(|| format!("Failed to add {}", target))?;

    let v = verbosity(ctx);
    output::print(output::format_mod(&outcome.root, false), v);

    let dependencies: Vec<_> = outcome
        .locked
        .iter()
        .filter(|slug| **slug != outcome.root.slug)
        .map(|slug| slug.as_str())
        .collect();
    if !dependencies.is_empty() {
        output::print(format!("  with {}", dependencies.join(", ")), v);
    }
    if outcome.was_root {
        output::print("  (already added; lock refreshed)", v);
    }

    Ok(())
}
