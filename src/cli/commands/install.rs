//! install command - Download every locked mod

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::{registry, runtime, settings, store, verbosity};
use crate::engine::{self, Context, InstallOptions};
use crate::ui::output;

/// Install the locked mods into `out_dir` (or the configured default).
///
/// Exits with an error if any mod failed, after installing the rest.
pub fn install(ctx: &Context, server: bool, out_dir: Option<PathBuf>) -> Result<()> {
    let settings = settings()?;
    let repo = store(ctx).read().context("Failed to read repository")?;
    let registry = registry(&settings)?;

    let options = InstallOptions {
        out_dir: out_dir.unwrap_or_else(|| settings.out_dir()),
        server,
    };

    let report = runtime()?
        .block_on(engine::install(&registry, &repo, &options))
        .context("Failed to install mods")?;

    let v = verbosity(ctx);
    for (slug, path) in &report.installed {
        output::print(format!("Installed {} -> {}", slug, path.display()), v);
    }
    for slug in &report.skipped_client_only {
        output::print(format!("Skipped {} (client only)", slug), v);
    }
    output::print(
        format!(
            "{} installed, {} already present",
            report.installed.len(),
            report.already_present.len()
        ),
        v,
    );

    if report.is_success() {
        return Ok(());
    }

    for failure in &report.failures {
        if failure.slug == failure.root {
            output::error(format!("{}: {}", failure.slug, failure.error));
        } else {
            output::error(format!(
                "{} (needed by {}): {}",
                failure.slug, failure.root, failure.error
            ));
        }
    }
    bail!("{} mod(s) failed to install", report.failures.len())
}
