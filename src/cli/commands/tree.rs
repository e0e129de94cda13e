//! tree command - Show the dependency tree

use anyhow::{Context as _, Result};

use super::store;
use crate::engine::{build_tree, Context};
use crate::ui::output;

pub fn tree(ctx: &Context) -> Result<()> {
    let repo = store(ctx).read().context("Failed to read repository")?;
    print!("{}", output::render_tree(&build_tree(&repo)));
    Ok(())
}
