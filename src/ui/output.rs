//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Command
//! results go to stdout; warnings and errors go to stderr. Structured
//! diagnostics are logged through `tracing`, not printed here.

use std::fmt::Display;

use crate::engine::TreeNode;
use crate::registry::Mod;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a numbered list, starting at 1.
pub fn format_numbered<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line description of a mod: `Name (id: 123) - summary`.
pub fn format_mod(m: &Mod, with_link: bool) -> String {
    let mut line = format!("{} (id: {})", m.name, m.id);
    if with_link {
        if let Some(url) = &m.links.website_url {
            line.push_str(&format!(" [web: {}]", url));
        }
    }
    if !m.summary.is_empty() {
        line.push_str(" - ");
        line.push_str(&m.summary);
    }
    line
}

/// Render a tree with box-drawing connectors.
///
/// ```
/// use tmod::engine::TreeNode;
/// use tmod::ui::output::render_tree;
///
/// let tree = TreeNode {
///     label: "tmod".into(),
///     children: vec![TreeNode::leaf("jei")],
/// };
/// assert_eq!(render_tree(&tree), "tmod\n└── jei\n");
/// ```
pub fn render_tree(root: &TreeNode) -> String {
    let mut out = format!("{}\n", root.label);
    render_children(&root.children, "", &mut out);
    out
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, extension) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&child.label);
        out.push('\n');
        render_children(&child.children, &format!("{}{}", prefix, extension), out);
    }
}
