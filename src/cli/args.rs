//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <path>`: Repository directory (default `.tmod`)
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Never prompt
//! - `--quiet` / `-q`: Minimal output

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::paths::DEFAULT_REPO_DIR;
use crate::core::types::{GameVersion, ModLoader, ModTarget, Slug};

/// tmod - Minecraft mod manager with a lock file for reproducible installs
#[derive(Parser, Debug)]
#[command(name = "tmod")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository directory
    #[arg(long, global = true, default_value = DEFAULT_REPO_DIR, value_name = "PATH")]
    pub repo: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Prompts are allowed unless disabled by flag or stdin is not a
    /// terminal.
    pub fn interactive(&self) -> bool {
        !(self.no_interactive || self.quiet) && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a repository for one game version and mod loader
    #[command(after_help = "\
EXAMPLES:
    tmod init --game-version 1.20.1 --loader forge
    tmod --repo server/.tmod init --game-version 1.21 --loader neoforge")]
    Init {
        /// Minecraft version, e.g. 1.20.1 (prompted for if omitted)
        #[arg(long, value_name = "VERSION")]
        game_version: Option<GameVersion>,

        /// forge, fabric, quilt or neoforge (prompted for if omitted)
        #[arg(long)]
        loader: Option<ModLoader>,

        /// Overwrite an existing repository
        #[arg(long)]
        force: bool,
    },

    /// Add a mod and lock it with its dependencies
    #[command(after_help = "\
EXAMPLES:
    tmod add jei
    tmod add 238222
    tmod add journeymap --client-only")]
    Add {
        /// Mod id or slug
        #[arg(value_name = "ID|SLUG", value_parser = ModTarget::parse)]
        target: ModTarget,

        /// Skip this mod on `install --server`
        #[arg(short, long)]
        client_only: bool,
    },

    /// Remove one or more mods
    #[command(visible_alias = "rm")]
    Remove {
        /// Slugs to remove
        #[arg(required = true, value_name = "SLUG")]
        slugs: Vec<Slug>,

        /// Directory holding installed mods [default: mods]
        #[arg(short, long, value_name = "PATH")]
        from: Option<PathBuf>,

        /// Don't delete the installed file
        #[arg(short, long)]
        keep_file: bool,
    },

    /// Download every locked mod
    Install {
        /// Leave out client-only mods
        #[arg(short, long)]
        server: bool,

        /// Target directory [default: mods]
        #[arg(short, long, value_name = "PATH")]
        out_dir: Option<PathBuf>,
    },

    /// List the manually added mods
    List {
        /// Show display names from the registry
        #[arg(short, long)]
        names: bool,
    },

    /// Look a mod up on the registry
    Info {
        /// Mod id or slug
        #[arg(value_name = "ID|SLUG", value_parser = ModTarget::parse)]
        target: ModTarget,

        /// Include the mod's web page
        #[arg(short, long)]
        web: bool,

        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the dependency tree of the locked mods
    Tree,

    /// Generate shell completion scripts
    #[command(after_help = "\
INSTALLATION:
    # Bash
    tmod completion bash > ~/.local/share/bash-completion/completions/tmod

    # Zsh
    tmod completion zsh > ~/.zfunc/_tmod

    # Fish
    tmod completion fish > ~/.config/fish/completions/tmod.fish

    # PowerShell
    tmod completion powershell >> $PROFILE")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shells with completion support.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
