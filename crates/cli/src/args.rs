//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "easel")]
#[command(about = "Random fine art wallpapers from museum collections", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $EASEL_CONFIG, then built-in defaults).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored artwork, fetching one if none is stored.
    Show,

    /// Fetch a new random artwork.
    Refresh {
        /// Also set it as the desktop wallpaper.
        #[arg(long)]
        apply: bool,
    },

    /// Set the current artwork as the desktop wallpaper.
    Set,

    /// List catalog sources.
    Sources,

    /// Switch to another catalog source and remember the choice.
    Use {
        /// Source id, as listed by `easel sources`.
        id: String,
    },
}
