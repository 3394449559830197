//! Clap command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration-driven story generation.
#[derive(Debug, Parser)]
#[command(name = "fabula", version, about)]
pub struct Cli {
    /// Path to the agent/tool configuration document
    #[arg(long, global = true, default_value = "config/fabula.toml")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate and persist a story for a genre
    Story {
        /// Story genre (also the storage partition)
        #[arg(long)]
        genre: String,

        /// Agent id to dispatch
        #[arg(long, default_value = "comic_story_creator_v1")]
        agent: String,

        /// Root directory for persisted stories
        #[arg(long, default_value = "stories")]
        stories: PathBuf,

        /// Abandon the generation call after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Suggest improvements for an existing plot
    Optimize {
        /// Plot setup
        #[arg(long)]
        setup: String,

        /// Plot conflict
        #[arg(long)]
        conflict: String,

        /// Plot resolution
        #[arg(long)]
        resolution: String,

        /// Genre hint for the analysis
        #[arg(long)]
        genre: Option<String>,

        /// Secondary agent id to run
        #[arg(long, default_value = "plot_optimizer_agent_v1")]
        agent: String,
    },

    /// Manage the character registry
    Characters {
        /// Backing file for character records
        #[arg(long, default_value = "data/characters.json")]
        file: PathBuf,

        #[command(subcommand)]
        action: CharacterAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CharacterAction {
    /// Add or replace a character
    Add {
        /// Character name (the registry key)
        #[arg(long)]
        name: String,

        /// Narrative role (protagonist, support, antagonist, ...)
        #[arg(long)]
        role: String,

        /// Short description
        #[arg(long)]
        description: String,
    },

    /// Show a character by name
    Get {
        /// Character name
        #[arg(long)]
        name: String,
    },

    /// List all characters
    List,
}
