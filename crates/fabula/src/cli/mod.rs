//! Command-line interface definitions and handlers.

mod commands;
mod run;

pub use commands::{CharacterAction, Cli, Commands};
pub use run::{handle_characters, run_optimize, run_story};
