//! Fabula CLI binary.
//!
//! This binary provides command-line access to the pipeline:
//! - Dispatch a story-generating agent for a genre
//! - Run the plot optimizer over a plot summary
//! - Manage the character registry
//!
//! All startup concerns live here: dotenv loading, tracing initialization,
//! and reading the API key from the environment. Library crates never touch
//! environment state.

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{handle_characters, run_optimize, run_story, Cli, Commands};

    // Load .env before reading any environment state
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Story {
            genre,
            agent,
            stories,
            timeout_secs,
        } => {
            run_story(&cli.config, &genre, &agent, &stories, timeout_secs).await?;
        }

        Commands::Optimize {
            setup,
            conflict,
            resolution,
            genre,
            agent,
        } => {
            run_optimize(&cli.config, setup, conflict, resolution, genre.as_deref(), &agent)
                .await?;
        }

        Commands::Characters { file, action } => {
            handle_characters(&file, action)?;
        }
    }

    Ok(())
}
