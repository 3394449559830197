//! Command handlers.

use crate::cli::CharacterAction;
use fabula_agent::{AgentDispatcher, CharacterRegistry, DispatchConfig, PlotOptimizer};
use fabula_config::Registry;
use fabula_core::{Character, Plot};
use fabula_models::GeminiClient;
use fabula_storage::StoryStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Read the generation credential once, at startup.
fn api_key() -> Result<String, Box<dyn std::error::Error>> {
    std::env::var("GEMINI_API_KEY")
        .map_err(|_| "GEMINI_API_KEY is not set; export it or add it to .env".into())
}

/// Dispatch a story agent and print the persisted result.
pub async fn run_story(
    config: &Path,
    genre: &str,
    agent: &str,
    stories: &Path,
    timeout_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = api_key()?;
    let registry = Arc::new(Registry::from_file(config)?);
    let store = StoryStore::new(stories)?;

    let dispatcher = AgentDispatcher::new(GeminiClient::new(api_key), registry, store)
        .with_config(DispatchConfig {
            timeout: timeout_secs.map(Duration::from_secs),
            ..DispatchConfig::default()
        });

    let (artifact, location) = dispatcher.run_story(agent, genre).await?;

    println!("{}", artifact.render_text());
    println!("Saved: {}", location.structured_path.display());
    println!("       {}", location.text_path.display());
    Ok(())
}

/// Run the plot optimizer and print its suggestions.
pub async fn run_optimize(
    config: &Path,
    setup: String,
    conflict: String,
    resolution: String,
    genre: Option<&str>,
    agent: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = api_key()?;
    let registry = Arc::new(Registry::from_file(config)?);

    let optimizer = PlotOptimizer::new(GeminiClient::new(api_key), registry);
    let plot = Plot {
        setup,
        conflict,
        resolution,
    };

    let improvement = optimizer.run(agent, &plot, genre).await?;

    println!("Suggested improvements:");
    for (index, suggestion) in improvement.suggestions().iter().enumerate() {
        println!("{}. {}", index + 1, suggestion);
    }
    Ok(())
}

/// Drive the character registry.
pub fn handle_characters(
    file: &Path,
    action: CharacterAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = CharacterRegistry::open(file)?;

    match action {
        CharacterAction::Add {
            name,
            role,
            description,
        } => {
            registry.upsert(Character {
                name: name.clone(),
                role,
                description,
            })?;
            println!("Added {name} to {}", registry.path().display());
        }

        CharacterAction::Get { name } => match registry.get(&name) {
            Some(character) => {
                println!(
                    "{} ({}): {}",
                    character.name, character.role, character.description
                );
            }
            None => println!("No character named '{name}'"),
        },

        CharacterAction::List => {
            let characters = registry.list();
            if characters.is_empty() {
                println!("No characters registered");
            }
            for character in characters {
                println!(
                    "- {} ({}): {}",
                    character.name, character.role, character.description
                );
            }
        }
    }

    Ok(())
}
