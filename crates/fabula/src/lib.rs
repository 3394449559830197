//! Fabula - configuration-driven story generation.
//!
//! Fabula generates structured narrative artifacts (title, characters,
//! plot, themes) from a genre string by dispatching to declaratively
//! configured agents. Each dispatch resolves an agent/tool pair from the
//! registry, renders its prompt template, invokes the external generation
//! capability under the declared contract, schema-validates the returned
//! payload, and persists it atomically to genre-partitioned storage.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{AgentDispatcher, GeminiClient, Registry, StoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(Registry::from_file("config/fabula.toml")?);
//!     let store = StoryStore::new("./stories")?;
//!     let client = GeminiClient::new(std::env::var("GEMINI_API_KEY")?);
//!
//!     let dispatcher = AgentDispatcher::new(client, registry, store);
//!     let (artifact, location) = dispatcher
//!         .run_story("comic_story_creator_v1", "mystery")
//!         .await?;
//!     println!("{} -> {}", artifact.title, location.structured_path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Fabula is organized as a workspace with focused crates:
//!
//! - `fabula_error` - error types
//! - `fabula_core` - core data types (requests, story artifacts)
//! - `fabula_interface` - the `FabulaDriver` trait
//! - `fabula_config` - the configuration registry
//! - `fabula_storage` - genre-partitioned atomic storage
//! - `fabula_models` - generation capability drivers
//! - `fabula_agent` - the dispatch and validation pipeline
//!
//! This crate (`fabula`) re-exports everything for convenience.

#![forbid(unsafe_code)]

pub use fabula_agent::{
    render, validate_story, validate_suggestions, AgentDispatcher, CharacterRegistry,
    DispatchConfig, Overrides, PlotOptimizer, StoryDraft, ToolInvoker,
};
pub use fabula_config::{
    AgentDefinition, PromptPair, Registry, SecondaryAgentClass, SecondaryAgentDefinition,
    ToolDefinition, ToolKind,
};
pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::FabulaDriver;
pub use fabula_models::GeminiClient;
pub use fabula_storage::{StoredLocation, StoryStore};
