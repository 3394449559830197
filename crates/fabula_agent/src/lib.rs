//! Agent dispatch and validation pipeline for Fabula.
//!
//! This crate orchestrates a dispatch end to end: resolve an agent and its
//! tool from the configuration registry, render the prompt templates with
//! request variables, invoke the generation capability under the declared
//! contract, validate the returned payload against a required shape, and
//! persist the artifact to partitioned storage.
//!
//! # Example
//!
//! ```rust,ignore
//! use fabula_agent::AgentDispatcher;
//! use fabula_config::Registry;
//! use fabula_models::GeminiClient;
//! use fabula_storage::StoryStore;
//! use std::sync::Arc;
//!
//! # async fn example(api_key: String) -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(Registry::from_file("config/fabula.toml")?);
//! let store = StoryStore::new("./stories")?;
//! let dispatcher = AgentDispatcher::new(GeminiClient::new(api_key), registry, store);
//!
//! let (artifact, location) = dispatcher
//!     .run_story("comic_story_creator_v1", "mystery")
//!     .await?;
//! println!("Saved {} to {}", artifact.title, location.structured_path.display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod characters;
mod dispatcher;
mod extraction;
mod invoker;
mod optimizer;
mod template;
mod validation;

pub use characters::CharacterRegistry;
pub use dispatcher::{AgentDispatcher, DispatchConfig};
pub use extraction::extract_structured;
pub use invoker::{Overrides, ToolInvoker};
pub use optimizer::PlotOptimizer;
pub use template::render;
pub use validation::{validate_story, validate_suggestions, StoryDraft};
