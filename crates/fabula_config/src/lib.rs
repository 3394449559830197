//! Agent and tool configuration registry for Fabula.
//!
//! This crate loads the declarative configuration document — agent
//! definitions, secondary agent definitions, and tool definitions — into
//! explicit, validated structs at process start. Shape errors are rejected
//! at load time rather than deferred into request-time code paths: a
//! dangling tool reference or an out-of-range parameter fails the entire
//! load, and no partial registry is ever exposed.
//!
//! # Example
//!
//! ```
//! use fabula_config::Registry;
//!
//! let document = r#"
//!     [[agents]]
//!     id = "comic_story_creator_v1"
//!     description = "Creates comic story structures"
//!     template = "story"
//!     tools = ["llm_tool_gemini_pro"]
//!
//!     [[tools]]
//!     id = "llm_tool_gemini_pro"
//!     kind = "generation"
//!
//!     [tools.config]
//!     model = "gemini-2.0-flash"
//!     temperature = 0.7
//!     max_tokens = 1000
//!
//!     [tools.config.prompt_templates.story]
//!     system = "You are a creative story generator."
//!     user = "Genre: {genre}"
//! "#;
//!
//! let registry: Registry = document.parse().unwrap();
//! let agent = registry.agent("comic_story_creator_v1").unwrap();
//! assert_eq!(agent.tools(), &["llm_tool_gemini_pro".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod definitions;
mod document;
mod registry;

pub use definitions::{
    AgentDefinition, PromptPair, SecondaryAgentClass, SecondaryAgentDefinition, ToolDefinition,
    ToolKind,
};
pub use registry::Registry;
