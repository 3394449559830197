//! Intermediate structures for the raw TOML configuration document.
//!
//! The document keeps tool model parameters and templates under a nested
//! `config` table; parsing flattens them into the domain types in
//! `definitions`.

use crate::{
    AgentDefinition, PromptPair, SecondaryAgentDefinition, ToolDefinition, ToolKind,
};
use serde::Deserialize;
use std::collections::HashMap;

/// The whole configuration document: three top-level collections.
#[derive(Debug, Deserialize)]
pub(crate) struct TomlConfigDocument {
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
    #[serde(default)]
    pub secondary_agents: Vec<SecondaryAgentDefinition>,
    #[serde(default)]
    pub tools: Vec<TomlToolEntry>,
}

/// A tool entry as written in the document.
#[derive(Debug, Deserialize)]
pub(crate) struct TomlToolEntry {
    pub id: String,
    pub kind: ToolKind,
    pub config: TomlToolConfig,
}

/// The nested `config` table of a tool entry.
#[derive(Debug, Deserialize)]
pub(crate) struct TomlToolConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default)]
    pub prompt_templates: HashMap<String, PromptPair>,
}

impl TomlToolEntry {
    /// Flatten the entry into the domain type.
    pub fn into_definition(self) -> ToolDefinition {
        ToolDefinition::from_parts(
            self.id,
            self.kind,
            self.config.model,
            self.config.temperature,
            self.config.max_tokens,
            self.config.prompt_templates,
        )
    }
}
