//! Domain types for agent, tool, and prompt-template definitions.
//!
//! All definitions are loaded once at process start and immutable
//! thereafter; the registry hands out shared references only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named, configured unit of behavior mapping an input to a generation
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AgentDefinition {
    /// Unique identifier for this agent
    id: String,
    /// Human-readable description of what this agent does
    description: String,
    /// Agent version recorded in artifact metadata
    #[serde(default = "default_version")]
    version: String,
    /// Optional inline system template
    #[serde(default)]
    instruction: Option<String>,
    /// Optional inline user template
    #[serde(default)]
    prompt: Option<String>,
    /// Optional named template pair on the referenced tool (e.g. "story")
    #[serde(default)]
    template: Option<String>,
    /// Model override for this agent
    #[serde(default)]
    model: Option<String>,
    /// Temperature override for this agent
    #[serde(default)]
    temperature: Option<f32>,
    /// Max-token override for this agent
    #[serde(default)]
    max_tokens: Option<u32>,
    /// Tool references, resolved against the registry at load time
    tools: Vec<String>,
}

fn default_version() -> String {
    "v0.1".to_string()
}

impl AgentDefinition {
    /// The agent's primary tool reference.
    ///
    /// The registry guarantees at load time that at least one reference
    /// exists and that every reference resolves.
    pub fn primary_tool(&self) -> &str {
        &self.tools[0]
    }
}

/// Behavior tag for secondary agents.
///
/// A closed set of variants rather than free-form class strings, so adding
/// a behavior means adding a variant, not touching dispatch logic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondaryAgentClass {
    /// Produces improvement suggestions from an existing plot summary
    PlotOptimizer,
    /// Maintains a keyed collection of character records
    CharacterRegistry,
}

/// A secondary agent definition: id, behavior tag, and free-form config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SecondaryAgentDefinition {
    /// Unique identifier for this secondary agent
    id: String,
    /// Behavior tag
    class: SecondaryAgentClass,
    /// Free-form configuration table, interpreted by the behavior
    #[serde(default)]
    config: toml::Table,
}

/// Capability kind of a tool.
///
/// Currently the only capability is text generation; the closed enum leaves
/// room to add kinds without touching dispatch logic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolKind {
    /// External language-generation capability
    Generation,
}

/// A system/user prompt template pair keyed by purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PromptPair {
    /// System template
    system: String,
    /// User template with request-variable placeholders
    user: String,
}

impl PromptPair {
    /// Construct a pair; used by the registry when resolving an agent's
    /// inline templates.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// A named wrapper around the external generation capability with default
/// invocation parameters and prompt templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ToolDefinition {
    /// Unique identifier for this tool
    id: String,
    /// Capability kind
    kind: ToolKind,
    /// Default model identifier
    model: String,
    /// Default sampling temperature
    temperature: f32,
    /// Default max-token budget
    max_tokens: u32,
    /// Named prompt template pairs keyed by purpose (e.g. "story")
    #[serde(default)]
    prompt_templates: HashMap<String, PromptPair>,
}

impl ToolDefinition {
    /// Assemble a definition from the flattened parts of a document entry.
    pub(crate) fn from_parts(
        id: String,
        kind: ToolKind,
        model: String,
        temperature: f32,
        max_tokens: u32,
        prompt_templates: HashMap<String, PromptPair>,
    ) -> Self {
        Self {
            id,
            kind,
            model,
            temperature,
            max_tokens,
            prompt_templates,
        }
    }

    /// Look up a named template pair.
    pub fn template(&self, purpose: &str) -> Option<&PromptPair> {
        self.prompt_templates.get(purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_kind_serializes_snake_case() {
        let kind: ToolKind = parse_value("\"generation\"");
        assert_eq!(kind, ToolKind::Generation);
        assert_eq!(kind.to_string(), "generation");
    }

    #[test]
    fn secondary_class_serializes_snake_case() {
        let class: SecondaryAgentClass = parse_value("\"plot_optimizer\"");
        assert_eq!(class, SecondaryAgentClass::PlotOptimizer);
    }

    fn parse_value<T: serde::de::DeserializeOwned>(raw: &str) -> T {
        // toml has no bare-value documents, so wrap in a table
        let doc = format!("value = {raw}");
        #[derive(Deserialize)]
        struct Wrapper<T> {
            value: T,
        }
        let wrapper: Wrapper<T> = toml::from_str(&doc).unwrap();
        wrapper.value
    }
}
