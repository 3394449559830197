//! The configuration registry: loading, indexing, and load-time validation.

use crate::document::TomlConfigDocument;
use crate::{AgentDefinition, PromptPair, SecondaryAgentDefinition, ToolDefinition};
use fabula_error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Indexed agent, secondary-agent, and tool definitions.
///
/// Loaded once at process start, immutable thereafter, and safe to share
/// across concurrent dispatches without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    source: String,
    agents: HashMap<String, AgentDefinition>,
    secondary_agents: HashMap<String, SecondaryAgentDefinition>,
    tools: HashMap<String, ToolDefinition>,
}

impl Registry {
    /// Loads a registry from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is invalid, or
    /// validation fails (dangling tool reference, duplicate id, parameter
    /// out of range). A failed load exposes no partial registry.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("failed to read {}: {}", path.display(), e)))?;

        let mut registry: Self = content.parse()?;
        registry.source = path.display().to_string();
        Ok(registry)
    }

    /// Label of the document this registry was loaded from.
    ///
    /// A file path when loaded via [`Registry::from_file`]; recorded in
    /// artifact metadata.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolve an agent definition by id.
    pub fn agent(&self, id: &str) -> Result<&AgentDefinition, ConfigError> {
        self.agents
            .get(id)
            .ok_or_else(|| ConfigError::new(format!("unknown agent: {id}")))
    }

    /// Resolve a tool definition by id.
    pub fn tool(&self, id: &str) -> Result<&ToolDefinition, ConfigError> {
        self.tools
            .get(id)
            .ok_or_else(|| ConfigError::new(format!("unknown tool: {id}")))
    }

    /// Resolve a secondary agent definition by id.
    pub fn secondary_agent(&self, id: &str) -> Result<&SecondaryAgentDefinition, ConfigError> {
        self.secondary_agents
            .get(id)
            .ok_or_else(|| ConfigError::new(format!("unknown secondary agent: {id}")))
    }

    /// Ids of all loaded agents, for listings.
    pub fn agent_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve the system/user template pair for an agent.
    ///
    /// Inline `instruction`/`prompt` text wins over the named pair on the
    /// agent's primary tool. Load-time validation guarantees this succeeds
    /// for every registered agent, so a failure here indicates an agent
    /// definition that bypassed the registry.
    pub fn prompt_pair(&self, agent: &AgentDefinition) -> Result<PromptPair, ConfigError> {
        let tool = self.tool(agent.primary_tool())?;
        let named = match agent.template() {
            Some(purpose) => Some(tool.template(purpose).ok_or_else(|| {
                ConfigError::new(format!(
                    "agent '{}' references template '{}' not defined on tool '{}'",
                    agent.id(),
                    purpose,
                    tool.id()
                ))
            })?),
            None => None,
        };

        let system = agent
            .instruction()
            .clone()
            .or_else(|| named.map(|pair| pair.system().clone()))
            .ok_or_else(|| {
                ConfigError::new(format!("agent '{}' has no system template", agent.id()))
            })?;
        let user = agent
            .prompt()
            .clone()
            .or_else(|| named.map(|pair| pair.user().clone()))
            .ok_or_else(|| {
                ConfigError::new(format!("agent '{}' has no user template", agent.id()))
            })?;

        Ok(PromptPair::new(system, user))
    }

    /// Validates the loaded definitions.
    ///
    /// Ensures:
    /// - ids are unique within each collection
    /// - every agent references at least one tool, and every reference
    ///   resolves
    /// - every agent's template pair resolves
    /// - temperatures are within [0, 2] and token budgets are positive
    ///
    /// # Errors
    ///
    /// Returns the first violation found; the whole load fails.
    #[tracing::instrument(skip(self), fields(agents = self.agents.len(), tools = self.tools.len()))]
    fn validate(&self) -> Result<(), ConfigError> {
        for tool in self.tools.values() {
            check_parameters(tool.id(), *tool.temperature(), *tool.max_tokens())?;
            for (purpose, pair) in tool.prompt_templates() {
                if pair.system().trim().is_empty() || pair.user().trim().is_empty() {
                    return Err(ConfigError::new(format!(
                        "tool '{}' template '{}' has an empty prompt",
                        tool.id(),
                        purpose
                    )));
                }
            }
        }

        for agent in self.agents.values() {
            if agent.tools().is_empty() {
                return Err(ConfigError::new(format!(
                    "agent '{}' references no tools",
                    agent.id()
                )));
            }
            for tool_id in agent.tools() {
                if !self.tools.contains_key(tool_id) {
                    return Err(ConfigError::new(format!(
                        "agent '{}' references unknown tool: {}",
                        agent.id(),
                        tool_id
                    )));
                }
            }
            if let Some(temperature) = agent.temperature() {
                check_temperature(agent.id(), *temperature)?;
            }
            if let Some(max_tokens) = agent.max_tokens() {
                check_max_tokens(agent.id(), *max_tokens)?;
            }
            self.prompt_pair(agent)?;
        }

        Ok(())
    }
}

fn check_parameters(id: &str, temperature: f32, max_tokens: u32) -> Result<(), ConfigError> {
    check_temperature(id, temperature)?;
    check_max_tokens(id, max_tokens)
}

fn check_temperature(id: &str, temperature: f32) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::new(format!(
            "'{id}' temperature {temperature} outside [0, 2]"
        )));
    }
    Ok(())
}

fn check_max_tokens(id: &str, max_tokens: u32) -> Result<(), ConfigError> {
    if max_tokens == 0 {
        return Err(ConfigError::new(format!("'{id}' max_tokens must be positive")));
    }
    Ok(())
}

impl FromStr for Registry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let document: TomlConfigDocument = toml::from_str(s)
            .map_err(|e| ConfigError::new(format!("failed to parse TOML: {e}")))?;

        let mut agents = HashMap::new();
        for agent in document.agents {
            if agents.insert(agent.id().clone(), agent).is_some() {
                return Err(ConfigError::new("duplicate agent id"));
            }
        }

        let mut secondary_agents = HashMap::new();
        for secondary in document.secondary_agents {
            if secondary_agents
                .insert(secondary.id().clone(), secondary)
                .is_some()
            {
                return Err(ConfigError::new("duplicate secondary agent id"));
            }
        }

        let mut tools = HashMap::new();
        for entry in document.tools {
            let tool = entry.into_definition();
            if tools.insert(tool.id().clone(), tool).is_some() {
                return Err(ConfigError::new("duplicate tool id"));
            }
        }

        let registry = Registry {
            source: "<inline>".to_string(),
            agents,
            secondary_agents,
            tools,
        };
        registry.validate()?;
        Ok(registry)
    }
}
