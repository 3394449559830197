//! Dispatch orchestration: resolve, render, invoke, validate, persist.

use crate::invoker::{Overrides, ToolInvoker};
use crate::template::render;
use crate::validation::validate_story;
use chrono::Utc;
use fabula_config::{AgentDefinition, Registry};
use fabula_core::{StoryArtifact, StoryMetadata};
use fabula_error::{FabulaError, FabulaResult, ValidationError};
use fabula_interface::FabulaDriver;
use fabula_storage::{StoredLocation, StoryStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Dispatch-level policy knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// How many times a tool is re-invoked after malformed output before
    /// the validation error surfaces. Invocation and config failures are
    /// never retried.
    pub validation_retries: u32,
    /// Optional bound on each capability call.
    pub timeout: Option<Duration>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            validation_retries: 2,
            timeout: None,
        }
    }
}

/// Orchestrates the pipeline for artifact-producing agents.
///
/// Each dispatch is an independent task sharing only the read-only
/// registry; progression is resolve → render → invoke → validate → persist,
/// and any step's failure short-circuits with its error kind preserved.
pub struct AgentDispatcher<D: FabulaDriver> {
    driver: D,
    registry: Arc<Registry>,
    store: StoryStore,
    config: DispatchConfig,
}

impl<D: FabulaDriver> AgentDispatcher<D> {
    /// Create a dispatcher with default policy.
    pub fn new(driver: D, registry: Arc<Registry>, store: StoryStore) -> Self {
        Self {
            driver,
            registry,
            store,
            config: DispatchConfig::default(),
        }
    }

    /// Replace the dispatch policy.
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry this dispatcher resolves against.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Dispatch a story-generating agent for a genre.
    ///
    /// Resolves the agent and its tool, renders the prompt pair with
    /// `{genre}`, invokes the capability, validates the story shape, stamps
    /// genre and provenance metadata, and persists the artifact.
    ///
    /// # Errors
    ///
    /// Surfaces the originating error kind of whichever step failed. Only
    /// validation failures are retried, up to the configured bound, by
    /// re-invoking the tool.
    #[tracing::instrument(skip(self), fields(agent = %agent_id, genre = %genre))]
    pub async fn run_story(
        &self,
        agent_id: &str,
        genre: &str,
    ) -> FabulaResult<(StoryArtifact, StoredLocation)> {
        let agent = self.registry.agent(agent_id)?;
        let tool = self.registry.tool(agent.primary_tool())?;

        let pair = self.registry.prompt_pair(agent)?;
        let variables = HashMap::from([("genre".to_string(), genre.to_string())]);
        let system = render(pair.system(), &variables)?;
        let user = render(pair.user(), &variables)?;

        let invoker = ToolInvoker::new(&self.driver, tool).with_timeout(self.config.timeout);
        let overrides = agent_overrides(agent);

        let draft = invoke_validated(
            &invoker,
            &system,
            &user,
            &overrides,
            self.config.validation_retries,
            validate_story,
        )
        .await?;

        let metadata = StoryMetadata {
            agent_version: agent.version().clone(),
            config: self.registry.source().to_string(),
            timestamp: Utc::now().format("%Y%m%d_%H%M%S").to_string(),
        };
        let artifact = draft.into_artifact(genre, metadata);

        let location = self.store.save(genre, &artifact)?;
        tracing::info!(
            title = %artifact.title,
            path = %location.structured_path.display(),
            "Dispatch complete"
        );

        Ok((artifact, location))
    }
}

/// Per-call overrides declared on the agent definition.
pub(crate) fn agent_overrides(agent: &AgentDefinition) -> Overrides {
    Overrides {
        model: agent.model().clone(),
        temperature: *agent.temperature(),
        max_tokens: *agent.max_tokens(),
    }
}

/// Invoke and validate, re-invoking on malformed output only.
///
/// Invocation errors propagate immediately; a validation error consumes one
/// retry until the bound is exhausted.
pub(crate) async fn invoke_validated<T, D: FabulaDriver>(
    invoker: &ToolInvoker<'_, D>,
    system: &str,
    user: &str,
    overrides: &Overrides,
    retries: u32,
    validate: impl Fn(&str) -> Result<T, ValidationError>,
) -> FabulaResult<T> {
    let mut attempt = 0u32;
    loop {
        let raw = invoker.invoke(system, user, overrides).await?;
        match validate(&raw) {
            Ok(value) => return Ok(value),
            Err(validation) if attempt < retries => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    retries,
                    error = %validation,
                    "Malformed output, re-invoking tool"
                );
            }
            Err(validation) => return Err(FabulaError::from(validation)),
        }
    }
}
