//! Plot improvement analysis.

use crate::dispatcher::{invoke_validated, DispatchConfig};
use crate::invoker::{Overrides, ToolInvoker};
use crate::template::render;
use crate::validation::validate_suggestions;
use fabula_config::{Registry, SecondaryAgentClass, SecondaryAgentDefinition};
use fabula_core::{Plot, PlotImprovement};
use fabula_error::{ConfigError, FabulaResult};
use fabula_interface::FabulaDriver;
use std::collections::HashMap;
use std::sync::Arc;

/// Template purpose used when the secondary agent config names none.
const DEFAULT_TEMPLATE: &str = "plot_optimization";

/// Produces improvement suggestions from an existing plot summary.
///
/// Reuses the invoker and renderer the dispatcher uses, validates against
/// the suggestion shape, and persists nothing: exactly three suggestions
/// come back or the run fails.
pub struct PlotOptimizer<D: FabulaDriver> {
    driver: D,
    registry: Arc<Registry>,
    config: DispatchConfig,
}

impl<D: FabulaDriver> PlotOptimizer<D> {
    /// Create an optimizer with default policy.
    pub fn new(driver: D, registry: Arc<Registry>) -> Self {
        Self {
            driver,
            registry,
            config: DispatchConfig::default(),
        }
    }

    /// Replace the dispatch policy.
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Analyze a plot and return exactly three improvement suggestions.
    ///
    /// # Errors
    ///
    /// Config failures (wrong class, missing tool binding) surface as
    /// config errors; malformed output is retried up to the configured
    /// bound before its validation error surfaces.
    #[tracing::instrument(skip(self, plot), fields(agent = %agent_id))]
    pub async fn run(
        &self,
        agent_id: &str,
        plot: &Plot,
        genre: Option<&str>,
    ) -> FabulaResult<PlotImprovement> {
        let secondary = self.registry.secondary_agent(agent_id)?;
        if *secondary.class() != SecondaryAgentClass::PlotOptimizer {
            return Err(ConfigError::new(format!(
                "secondary agent '{}' has class '{}', expected plot_optimizer",
                agent_id,
                secondary.class()
            ))
            .into());
        }

        let tool_id = config_str(secondary, "llm_tool_id").ok_or_else(|| {
            ConfigError::new(format!("secondary agent '{agent_id}' has no llm_tool_id"))
        })?;
        let tool = self.registry.tool(&tool_id)?;

        let purpose = config_str(secondary, "template")
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
        let pair = tool.template(&purpose).ok_or_else(|| {
            ConfigError::new(format!(
                "tool '{}' defines no template '{}'",
                tool.id(),
                purpose
            ))
        })?;
        // an inline template in the agent config wins over the named pair
        let user_template =
            config_str(secondary, "prompt_template").unwrap_or_else(|| pair.user().clone());

        let variables = HashMap::from([
            ("plot_summary".to_string(), summarize(plot)),
            (
                "genre".to_string(),
                genre.unwrap_or("unspecified").to_string(),
            ),
        ]);
        let system = render(pair.system(), &variables)?;
        let user = render(&user_template, &variables)?;

        let invoker = ToolInvoker::new(&self.driver, tool).with_timeout(self.config.timeout);
        let overrides = Overrides {
            model: config_str(secondary, "model"),
            ..Overrides::default()
        };

        invoke_validated(
            &invoker,
            &system,
            &user,
            &overrides,
            self.config.validation_retries,
            validate_suggestions,
        )
        .await
    }
}

/// Render the three-part plot as the summary text the template embeds.
fn summarize(plot: &Plot) -> String {
    format!(
        "Setup: {}\nConflict: {}\nResolution: {}",
        plot.setup, plot.conflict, plot.resolution
    )
}

fn config_str(secondary: &SecondaryAgentDefinition, key: &str) -> Option<String> {
    secondary
        .config()
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use fabula_core::Plot;

    #[test]
    fn summary_carries_all_three_parts() {
        let plot = Plot {
            setup: "a".to_string(),
            conflict: "b".to_string(),
            resolution: "c".to_string(),
        };
        let summary = summarize(&plot);
        assert!(summary.contains("Setup: a"));
        assert!(summary.contains("Conflict: b"));
        assert!(summary.contains("Resolution: c"));
    }
}
