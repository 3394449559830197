//! Plot optimizer tests against scripted capability stubs.

use async_trait::async_trait;
use fabula_agent::PlotOptimizer;
use fabula_config::Registry;
use fabula_core::{GenerateRequest, GenerateResponse, Output, Plot};
use fabula_error::{FabulaErrorKind, FabulaResult};
use fabula_interface::FabulaDriver;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Capability stub that plays back fixed text replies.
struct ScriptedDriver {
    replies: Mutex<VecDeque<&'static str>>,
}

impl ScriptedDriver {
    fn new(replies: Vec<&'static str>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl FabulaDriver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("driver called more times than scripted");
        Ok(GenerateResponse {
            outputs: vec![Output::Text(text.to_string())],
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model-v1"
    }
}

fn registry() -> Arc<Registry> {
    let document = r#"
        [[secondary_agents]]
        id = "plot_optimizer_agent_v1"
        class = "plot_optimizer"

        [secondary_agents.config]
        llm_tool_id = "llm_tool_gemini_pro"

        [[secondary_agents]]
        id = "character_registry_v1"
        class = "character_registry"

        [[tools]]
        id = "llm_tool_gemini_pro"
        kind = "generation"

        [tools.config]
        model = "gemini-2.0-flash"
        temperature = 0.7
        max_tokens = 1500

        [tools.config.prompt_templates.plot_optimization]
        system = "You are an experienced editor."
        user = "Plot summary:\n{plot_summary}\n\nGenre: {genre}. Suggest exactly three improvements."
    "#;
    Arc::new(document.parse().unwrap())
}

fn plot() -> Plot {
    Plot {
        setup: "A quiet village is attacked.".to_string(),
        conflict: "The heroes fall out on the road.".to_string(),
        resolution: "The lone survivor prevails.".to_string(),
    }
}

#[tokio::test]
async fn numbered_list_yields_three_suggestions_in_order() {
    let driver = ScriptedDriver::new(vec![
        "1. Give the villain a motive\n2. Slow the falling-out\n3. Earn the final victory",
    ]);
    let optimizer = PlotOptimizer::new(driver, registry());

    let improvement = optimizer
        .run("plot_optimizer_agent_v1", &plot(), Some("fantasy"))
        .await
        .unwrap();

    assert_eq!(
        improvement.suggestions(),
        [
            "Give the villain a motive",
            "Slow the falling-out",
            "Earn the final victory"
        ]
    );
}

#[tokio::test]
async fn structured_suggestions_are_accepted() {
    let driver = ScriptedDriver::new(vec![
        r#"{"suggestions": ["raise stakes", "cut subplot", "foreshadow twist"]}"#,
    ]);
    let optimizer = PlotOptimizer::new(driver, registry());

    let improvement = optimizer
        .run("plot_optimizer_agent_v1", &plot(), None)
        .await
        .unwrap();
    assert_eq!(improvement.suggestions().len(), 3);
}

#[tokio::test]
async fn partial_counts_fail_after_retries() {
    // two suggestions every time: retried twice, then the error surfaces
    let driver = ScriptedDriver::new(vec![
        "1. Only one\n2. And another",
        "1. Only one\n2. And another",
        "1. Only one\n2. And another",
    ]);
    let optimizer = PlotOptimizer::new(driver, registry());

    let err = optimizer
        .run("plot_optimizer_agent_v1", &plot(), None)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Validation(_)));
}

#[tokio::test]
async fn wrong_secondary_class_is_a_config_error() {
    let driver = ScriptedDriver::new(vec![]);
    let optimizer = PlotOptimizer::new(driver, registry());

    let err = optimizer
        .run("character_registry_v1", &plot(), None)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Config(_)));
}
