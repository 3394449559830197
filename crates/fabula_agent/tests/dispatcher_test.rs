//! End-to-end dispatcher tests against scripted capability stubs.

use async_trait::async_trait;
use fabula_agent::{AgentDispatcher, DispatchConfig};
use fabula_config::Registry;
use fabula_core::{GenerateRequest, GenerateResponse, Output};
use fabula_error::{
    FabulaErrorKind, FabulaResult, InvocationError, InvocationErrorKind,
};
use fabula_interface::FabulaDriver;
use fabula_storage::StoryStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const STORY_JSON: &str = r#"{"title":"The Locked Room","plot":{"setup":"A body is found in a sealed study.","conflict":"Every suspect has an alibi.","resolution":"The room was never locked at all."}}"#;

/// One scripted reply from the stub capability.
enum Step {
    Text(&'static str),
    Transport(&'static str),
    Hang,
}

/// Capability stub that plays back a fixed script of responses.
struct ScriptedDriver {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FabulaDriver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("driver called more times than scripted");
        match step {
            Step::Text(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text.to_string())],
            }),
            Step::Transport(message) => Err(InvocationError::new(
                InvocationErrorKind::Transport(message.to_string()),
            )
            .into()),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(GenerateResponse {
                    outputs: vec![Output::Text("too late".to_string())],
                })
            }
        }
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
        [[agents]]
        id = "comic_story_creator_v1"
        description = "Creates comic story structures based on specified genres"
        version = "v0.1"
        template = "story"
        tools = ["llm_tool_gemini_pro"]

        [[tools]]
        id = "llm_tool_gemini_pro"
        kind = "generation"

        [tools.config]
        model = "gemini-2.0-flash"
        temperature = 0.7
        max_tokens = 1000

        [tools.config.prompt_templates.story]
        system = "You are a creative story generator. Output ONLY valid JSON."
        user = "Genre: {genre}. Produce a story structure as JSON."
    "#;
    Arc::new(document.parse().unwrap())
}

fn dispatcher(
    steps: Vec<Step>,
    store_dir: &TempDir,
) -> (Arc<ScriptedDriver>, AgentDispatcher<Arc<ScriptedDriver>>) {
    let driver = Arc::new(ScriptedDriver::new(steps));
    let store = StoryStore::new(store_dir.path()).unwrap();
    let dispatcher = AgentDispatcher::new(driver.clone(), registry(), store);
    (driver, dispatcher)
}

#[tokio::test]
async fn dispatch_persists_a_validated_artifact() {
    let store_dir = TempDir::new().unwrap();
    let (driver, dispatcher) = dispatcher(vec![Step::Text(STORY_JSON)], &store_dir);

    let (artifact, location) = dispatcher
        .run_story("comic_story_creator_v1", "mystery")
        .await
        .unwrap();

    assert_eq!(driver.calls(), 1);
    assert_eq!(artifact.title, "The Locked Room");
    assert_eq!(artifact.genre, "mystery");
    assert_eq!(artifact.metadata.agent_version, "v0.1");
    assert_eq!(location.partition, "mystery");

    // the persisted structured file deep-equals the validated artifact
    let store = StoryStore::new(store_dir.path()).unwrap();
    let reread = store.read_structured(&location).unwrap();
    assert_eq!(reread, artifact);
}

#[tokio::test]
async fn malformed_output_is_retried_within_the_bound() {
    let store_dir = TempDir::new().unwrap();
    let (driver, dispatcher) = dispatcher(
        vec![
            Step::Text("sorry, no JSON here"),
            Step::Text("still prose"),
            Step::Text(STORY_JSON),
        ],
        &store_dir,
    );

    // default bound is 2 retries: invalid, invalid, then valid succeeds
    let (artifact, _) = dispatcher
        .run_story("comic_story_creator_v1", "mystery")
        .await
        .unwrap();

    assert_eq!(driver.calls(), 3);
    assert_eq!(artifact.title, "The Locked Room");
}

#[tokio::test]
async fn retry_bound_of_one_surfaces_the_validation_error() {
    let store_dir = TempDir::new().unwrap();
    let (driver, dispatcher) = dispatcher(
        vec![
            Step::Text("sorry, no JSON here"),
            Step::Text("still prose"),
            Step::Text(STORY_JSON),
        ],
        &store_dir,
    );
    let dispatcher = dispatcher.with_config(DispatchConfig {
        validation_retries: 1,
        timeout: None,
    });

    let err = dispatcher
        .run_story("comic_story_creator_v1", "mystery")
        .await
        .unwrap_err();

    assert_eq!(driver.calls(), 2);
    assert!(matches!(err.kind(), FabulaErrorKind::Validation(_)));
}

#[tokio::test]
async fn transport_failures_are_never_retried() {
    let store_dir = TempDir::new().unwrap();
    let (driver, dispatcher) = dispatcher(
        vec![Step::Transport("connection refused"), Step::Text(STORY_JSON)],
        &store_dir,
    );

    let err = dispatcher
        .run_story("comic_story_creator_v1", "mystery")
        .await
        .unwrap_err();

    assert_eq!(driver.calls(), 1);
    match err.kind() {
        FabulaErrorKind::Invocation(invocation) => {
            assert!(matches!(
                invocation.kind,
                InvocationErrorKind::Transport(_)
            ));
        }
        other => panic!("expected invocation error, got {other}"),
    }
}

#[tokio::test]
async fn timeout_abandons_the_call_and_persists_nothing() {
    let store_dir = TempDir::new().unwrap();
    let (_driver, dispatcher) = dispatcher(vec![Step::Hang], &store_dir);
    let dispatcher = dispatcher.with_config(DispatchConfig {
        validation_retries: 2,
        timeout: Some(Duration::from_millis(50)),
    });

    let err = dispatcher
        .run_story("comic_story_creator_v1", "mystery")
        .await
        .unwrap_err();

    match err.kind() {
        FabulaErrorKind::Invocation(invocation) => {
            assert!(matches!(invocation.kind, InvocationErrorKind::Timeout(_)));
        }
        other => panic!("expected timeout, got {other}"),
    }

    // no partial artifact under the would-be partition
    assert!(!store_dir.path().join("mystery").exists());
}

#[tokio::test]
async fn unknown_agent_fails_before_any_invocation() {
    let store_dir = TempDir::new().unwrap();
    let (driver, dispatcher) = dispatcher(vec![Step::Text(STORY_JSON)], &store_dir);

    let err = dispatcher.run_story("ghost_agent_v1", "mystery").await.unwrap_err();

    assert_eq!(driver.calls(), 0);
    assert!(matches!(err.kind(), FabulaErrorKind::Config(_)));
}

#[tokio::test]
async fn concurrent_dispatches_share_the_registry() {
    let store_dir = TempDir::new().unwrap();
    let (_driver, dispatcher) = dispatcher(
        vec![Step::Text(STORY_JSON), Step::Text(STORY_JSON)],
        &store_dir,
    );
    let dispatcher = Arc::new(dispatcher);

    let a = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.run_story("comic_story_creator_v1", "mystery").await })
    };
    let b = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.run_story("comic_story_creator_v1", "mystery").await })
    };

    let (_, first_location) = a.await.unwrap().unwrap();
    let (_, second_location) = b.await.unwrap().unwrap();
    assert_ne!(first_location.key, second_location.key);
}
