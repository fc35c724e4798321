//! Integration tests for the voxflow-voice crate.
//!
//! Wires a real catalog, workflow layer and dispatcher together with a
//! recording UI bridge and speech sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use voxflow_actions::{
    ActionCatalog, ActionExecutor, ActionItem, ActionMatcher, ActionRegistry, ComponentConfig,
    ExecutionResult, handler_fn,
};
use voxflow_intent::IntentParser;
use voxflow_speech::{Announcer, RecognitionConfig, SpeechOptions, SpeechPreferences, SpeechSink};
use voxflow_voice::{
    ListenOutcome, RecognitionEvent, Transcript, UiBridge, UiCommand, VoiceCommandExecutor, listen,
};
use voxflow_workflow::{WorkflowBuilder, WorkflowExecutor, WorkflowRegistry};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingUi(Mutex<Vec<UiCommand>>);

#[async_trait]
impl UiBridge for RecordingUi {
    async fn perform(&self, command: &UiCommand) -> ExecutionResult {
        self.0.lock().unwrap().push(command.clone());
        ExecutionResult::ok(format!("Done: {command}"))
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<String>>);

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn speak(&self, text: &str, _options: &SpeechOptions) -> voxflow_speech::Result<()> {
        self.0.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

struct Harness {
    executor: VoiceCommandExecutor,
    ui: Arc<RecordingUi>,
    spoken: Arc<RecordingSink>,
    saves: Arc<AtomicUsize>,
}

const WORKFLOWS: &str = r#"
[[workflows]]
id = "quick-save"
name = "Quick save"
trigger_phrases = ["quick save"]

[[workflows.steps]]
id = "s1"
type = "speak"
message = "Saving"

[[workflows.steps]]
id = "s2"
type = "action"
action_id = "save"
component_id = "form1"
"#;

fn harness() -> Harness {
    let saves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&saves);

    let registry = ActionRegistry::new();
    registry.register_component(
        ComponentConfig::new("form1", "Patient form").with_action(
            ActionItem::new(
                "save",
                "Save",
                handler_fn(move |_| {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(None)
                    }
                }),
            )
            .with_voice_command("save record"),
        ),
    );
    let catalog: Arc<dyn ActionCatalog> = Arc::new(registry);

    let spoken = Arc::new(RecordingSink::default());
    let announcer = Announcer::new(spoken.clone(), SpeechPreferences::default());
    let workflow_executor = Arc::new(
        WorkflowExecutor::new(ActionExecutor::new(Arc::clone(&catalog)))
            .with_announcer(announcer.clone()),
    );
    let matcher = ActionMatcher::new(catalog);
    let builder = WorkflowBuilder::new(matcher.clone(), workflow_executor);

    let ui = Arc::new(RecordingUi::default());
    let executor = VoiceCommandExecutor::new(IntentParser::new(), matcher, builder)
        .with_workflows(Arc::new(WorkflowRegistry::from_toml_str(WORKFLOWS).unwrap()))
        .with_ui(ui.clone())
        .with_announcer(announcer);

    Harness {
        executor,
        ui,
        spoken,
        saves,
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Dispatch
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn static_trigger_runs_named_workflow() {
    let h = harness();
    let result = h.executor.handle_command("Quick save please").await;
    assert!(result.success);
    assert_eq!(result.data.unwrap()["workflowId"], "quick-save");
    assert_eq!(h.saves.load(Ordering::SeqCst), 1);
    assert_eq!(h.spoken.0.lock().unwrap()[0], "Saving");
}

#[tokio::test]
async fn structural_intents_reach_the_ui_with_slots() {
    let h = harness();
    assert!(h.executor.handle_command("open patient Jane Roe").await.success);
    assert!(h.executor.handle_command("search for aspirin").await.success);

    let seen = h.ui.0.lock().unwrap();
    assert_eq!(
        seen[0],
        UiCommand::OpenPatient {
            query: "Jane Roe".into()
        }
    );
    assert_eq!(
        seen[1],
        UiCommand::Search {
            query: "aspirin".into()
        }
    );
    assert_eq!(h.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn click_without_catalog_match_goes_to_ui() {
    let h = harness();
    let result = h.executor.handle_command("click print").await;
    assert!(result.success);
    assert_eq!(
        h.ui.0.lock().unwrap()[0],
        UiCommand::ClickButton {
            label: "print".into()
        }
    );
}

#[tokio::test]
async fn unmatched_free_text_is_spoken_back() {
    let h = harness();
    let result = h.executor.handle_command("order pizza").await;
    assert!(result.success);
    let spoken = h.spoken.0.lock().unwrap();
    assert!(spoken.iter().any(|s| s.contains("order pizza")));
}

#[tokio::test]
async fn every_outcome_is_announced() {
    let h = harness();
    h.executor.handle_command("help").await;
    h.executor.handle_command("").await;
    let spoken = h.spoken.0.lock().unwrap();
    assert!(spoken[0].starts_with("You can say: save record, quick save"));
    assert_eq!(spoken[1], "empty command");
}

// ═══════════════════════════════════════════════════════════════════════
//  Listener
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn listener_handles_finals_until_stop() {
    let h = harness();
    let (tx, rx) = mpsc::channel(8);
    tx.send(Transcript::interim("save rec")).await.unwrap();
    tx.send(Transcript::final_text("save record")).await.unwrap();
    tx.send(Transcript::final_text("   ")).await.unwrap();
    tx.send(Transcript::final_text("stop")).await.unwrap();
    tx.send(Transcript::final_text("save record")).await.unwrap();

    let report = listen(rx, &h.executor, RecognitionConfig::default()).await;
    assert_eq!(report.outcome, ListenOutcome::Stopped);
    assert_eq!(report.handled, 2);
    assert_eq!(h.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn listener_returns_when_channel_closes() {
    let h = harness();
    let (tx, rx) = mpsc::channel(4);
    tx.send(Transcript::final_text("save record")).await.unwrap();
    drop(tx);

    let report = listen(rx, &h.executor, RecognitionConfig::default()).await;
    assert_eq!(report.outcome, ListenOutcome::Closed);
    assert_eq!(report.handled, 1);
}

#[tokio::test]
async fn listener_restarts_after_end_and_recoverable_errors() {
    let h = harness();
    let (tx, rx) = mpsc::channel(8);
    tx.send(RecognitionEvent::End).await.unwrap();
    tx.send(RecognitionEvent::error("no-speech")).await.unwrap();
    tx.send(RecognitionEvent::error("network")).await.unwrap();
    tx.send(Transcript::final_text("save record").into()).await.unwrap();
    drop(tx);

    let report = listen(rx, &h.executor, RecognitionConfig::default()).await;
    assert_eq!(report.outcome, ListenOutcome::Closed);
    assert_eq!(report.restarts, 3);
    assert_eq!(report.handled, 1);
    assert_eq!(h.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn listener_halts_on_fatal_error() {
    let h = harness();
    let (tx, rx) = mpsc::channel::<RecognitionEvent>(4);
    tx.send(RecognitionEvent::error("not-allowed")).await.unwrap();
    tx.send(Transcript::final_text("save record").into()).await.unwrap();

    let report = listen(rx, &h.executor, RecognitionConfig::default()).await;
    assert_eq!(report.outcome, ListenOutcome::Failed);
    assert_eq!(report.handled, 0);
    assert_eq!(h.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn single_utterance_listener_ends_with_the_engine() {
    let h = harness();
    let (tx, rx) = mpsc::channel::<RecognitionEvent>(4);
    tx.send(Transcript::final_text("save record").into()).await.unwrap();
    tx.send(RecognitionEvent::End).await.unwrap();
    tx.send(Transcript::final_text("save record").into()).await.unwrap();

    let config = RecognitionConfig {
        continuous: false,
        ..RecognitionConfig::default()
    };
    let report = listen(rx, &h.executor, config).await;
    assert_eq!(report.outcome, ListenOutcome::Ended);
    assert_eq!(report.handled, 1);
    assert_eq!(report.restarts, 0);
}
