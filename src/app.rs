//! The demo application core: readiness state, status messages, and the
//! conversion handler that runs one text record through the pipeline.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::agent::{Agent, AgentError, AgentFactory};
use crate::extract::OutputExtractor;
use crate::DataContainer;

/// Shown until the agent has been built.
pub const INITIALIZING_STATUS: &str = "Initializing model...";

/// Shown once the agent is ready to take submissions.
pub const READY_STATUS: &str =
    "Model ready. Type the text you wish to convert to speech and submit to generate!";

/// Returned for submissions that arrive before initialization finishes.
pub const NOT_READY_STATUS: &str = "Model not ready! Please wait...";

/// The single user-facing error message, raised when no audio path can be
/// extracted from the pipeline output.
pub const GENERATION_FAILED: &str = "Unable to generate speech";

/// Per-session state: the opaque agent handle and the readiness flag.
///
/// Created not-ready, set exactly once by [`mark_ready`](Self::mark_ready),
/// read on every submission and never mutated again.
pub struct SessionState {
    agent: Option<Box<dyn Agent>>,
    initialized: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            agent: None,
            initialized: false,
        }
    }

    /// Install the agent handle and flip the readiness flag.
    pub fn mark_ready(&mut self, agent: Box<dyn Agent>) {
        self.agent = Some(agent);
        self.initialized = true;
    }

    pub fn is_ready(&self) -> bool {
        self.initialized
    }

    /// The current status line. Moves from initializing to ready exactly
    /// once, however often it is polled.
    pub fn status(&self) -> &'static str {
        if self.initialized {
            READY_STATUS
        } else {
            INITIALIZING_STATUS
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Initialization has not finished; the agent was not called.
    NotReady,
    /// Path of the generated audio file.
    Audio(String),
    /// The pipeline ran but no audio path could be extracted.
    Failed,
}

/// The text-to-speech demo application.
///
/// Holds everything chosen at construction time: the configuration file the
/// factory consumes, the output-extraction strategy, and the labels shown in
/// the page title.
#[derive(Builder)]
#[builder(pattern = "owned", setter(into))]
pub struct TtsApp {
    /// Path handed to the agent factory. Its contents are opaque here.
    config_file: PathBuf,
    /// How the audio path is pulled out of the pipeline output.
    extractor: OutputExtractor,
    /// Provider name shown in the page title.
    #[builder(default = "\"Elevenlabs\".to_string()")]
    framework: String,
    /// Task name shown in the page title.
    #[builder(default = "\"Text-to-Speech\".to_string()")]
    task: String,
    /// The external builder function producing the agent handle.
    agent_factory: AgentFactory,
}

impl TtsApp {
    pub fn builder() -> TtsAppBuilder {
        TtsAppBuilder::default()
    }

    /// Page title, e.g. `"Elevenlabs Text-to-Speech demo"`.
    pub fn title(&self) -> String {
        format!("{} {} demo", self.framework, self.task)
    }

    pub fn config_file(&self) -> &std::path::Path {
        &self.config_file
    }

    /// Build the agent from the configured file. Called once, from the
    /// shell's initialization callback.
    pub fn init_agent(&self) -> Result<Box<dyn Agent>, AgentError> {
        (self.agent_factory)(&self.config_file)
    }

    /// Run one text submission through the pipeline.
    ///
    /// Submissions that arrive before the session is ready return
    /// [`Conversion::NotReady`] without touching the agent. Agent failures
    /// propagate unmodified; an extraction that comes back empty is reported
    /// as [`Conversion::Failed`] and surfaced to the user by the shell.
    pub fn text_to_speech(
        &self,
        state: &mut SessionState,
        text: &str,
    ) -> Result<Conversion, AgentError> {
        let agent = match state.agent.as_mut() {
            Some(agent) if state.initialized => agent,
            _ => return Ok(Conversion::NotReady),
        };

        let container = DataContainer::from_text(text);
        let output = agent.process(container)?;

        match self.extractor.audio_path(&output) {
            Some(path) => Ok(Conversion::Audio(path)),
            None => {
                log::warn!(
                    "pipeline '{}' returned no audio path for a {}-char submission",
                    agent.name(),
                    text.chars().count()
                );
                Ok(Conversion::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts invocations and drops a fixed generic entry into the output.
    struct FakeAgent {
        calls: Arc<AtomicUsize>,
        audio_path: Option<serde_json::Value>,
        fail: bool,
    }

    impl Agent for FakeAgent {
        fn name(&self) -> &str {
            "fake"
        }

        fn process(&mut self, mut container: DataContainer) -> Result<DataContainer, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AgentError::Execution("synthesis backend down".into()));
            }
            if let Some(value) = self.audio_path.clone() {
                container.generic_data.insert("audio_path".to_string(), value);
            }
            Ok(container)
        }
    }

    fn unused_factory() -> AgentFactory {
        Arc::new(|_: &std::path::Path| -> Result<Box<dyn Agent>, AgentError> {
            Err(AgentError::Config("not used in tests".into()))
        })
    }

    fn app() -> TtsApp {
        TtsApp::builder()
            .config_file("unused.json")
            .extractor(OutputExtractor::generic_key("audio_path"))
            .agent_factory(unused_factory())
            .build()
            .unwrap()
    }

    #[test]
    fn not_ready_submission_skips_the_agent() {
        let calls = Arc::new(AtomicUsize::new(0));
        // Agent handle present but the flag still down: the guard must not
        // consult the handle at all.
        let mut state = SessionState {
            agent: Some(Box::new(FakeAgent {
                calls: Arc::clone(&calls),
                audio_path: None,
                fail: false,
            }) as Box<dyn Agent>),
            initialized: false,
        };

        let outcome = app().text_to_speech(&mut state, "hello").unwrap();
        assert_eq!(outcome, Conversion::NotReady);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fresh_session_is_not_ready() {
        let mut state = SessionState::new();
        let outcome = app().text_to_speech(&mut state, "hello").unwrap();
        assert_eq!(outcome, Conversion::NotReady);
    }

    #[test]
    fn ready_submission_returns_the_extracted_path() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut state = SessionState::new();
        state.mark_ready(Box::new(FakeAgent {
            calls: Arc::clone(&calls),
            audio_path: Some(json!(["/tmp/out.wav"])),
            fail: false,
        }));

        let outcome = app().text_to_speech(&mut state, "hello").unwrap();
        assert_eq!(outcome, Conversion::Audio("/tmp/out.wav".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_extraction_is_a_failed_conversion() {
        let mut state = SessionState::new();
        state.mark_ready(Box::new(FakeAgent {
            calls: Arc::new(AtomicUsize::new(0)),
            audio_path: None,
            fail: false,
        }));

        let outcome = app().text_to_speech(&mut state, "hello").unwrap();
        assert_eq!(outcome, Conversion::Failed);
    }

    #[test]
    fn agent_errors_propagate_unmodified() {
        let mut state = SessionState::new();
        state.mark_ready(Box::new(FakeAgent {
            calls: Arc::new(AtomicUsize::new(0)),
            audio_path: None,
            fail: true,
        }));

        let result = app().text_to_speech(&mut state, "hello");
        assert!(matches!(result, Err(AgentError::Execution(_))));
    }

    #[test]
    fn status_transitions_exactly_once() {
        let mut state = SessionState::new();
        assert_eq!(state.status(), INITIALIZING_STATUS);
        assert_eq!(state.status(), INITIALIZING_STATUS);

        state.mark_ready(Box::new(FakeAgent {
            calls: Arc::new(AtomicUsize::new(0)),
            audio_path: None,
            fail: false,
        }));

        for _ in 0..3 {
            assert_eq!(state.status(), READY_STATUS);
        }
        assert!(state.is_ready());
    }

    #[test]
    fn builder_applies_title_defaults() {
        assert_eq!(app().title(), "Elevenlabs Text-to-Speech demo");

        let custom = TtsApp::builder()
            .config_file("unused.json")
            .extractor(OutputExtractor::last_audio_packet("/out"))
            .framework("F5-TTS")
            .agent_factory(unused_factory())
            .build()
            .unwrap();
        assert_eq!(custom.title(), "F5-TTS Text-to-Speech demo");
    }

    #[test]
    fn builder_rejects_missing_required_fields() {
        assert!(TtsApp::builder().build().is_err());
    }
}
