//! # tts-webapp
//!
//! A small browser front-end for text-to-speech agent pipelines: a text box,
//! a readiness status line, and an audio player, wired to an opaque pipeline
//! behind the [`agent::Agent`] trait.
//!
//! The crate does not synthesize speech itself. It ships one text record into
//! a pipeline built by an injected factory, pulls an audio file path out of
//! the pipeline's output with one of two [`extract::OutputExtractor`]
//! strategies, and serves the result on an embedded HTTP page.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tts-webapp = "0.1"
//! ```
//!
//! ```ignore
//! use std::sync::Arc;
//! use tts_webapp::agent::AgentFactory;
//! use tts_webapp::app::TtsApp;
//! use tts_webapp::extract::OutputExtractor;
//!
//! let factory: AgentFactory = Arc::new(|config| my_framework::build_agent(config));
//!
//! let app = TtsApp::builder()
//!     .config_file("configs/elevenlabs.json")
//!     .extractor(OutputExtractor::generic_key("audio_path"))
//!     .agent_factory(factory)
//!     .build()?;
//!
//! tts_webapp::webapp::serve(app, "127.0.0.1:7860")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agent;
pub mod app;
pub mod extract;
pub mod webapp;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single text record travelling through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPacket {
    /// Unique packet id (UUID v4 string).
    pub id: String,
    /// Name of the component that produced the packet. Empty for user input.
    #[serde(default)]
    pub source: String,
    /// The text payload.
    pub content: String,
}

impl TextPacket {
    /// Create a packet with a fresh id and no source.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: String::new(),
            content: content.into(),
        }
    }
}

/// A chunk of synthesized audio produced by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioPacket {
    /// Unique packet id (UUID v4 string).
    pub id: String,
    /// Name of the synthesis backend that produced the audio.
    pub source: String,
    /// Raw audio samples as f32 values.
    pub content: Vec<f32>,
    /// Sample rate of the audio.
    pub sample_rate: u32,
}

impl AudioPacket {
    /// Create a packet with a fresh id.
    pub fn new(source: impl Into<String>, content: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            content,
            sample_rate,
        }
    }

    /// Write the audio to a 32-bit float mono WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.content {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.content.len() as f64 / self.sample_rate as f64
    }
}

/// The generic wrapper passed to and returned from an agent.
///
/// Holds text and audio packets plus a free-form key-value section where
/// provider-specific components drop their outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataContainer {
    /// Unique container id (UUID v4 string).
    pub container_id: String,
    #[serde(default)]
    pub texts: Vec<TextPacket>,
    #[serde(default)]
    pub audios: Vec<AudioPacket>,
    #[serde(default)]
    pub generic_data: HashMap<String, Value>,
}

impl DataContainer {
    /// Create an empty container with a fresh id.
    pub fn new() -> Self {
        Self {
            container_id: Uuid::new_v4().to_string(),
            texts: Vec::new(),
            audios: Vec::new(),
            generic_data: HashMap::new(),
        }
    }

    /// Wrap one text record into a fresh container, the shape every
    /// conversion request takes.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut container = Self::new();
        container.texts.push(TextPacket::new(text));
        container
    }
}

impl Default for DataContainer {
    fn default() -> Self {
        Self::new()
    }
}
