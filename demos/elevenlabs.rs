//! Generic-key demo: the pipeline reports the generated file's path through
//! the container's generic data under `"audio_path"`, the way hosted TTS
//! provider wrappers usually do.
//!
//! The agent here is a stand-in tone generator so the page works end to end
//! without any model downloads or API keys.
//!
//! ```bash
//! RUST_LOG=info cargo run --example elevenlabs
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tts_webapp::agent::{Agent, AgentConfig, AgentError, AgentFactory};
use tts_webapp::app::TtsApp;
use tts_webapp::extract::OutputExtractor;
use tts_webapp::{AudioPacket, DataContainer};

const SAMPLE_RATE: u32 = 24000;

/// Stand-in pipeline: synthesizes a tone instead of speech and drops the
/// written file's path into the generic data section.
struct ToneAgent {
    name: String,
    out_dir: PathBuf,
}

impl Agent for ToneAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, mut container: DataContainer) -> Result<DataContainer, AgentError> {
        let text = container
            .texts
            .first()
            .map(|t| t.content.as_str())
            .unwrap_or_default();

        let packet = AudioPacket::new(self.name.clone(), tone_for(text), SAMPLE_RATE);
        let path = self.out_dir.join(format!("{}.wav", packet.id));
        packet.write_wav(&path)?;
        log::info!(
            "wrote {:.2}s of audio to {}",
            packet.duration_secs(),
            path.display()
        );

        container
            .generic_data
            .insert("audio_path".to_string(), json!([path.to_string_lossy()]));
        container.audios.push(packet);
        Ok(container)
    }
}

/// A tone whose length follows the submission, so different inputs are
/// audibly different.
fn tone_for(text: &str) -> Vec<f32> {
    let secs = (text.chars().count() as f32 * 0.06).clamp(0.5, 6.0);
    let samples = (secs * SAMPLE_RATE as f32) as usize;
    (0..samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            0.2 * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let out_dir = std::env::temp_dir().join("tts-webapp-demo");
    std::fs::create_dir_all(&out_dir)?;

    let factory_dir = out_dir.clone();
    let factory: AgentFactory = Arc::new(
        move |config: &Path| -> Result<Box<dyn Agent>, AgentError> {
            let config = AgentConfig::from_file(config)?;
            Ok(Box::new(ToneAgent {
                name: config.name,
                out_dir: factory_dir.clone(),
            }))
        },
    );

    let app = TtsApp::builder()
        .config_file("demos/configs/elevenlabs.json")
        .extractor(OutputExtractor::generic_key("audio_path"))
        .agent_factory(factory)
        .build()?;

    tts_webapp::webapp::serve(app, "127.0.0.1:7860")?;
    Ok(())
}
