//! Audio-packet demo: the pipeline appends an audio packet to the container
//! and the shell derives the file path from the packet's identifiers, the
//! way locally-hosted synthesis pipelines report their output.
//!
//! The agent here is a stand-in tone generator; it writes its WAV exactly
//! where the identifier-derived path points.
//!
//! ```bash
//! RUST_LOG=info cargo run --example audio_from_packet
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tts_webapp::agent::{Agent, AgentConfig, AgentError, AgentFactory};
use tts_webapp::app::TtsApp;
use tts_webapp::extract::OutputExtractor;
use tts_webapp::{AudioPacket, DataContainer};

const SAMPLE_RATE: u32 = 24000;

/// Stand-in pipeline: synthesizes a tone instead of speech. The output file
/// lands at `{out_dir}/{source}-{id prefix}.wav`, the location the shell
/// reconstructs from the packet.
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
        let stem = packet.id.split('-').next().unwrap_or(&packet.id);
        let path = self.out_dir.join(format!("{}-{}.wav", packet.source, stem));
        packet.write_wav(&path)?;
        log::info!(
            "wrote {:.2}s of audio to {}",
            packet.duration_secs(),
            path.display()
        );

        container.audios.push(packet);
        Ok(container)
    }
}

/// A tone whose length and pitch follow the submission.
fn tone_for(text: &str) -> Vec<f32> {
    let secs = (text.chars().count() as f32 * 0.06).clamp(0.5, 6.0);
    let freq = 180.0 + (text.len() % 7) as f32 * 20.0;
    let samples = (secs * SAMPLE_RATE as f32) as usize;
    (0..samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            0.2 * (2.0 * std::f32::consts::PI * freq * t).sin()
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
        .config_file("demos/configs/f5tts.json")
        .extractor(OutputExtractor::last_audio_packet(out_dir))
        .framework("F5-TTS")
        .agent_factory(factory)
        .build()?;

    tts_webapp::webapp::serve(app, "127.0.0.1:7860")?;
    Ok(())
}
