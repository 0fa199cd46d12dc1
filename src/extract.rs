//! Strategies for pulling an audio file path out of a pipeline result.

use std::path::PathBuf;

use serde_json::Value;

use crate::DataContainer;

/// How the audio path is located in the agent's output container.
///
/// Selected once at app construction; both variants are pure lookups with
/// no side effects. Absence of a path is reported as `None` and turned into
/// a user-facing error by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputExtractor {
    /// Take the last audio packet and derive the path from its identifiers:
    /// `{base_dir}/{source}-{id up to the first '-'}.wav`.
    LastAudioPacket { base_dir: PathBuf },
    /// Look the path up in the container's generic data under a fixed key.
    /// A non-empty list yields its first element.
    GenericKey { key: String },
}

impl OutputExtractor {
    pub fn last_audio_packet(base_dir: impl Into<PathBuf>) -> Self {
        Self::LastAudioPacket {
            base_dir: base_dir.into(),
        }
    }

    pub fn generic_key(key: impl Into<String>) -> Self {
        Self::GenericKey { key: key.into() }
    }

    /// Extract the audio file path from `container`, if any.
    pub fn audio_path(&self, container: &DataContainer) -> Option<String> {
        match self {
            Self::LastAudioPacket { base_dir } => {
                let audio = container.audios.last()?;
                let stem = audio.id.split('-').next().unwrap_or(&audio.id);
                Some(format!(
                    "{}/{}-{}.wav",
                    base_dir.display(),
                    audio.source,
                    stem
                ))
            }
            Self::GenericKey { key } => match container.generic_data.get(key)? {
                Value::Array(items) => items.first()?.as_str().map(str::to_string),
                Value::String(path) => Some(path.clone()),
                _ => None,
            },
        }
    }
}
