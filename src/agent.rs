//! The seam to the external pipeline framework.
//!
//! Everything that actually performs text-to-speech lives behind the
//! [`Agent`] trait. The app never constructs an agent itself; it hands a
//! configuration file path to an injected [`AgentFactory`] and uses whatever
//! comes back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DataContainer;

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid agent config: {0}")]
    Config(String),
    #[error("Pipeline execution failed: {0}")]
    Execution(String),
    #[error("Audio write failed: {0}")]
    Audio(#[from] hound::Error),
}

/// An opaque, ready-to-use processing pipeline.
///
/// Implementations consume a request container and return a container
/// enriched with their outputs (audio packets, generic data entries).
pub trait Agent: Send {
    /// The pipeline's name, as declared in its configuration.
    fn name(&self) -> &str;

    /// Run the pipeline over one container.
    fn process(&mut self, container: DataContainer) -> Result<DataContainer, AgentError>;
}

/// Builds an agent from a configuration file path.
///
/// This is the crate's stand-in for the external framework's generic agent
/// builder: the file's format and interpretation belong entirely to the
/// factory, not to this crate.
pub type AgentFactory =
    Arc<dyn Fn(&Path) -> Result<Box<dyn Agent>, AgentError> + Send + Sync>;

/// The portion of a pipeline configuration file this crate understands.
///
/// Factories are free to read the same file with their own richer schema;
/// `attributes` carries anything provider-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl AgentConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AgentError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| AgentError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tts-webapp-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_config_with_attributes() {
        let path = temp_config(
            "ok",
            r#"{"name": "elevenlabs", "attributes": {"voice": "Rachel"}}"#,
        );
        let config = AgentConfig::from_file(&path).unwrap();
        assert_eq!(config.name, "elevenlabs");
        assert_eq!(config.description, None);
        assert_eq!(config.attributes["voice"], "Rachel");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("tts-webapp-no-such-config.json");
        assert!(matches!(
            AgentConfig::from_file(&path),
            Err(AgentError::Io(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let path = temp_config("bad", "{not json");
        assert!(matches!(
            AgentConfig::from_file(&path),
            Err(AgentError::Config(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
