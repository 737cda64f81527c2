//! Configuration loading for the Docent CLI.
//!
//! Settings come from three layers, strongest last:
//! defaults → optional TOML file → environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use docent_agent::{DEFAULT_MODEL, MAX_ITERATIONS};
use docent_corpus::CorpusConfig;

/// Resolved CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocentConfig {
    /// Model identifier.
    pub model: String,
    /// Base URL of the corpus API.
    pub corpus_base_url: String,
    /// Maximum backend steps per turn.
    pub max_iterations: u32,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl Default for DocentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            corpus_base_url: CorpusConfig::default().base_url,
            max_iterations: MAX_ITERATIONS,
            temperature: None,
        }
    }
}

impl DocentConfig {
    /// Load configuration from the given file (or the default location),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).or_else(default_config_path);

        let mut config = match path {
            Some(ref p) if p.exists() => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read config file {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", p.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(model) = std::env::var("DOCENT_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("DOCENT_CORPUS_URL") {
            config.corpus_base_url = url;
        }

        Ok(config)
    }
}

/// Default config file location: `<config dir>/docent/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docent").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DocentConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_iterations, MAX_ITERATIONS);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "model = \"gemini-3-flash\"\ncorpus_base_url = \"http://localhost:3000/api\"\ntemperature = 0.3"
        )
        .unwrap();

        let config = DocentConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "gemini-3-flash");
        assert_eq!(config.corpus_base_url, "http://localhost:3000/api");
        assert_eq!(config.temperature, Some(0.3));
        // Unset fields keep their defaults.
        assert_eq!(config.max_iterations, MAX_ITERATIONS);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocentConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not toml").unwrap();
        assert!(DocentConfig::load(Some(&path)).is_err());
    }
}
