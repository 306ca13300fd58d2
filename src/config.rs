//! Configuration resolution for speech-coach
//!
//! Settings resolve with ENV → TOML → default priority. The TOML file is
//! optional (`speech-coach.toml` in the working directory, or the path in
//! `SPEECH_COACH_CONFIG`); every key can be overridden through the
//! environment so deployments never need the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::AiProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting {key}: {message}")]
    Invalid { key: String, message: String },
}

/// On-disk configuration (all keys optional)
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    host: Option<String>,
    port: Option<u16>,
    default_ai_provider: Option<String>,
    upload_dir: Option<PathBuf>,
    stt_endpoint: Option<String>,
    max_audio_duration_seconds: Option<u32>,
    gemini_api_key: Option<String>,
    gemini_model: Option<String>,
    openai_api_key: Option<String>,
    openai_model: Option<String>,
    anthropic_api_key: Option<String>,
    anthropic_model: Option<String>,
}

/// Resolved application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub default_ai_provider: AiProvider,
    pub upload_dir: PathBuf,
    /// Speech-to-text service endpoint the transcriber POSTs WAV audio to
    pub stt_endpoint: String,
    pub max_audio_duration_seconds: u32,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            default_ai_provider: AiProvider::Gemini,
            upload_dir: PathBuf::from("uploads"),
            stt_endpoint: "http://127.0.0.1:9000/transcribe".to_string(),
            max_audio_duration_seconds: 600,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash-lite".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4-turbo-preview".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-opus-20240229".to_string(),
        }
    }
}

impl Settings {
    /// Load settings with ENV → TOML → default priority
    pub fn load() -> Result<Self, ConfigError> {
        let toml_path = std::env::var("SPEECH_COACH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("speech-coach.toml"));

        let file = if toml_path.exists() {
            info!("Loading config file: {}", toml_path.display());
            Self::read_toml(&toml_path)?
        } else {
            TomlConfig::default()
        };

        let mut settings = Settings::default();

        if let Some(host) = env_or("SPEECH_COACH_HOST", file.host) {
            settings.host = host;
        }
        if let Some(port) = env_or("SPEECH_COACH_PORT", file.port.map(|p| p.to_string())) {
            settings.port = port.parse().map_err(|_| ConfigError::Invalid {
                key: "port".to_string(),
                message: format!("not a valid port number: {}", port),
            })?;
        }
        if let Some(provider) = env_or("SPEECH_COACH_AI_PROVIDER", file.default_ai_provider) {
            settings.default_ai_provider =
                AiProvider::parse(&provider).ok_or_else(|| ConfigError::Invalid {
                    key: "default_ai_provider".to_string(),
                    message: format!(
                        "unknown provider '{}' (expected gemini, openai, or anthropic)",
                        provider
                    ),
                })?;
        }
        if let Some(dir) = env_or(
            "SPEECH_COACH_UPLOAD_DIR",
            file.upload_dir.map(|p| p.display().to_string()),
        ) {
            settings.upload_dir = PathBuf::from(dir);
        }
        if let Some(url) = env_or("SPEECH_COACH_STT_ENDPOINT", file.stt_endpoint) {
            settings.stt_endpoint = url;
        }
        if let Some(max) = env_or(
            "SPEECH_COACH_MAX_AUDIO_SECONDS",
            file.max_audio_duration_seconds.map(|v| v.to_string()),
        ) {
            settings.max_audio_duration_seconds =
                max.parse().map_err(|_| ConfigError::Invalid {
                    key: "max_audio_duration_seconds".to_string(),
                    message: format!("not a valid duration: {}", max),
                })?;
        }

        settings.gemini_api_key = env_or("GEMINI_API_KEY", file.gemini_api_key);
        if let Some(model) = env_or("SPEECH_COACH_GEMINI_MODEL", file.gemini_model) {
            settings.gemini_model = model;
        }
        settings.openai_api_key = env_or("OPENAI_API_KEY", file.openai_api_key);
        if let Some(model) = env_or("SPEECH_COACH_OPENAI_MODEL", file.openai_model) {
            settings.openai_model = model;
        }
        settings.anthropic_api_key = env_or("ANTHROPIC_API_KEY", file.anthropic_api_key);
        if let Some(model) = env_or("SPEECH_COACH_ANTHROPIC_MODEL", file.anthropic_model) {
            settings.anthropic_model = model;
        }

        if settings.gemini_api_key.is_none()
            && settings.openai_api_key.is_none()
            && settings.anthropic_api_key.is_none()
        {
            warn!("No AI provider API key configured; analysis requests will be rejected");
        }

        Ok(settings)
    }

    fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// API key for the given provider, if configured
    pub fn api_key_for(&self, provider: AiProvider) -> Option<&str> {
        match provider {
            AiProvider::Gemini => self.gemini_api_key.as_deref(),
            AiProvider::OpenAi => self.openai_api_key.as_deref(),
            AiProvider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }

    /// Model name for the given provider
    pub fn model_for(&self, provider: AiProvider) -> &str {
        match provider {
            AiProvider::Gemini => &self.gemini_model,
            AiProvider::OpenAi => &self.openai_model,
            AiProvider::Anthropic => &self.anthropic_model,
        }
    }
}

/// ENV value if set and non-empty, otherwise the TOML value
fn env_or(var: &str, fallback: Option<String>) -> Option<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.default_ai_provider, AiProvider::Gemini);
        assert_eq!(settings.upload_dir, PathBuf::from("uploads"));
        assert!(settings.gemini_api_key.is_none());
    }

    #[test]
    fn toml_parses_partial_config() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            port = 9100
            default_ai_provider = "openai"
            openai_api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.port, Some(9100));
        assert_eq!(parsed.default_ai_provider.as_deref(), Some("openai"));
        assert_eq!(parsed.openai_api_key.as_deref(), Some("sk-test"));
        assert!(parsed.host.is_none());
    }

    #[test]
    fn api_key_lookup_per_provider() {
        let settings = Settings {
            anthropic_api_key: Some("key-a".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.api_key_for(AiProvider::Anthropic), Some("key-a"));
        assert_eq!(settings.api_key_for(AiProvider::Gemini), None);
    }
}
