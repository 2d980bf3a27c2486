use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key; the GEMINI_API_KEY environment variable takes
    /// precedence when set
    #[serde(default = "String::new")]
    pub api_key: String,

    /// API base URL (empty means the public endpoint)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Topic analysis config
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Transcription config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Topic analysis settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Model name for topic analysis
    #[serde(default = "default_analysis_model")]
    pub model: String,

    /// Show name woven into generated titles and fallbacks
    #[serde(default = "default_show_name")]
    pub show_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: default_analysis_model(),
            show_name: default_show_name(),
        }
    }
}

/// Transcription settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Model name for transcription
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Output token cap for the SRT generation request
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Maximum number of file-state checks before giving up
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Fixed interval between file-state checks, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Whisper model for the local backend
    #[serde(default = "default_local_model")]
    pub local_model: String,

    /// Spoken language for the local backend
    #[serde(default = "default_local_language")]
    pub local_language: String,

    /// Directory generated SRT files are written to; falls back to the
    /// audio file's directory when it does not exist
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            max_output_tokens: default_max_output_tokens(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
            local_model: default_local_model(),
            local_language: default_local_language(),
            output_dir: None,
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_analysis_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_show_name() -> String {
    "沖縄ラジオスター".to_string()
}

fn default_transcription_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_max_output_tokens() -> u32 {
    131_072
}

fn default_poll_max_attempts() -> u32 {
    60
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_local_model() -> String {
    "large-v3".to_string()
}

fn default_local_language() -> String {
    "ja".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to open config file {}: {}", path.as_ref().display(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.as_ref().display(), e))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.as_ref().display(), e))?;
        Ok(())
    }

    /// The effective API key: environment variable first, config file second
    pub fn effective_api_key(&self) -> String {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.is_empty() {
            Url::parse(&self.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;
        }

        if self.analysis.model.is_empty() {
            return Err(anyhow!("Analysis model must not be empty"));
        }
        if self.transcription.model.is_empty() {
            return Err(anyhow!("Transcription model must not be empty"));
        }
        if self.transcription.poll_max_attempts == 0 {
            return Err(anyhow!("poll_max_attempts must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            endpoint: String::new(),
            analysis: AnalysisConfig::default(),
            transcription: TranscriptionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
