// Application settings
// Loaded from ~/.config/internmatch/settings.json (or $INTERNMATCH_CONFIG)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use internmatch_io::ColumnMapping;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV: &str = "INTERNMATCH_CONFIG";

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIProvider {
    /// AI search disabled
    None,
    /// Any OpenAI-compatible endpoint (OpenAI, OpenRouter, ...)
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    /// Local model via Ollama's OpenAI-compatible API
    Local,
}

impl AIProvider {
    /// Returns true if AI features are enabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AIProvider::None)
    }

    /// Local models need no key
    pub fn needs_api_key(&self) -> bool {
        matches!(self, AIProvider::OpenAI)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AIProvider::None => "none",
            AIProvider::OpenAI => "openai",
            AIProvider::Local => "local",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::OpenAI => "mistralai/mistral-7b-instruct",
            AIProvider::Local => "llama3:8b",
        }
    }

    /// Base URL (without `/chat/completions`)
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::OpenAI => "https://api.openai.com/v1",
            AIProvider::Local => "http://localhost:11434/v1",
        }
    }
}

/// AI-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    /// Selected AI provider
    pub provider: AIProvider,

    /// Model identifier (empty = provider default)
    pub model: String,

    /// API base URL override
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Cap on table rows sent with each question
    pub max_context_rows: usize,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            provider: AIProvider::default(),
            model: String::new(),
            endpoint: None,
            timeout_secs: 60,
            max_context_rows: 500,
        }
    }
}

impl AISettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Get the effective endpoint (user-specified or provider default)
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data files
    #[serde(rename = "data.listings")]
    pub listings_path: PathBuf,

    #[serde(rename = "data.responses")]
    pub responses_path: PathBuf,

    // Search
    #[serde(rename = "search.maxRelated")]
    pub max_related: usize,

    // Dataset header names
    #[serde(rename = "columns")]
    pub columns: ColumnMapping,

    // AI
    #[serde(rename = "ai")]
    pub ai: AISettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listings_path: PathBuf::from("internships with websites.csv"),
            responses_path: PathBuf::from("student_responses.csv"),
            max_related: internmatch_engine::DEFAULT_MAX_RELATED,
            columns: ColumnMapping::default(),
            ai: AISettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("internmatch")
            .join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. Missing file or parse errors yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                log::debug!("no settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::parse(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are treated as comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
