// AI configuration and secrets management
//
// API keys are looked up in:
// 1. System keychain (preferred)
// 2. INTERNMATCH_<PROVIDER>_KEY environment variable
// 3. OPENAI_API_KEY (OpenAI-compatible providers only)
//
// Keys are NEVER stored in settings.json

use std::env;

use crate::settings::{AIProvider, AISettings};

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "internmatch";

/// Conventional variables honored by OpenAI-compatible tooling
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
const OPENAI_BASE_ENV: &str = "OPENAI_API_BASE";

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key retrieved from system keychain
    Keychain,
    /// Key retrieved from environment variable
    Environment,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Keychain => "keychain",
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: &str) -> String {
    format!("INTERNMATCH_{}_KEY", provider.to_uppercase())
}

/// Get the keychain account name for a provider
fn keychain_account(provider: &str) -> String {
    format!("ai/{}", provider.to_lowercase())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an API key for the specified provider
pub fn get_api_key(provider: &str) -> KeyLookup {
    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider)) {
            if let Ok(key) = entry.get_password() {
                return KeyLookup {
                    key: Some(key),
                    source: KeySource::Keychain,
                };
            }
        }
    }

    let fallback = if provider.eq_ignore_ascii_case("openai") {
        non_empty_env(OPENAI_KEY_ENV)
    } else {
        None
    };

    match non_empty_env(&env_var_name(provider)).or(fallback) {
        Some(key) => KeyLookup {
            key: Some(key),
            source: KeySource::Environment,
        },
        None => KeyLookup {
            key: None,
            source: KeySource::None,
        },
    }
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        keyring::Entry::new(KEYCHAIN_SERVICE, "test").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}

// ============================================================================
// Resolved AI Configuration (single source of truth)
// ============================================================================

/// Status of the AI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AIConfigStatus {
    /// AI is disabled (provider = none)
    Disabled,
    /// Ready to send requests
    Ready,
    /// Provider needs an API key and none was found
    MissingKey,
}

impl AIConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ready => "ready",
            Self::MissingKey => "missing_key",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The effective AI configuration, fully resolved from settings + environment.
#[derive(Debug, Clone)]
pub struct ResolvedAIConfig {
    pub provider: AIProvider,
    /// Effective model (resolved from settings or provider default)
    pub model: String,
    /// API base URL, e.g. `https://openrouter.ai/api/v1`
    pub endpoint: String,
    pub api_key: Option<String>,
    pub key_source: KeySource,
    pub timeout_secs: u64,
    pub max_context_rows: usize,
    pub status: AIConfigStatus,
    /// Human-readable reason if not ready
    pub blocking_reason: Option<String>,
}

impl ResolvedAIConfig {
    /// Resolve the effective AI configuration from settings.
    ///
    /// `OPENAI_API_BASE` overrides the endpoint for OpenAI-compatible providers
    /// when settings leave it unset.
    pub fn from_settings(settings: &AISettings) -> Self {
        let provider = settings.provider;

        if !provider.is_enabled() {
            return Self {
                provider,
                model: String::new(),
                endpoint: String::new(),
                api_key: None,
                key_source: KeySource::None,
                timeout_secs: settings.timeout_secs,
                max_context_rows: settings.max_context_rows,
                status: AIConfigStatus::Disabled,
                blocking_reason: Some("provider=none".to_string()),
            };
        }

        let endpoint = match (&settings.endpoint, provider) {
            (Some(e), _) => e.clone(),
            (None, AIProvider::OpenAI) => non_empty_env(OPENAI_BASE_ENV)
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            (None, _) => provider.default_endpoint().to_string(),
        };

        let (api_key, key_source, status, blocking_reason) = if provider.needs_api_key() {
            let lookup = get_api_key(provider.name());
            match lookup.key {
                Some(key) => (Some(key), lookup.source, AIConfigStatus::Ready, None),
                None => (
                    None,
                    KeySource::None,
                    AIConfigStatus::MissingKey,
                    Some(format!(
                        "No API key found. Set via keychain, {} or {}",
                        env_var_name(provider.name()),
                        OPENAI_KEY_ENV
                    )),
                ),
            }
        } else {
            (None, KeySource::None, AIConfigStatus::Ready, None)
        };

        Self {
            provider,
            model: settings.effective_model().to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            key_source,
            timeout_secs: settings.timeout_secs,
            max_context_rows: settings.max_context_rows,
            status,
            blocking_reason,
        }
    }
}

// ============================================================================
// Diagnostics (for `imatch ai doctor`)
// ============================================================================

/// Diagnostic information about AI configuration
#[derive(Debug)]
pub struct AIDiagnostics {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub status: AIConfigStatus,
    pub key_present: bool,
    pub key_source: KeySource,
    pub keychain_available: bool,
    pub timeout_secs: u64,
    pub max_context_rows: usize,
    pub blocking_reason: Option<String>,
}

impl AIDiagnostics {
    pub fn from_resolved(config: &ResolvedAIConfig) -> Self {
        Self {
            provider: config.provider.name().to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            status: config.status,
            key_present: config.api_key.is_some(),
            key_source: config.key_source,
            keychain_available: keychain_available(),
            timeout_secs: config.timeout_secs,
            max_context_rows: config.max_context_rows,
            blocking_reason: config.blocking_reason.clone(),
        }
    }
}

impl std::fmt::Display for AIDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AI Configuration")?;
        writeln!(f, "──────────────────────────────")?;
        writeln!(f, "Provider:          {}", self.provider)?;
        writeln!(f, "Status:            {}", self.status.as_str())?;
        writeln!(f, "Model:             {}", self.model)?;
        writeln!(f, "Endpoint:          {}", self.endpoint)?;
        writeln!(f, "Key present:       {}", if self.key_present { "yes" } else { "no" })?;
        writeln!(f, "Key source:        {}", self.key_source.as_str())?;
        writeln!(f, "Keychain available:{}", if self.keychain_available { "yes" } else { "no" })?;
        writeln!(f, "Timeout:           {}s", self.timeout_secs)?;
        writeln!(f, "Context rows:      {}", self.max_context_rows)?;
        if let Some(reason) = &self.blocking_reason {
            writeln!(f, "Blocked:           {}", reason)?;
        }
        Ok(())
    }
}
