use internmatch_engine::Dataset;

/// A language-model agent that can read the listing table.
///
/// Implementations block until the answer arrives or the request fails.
pub trait Agent {
    fn ask(&self, prompt: &str, dataset: &Dataset) -> Result<String, AskError>;
}

impl<A: Agent + ?Sized> Agent for &A {
    fn ask(&self, prompt: &str, dataset: &Dataset) -> Result<String, AskError> {
        (**self).ask(prompt, dataset)
    }
}

/// Error from an agent request. `Display` is the user-facing cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// Provider disabled or unusable
    NotConfigured(String),
    /// API key missing
    MissingKey,
    /// Network error (connect, timeout, TLS)
    Network(String),
    /// API error response
    Api { status: u16, message: String },
    /// Failed to parse response body
    Parse(String),
    /// Response parsed but carried no answer
    InvalidResponse(String),
}

impl std::fmt::Display for AskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskError::NotConfigured(msg) => write!(f, "AI not configured: {}", msg),
            AskError::MissingKey => write!(f, "API key not configured"),
            AskError::Network(msg) => write!(f, "Network error: {}", msg),
            AskError::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            AskError::Parse(msg) => write!(f, "Failed to parse response: {}", msg),
            AskError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AskError {}
