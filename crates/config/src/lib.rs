// Configuration loading: settings file, AI provider resolution, API keys

pub mod ai;
pub mod settings;

pub use ai::{AIConfigStatus, ResolvedAIConfig};
pub use settings::{AIProvider, AISettings, Settings};
