//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (including "no matches")         |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | data             | Dataset, response log, form input        |
//! | 10-19   | ai               | AI provider/keychain/agent codes         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code on its own.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Data (3-9)
// =============================================================================

/// Dataset or response log could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Dataset is not valid CSV or lacks a mapped column.
pub const EXIT_DATA_FORMAT: u8 = 5;

/// Form input rejected (blank name/contact, blank query). Nothing recorded.
pub const EXIT_VALIDATION: u8 = 6;

// =============================================================================
// AI (10-19)
// =============================================================================

/// AI disabled (provider=none).
pub const EXIT_AI_DISABLED: u8 = 10;

/// AI provider configured but API key missing.
pub const EXIT_AI_MISSING_KEY: u8 = 11;

/// Agent request failed (network, API error, unusable answer).
pub const EXIT_AI_AGENT: u8 = 13;

// =============================================================================
// Error mapping
// =============================================================================

use internmatch_agent::AskError;
use internmatch_io::{LoadError, LogError};

pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::Io { .. } => EXIT_IO,
        LoadError::MissingColumn { .. } | LoadError::Csv(_) => EXIT_DATA_FORMAT,
    }
}

pub fn log_exit_code(_err: &LogError) -> u8 {
    EXIT_IO
}

pub fn ask_exit_code(err: &AskError) -> u8 {
    match err {
        AskError::NotConfigured(_) => EXIT_AI_DISABLED,
        AskError::MissingKey => EXIT_AI_MISSING_KEY,
        AskError::Network(_)
        | AskError::Api { .. }
        | AskError::Parse(_)
        | AskError::InvalidResponse(_) => EXIT_AI_AGENT,
    }
}
