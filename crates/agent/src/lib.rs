//! AI query bridge, shared between the CLI and tests.
//!
//! The language model is an injected [`Agent`]: given a prompt and the
//! table, it returns prose. [`ai_search`] turns that prose into concrete
//! listings (reconciliation, then keyword fallback).
//!
//! No retries. One request per search; any failure abandons the search.

mod agent;
mod client;
mod context;
mod search;

pub use agent::{Agent, AskError};
pub use client::OpenAiAgent;
pub use context::{ContextWarning, TableContext};
pub use search::{ai_search, build_prompt, AiSearchOutcome, FEEDBACK_NOTE};
