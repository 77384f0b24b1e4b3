//! `internmatch-engine`: internship dataset model and matching logic.
//!
//! Pure engine crate: receives a pre-loaded [`Dataset`], returns borrowed
//! result sets. No CLI, IO or network dependencies.

pub mod filter;
pub mod listing;
pub mod search;

pub use filter::{filter, Category, Selection};
pub use listing::{Dataset, Field, Listing};
pub use search::{fallback_search, reconcile, tokenize_query, DEFAULT_MAX_RELATED};
