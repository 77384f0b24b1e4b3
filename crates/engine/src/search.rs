//! Answer reconciliation and keyword fallback search.
//!
//! Both operations are substring heuristics, not token-boundary matches:
//! "ai" is found inside "maintain". That is the observable contract and is
//! kept as-is.

use crate::listing::{Dataset, Listing};

/// Default cap on fallback search results.
pub const DEFAULT_MAX_RELATED: usize = 5;

/// Listings whose name AND company both appear (case-insensitively) in `answer`.
///
/// Name and company are trimmed before comparison. A listing with a missing
/// name or company is never referenced: an empty needle would match any
/// answer.
pub fn reconcile<'a>(answer: &str, dataset: &'a Dataset) -> Vec<&'a Listing> {
    let haystack = answer.to_lowercase();

    dataset
        .listings()
        .iter()
        .filter(|listing| {
            let (Some(name), Some(company)) = (
                normalized_needle(listing.name.as_deref()),
                normalized_needle(listing.company.as_deref()),
            ) else {
                return false;
            };
            haystack.contains(&name) && haystack.contains(&company)
        })
        .collect()
}

/// First `max_results` listings (table order) where any query token is a
/// substring of the lowercased domain or skills.
pub fn fallback_search<'a>(
    query: &str,
    dataset: &'a Dataset,
    max_results: usize,
) -> Vec<&'a Listing> {
    let tokens = tokenize_query(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    dataset
        .listings()
        .iter()
        .filter(|listing| {
            let domain = listing.domain.as_deref().unwrap_or("").to_lowercase();
            let skills = listing.skills.as_deref().unwrap_or("").to_lowercase();
            tokens
                .iter()
                .any(|t| domain.contains(t.as_str()) || skills.contains(t.as_str()))
        })
        .take(max_results)
        .collect()
}

/// Whitespace-split, lowercased query terms.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn normalized_needle(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
