// AI search flow: prompt, one agent call, reconciliation, keyword fallback.

use serde::Serialize;

use internmatch_engine::{fallback_search, reconcile, Dataset, Listing};

use crate::agent::{Agent, AskError};

/// Closing note shown under fallback results.
pub const FEEDBACK_NOTE: &str =
    "We’ll work on your feedback and try to include internships aligned with your preferences soon.";

/// Instruction text sent to the agent for a free-text query.
pub fn build_prompt(query: &str) -> String {
    format!(
        "A student says: \"{query}\".\n\
         Check the dataset for internships that closely match based on domain, skills, and industry.\n\
         If no exact match is found, suggest similar internships and clearly mention:\n\
         \"We’ll work on your feedback and add a more suitable internship soon. Meanwhile, you can consider these related opportunities.\"\n\
         Include internship name and company if possible."
    )
}

/// Result of one AI search. Listings borrow from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AiSearchOutcome<'a> {
    /// The answer names these listings.
    Referenced {
        answer: String,
        listings: Vec<&'a Listing>,
    },
    /// The answer names none; these matched the query keywords.
    Related {
        answer: String,
        listings: Vec<&'a Listing>,
    },
    /// Neither reconciliation nor the keyword fallback found anything.
    NoRelated { answer: String },
}

impl<'a> AiSearchOutcome<'a> {
    pub fn answer(&self) -> &str {
        match self {
            AiSearchOutcome::Referenced { answer, .. }
            | AiSearchOutcome::Related { answer, .. }
            | AiSearchOutcome::NoRelated { answer } => answer,
        }
    }

    pub fn listings(&self) -> &[&'a Listing] {
        match self {
            AiSearchOutcome::Referenced { listings, .. }
            | AiSearchOutcome::Related { listings, .. } => listings,
            AiSearchOutcome::NoRelated { .. } => &[],
        }
    }
}

/// Ask the agent once and resolve its answer to listings.
///
/// Agent failures are returned as-is; nothing is retried and no partial
/// outcome is produced.
pub fn ai_search<'a, A: Agent + ?Sized>(
    agent: &A,
    query: &str,
    dataset: &'a Dataset,
    max_related: usize,
) -> Result<AiSearchOutcome<'a>, AskError> {
    let prompt = build_prompt(query);
    let answer = agent.ask(&prompt, dataset)?;

    let referenced = reconcile(&answer, dataset);
    if !referenced.is_empty() {
        log::debug!("answer references {} listing(s)", referenced.len());
        return Ok(AiSearchOutcome::Referenced {
            answer,
            listings: referenced,
        });
    }

    let related = fallback_search(query, dataset, max_related);
    log::info!(
        "no listing referenced in answer; keyword fallback found {}",
        related.len()
    );
    if related.is_empty() {
        Ok(AiSearchOutcome::NoRelated { answer })
    } else {
        Ok(AiSearchOutcome::Related {
            answer,
            listings: related,
        })
    }
}
