//! `imatch ask` and `imatch ai doctor`.

use serde::Serialize;

use internmatch_agent::{ai_search, AiSearchOutcome, AskError, OpenAiAgent, FEEDBACK_NOTE};
use internmatch_config::ai::{AIDiagnostics, ResolvedAIConfig};
use internmatch_config::{AIConfigStatus, Settings};
use internmatch_engine::Listing;

use crate::exit_codes::{ask_exit_code, EXIT_AI_DISABLED, EXIT_AI_MISSING_KEY};
use crate::{print_json, AppContext, CliError};

// ============================================================================
// ask
// ============================================================================

pub fn cmd_ask(
    ctx: &AppContext,
    query: &str,
    max_related: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    if query.trim().is_empty() {
        return Err(CliError::validation("Please enter your query."));
    }

    let config = ResolvedAIConfig::from_settings(&ctx.settings.ai);
    let agent = OpenAiAgent::from_config(&config).map_err(|e| ai_error(&e, &config))?;

    let dataset = ctx.load_dataset()?;
    let max_related = max_related.unwrap_or(ctx.settings.max_related);

    if !json {
        eprintln!("Searching using AI...");
    }
    let outcome = ai_search(&agent, query, &dataset, max_related)
        .map_err(|e| ai_error(&e, &config))?;

    let context = ContextSummary::new(dataset.len(), config.max_context_rows);
    if json {
        return print_json(&AskOutput {
            outcome: &outcome,
            context,
        });
    }
    if let Some(note) = context.note() {
        eprintln!("{}", note);
    }

    println!("AI Response:");
    println!("{}", outcome.answer());
    println!();

    match &outcome {
        AiSearchOutcome::Referenced { listings, .. } => {
            for listing in listings {
                println!("View: {}", link_line(listing));
            }
        }
        AiSearchOutcome::Related { listings, .. } => {
            println!("We couldn’t find an exact match, but here are some related internships:");
            for listing in listings {
                println!();
                print!("{}", render_related(listing));
            }
            println!();
            println!("---");
            println!("{}", FEEDBACK_NOTE);
        }
        AiSearchOutcome::NoRelated { .. } => {
            println!("We couldn’t find an exact match, but here are some related internships:");
            println!("No related internships found in our current dataset.");
        }
    }
    Ok(())
}

/// How much of the listing table went into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct ContextSummary {
    sent_rows: usize,
    total_rows: usize,
    truncated: bool,
}

impl ContextSummary {
    fn new(total_rows: usize, max_rows: usize) -> Self {
        let sent_rows = total_rows.min(max_rows);
        Self {
            sent_rows,
            total_rows,
            truncated: sent_rows < total_rows,
        }
    }

    fn note(&self) -> Option<String> {
        self.truncated.then(|| {
            format!(
                "note: the AI saw only the first {} of {} listings (ai.max_context_rows)",
                self.sent_rows, self.total_rows
            )
        })
    }
}

#[derive(Serialize)]
struct AskOutput<'a> {
    #[serde(flatten)]
    outcome: &'a AiSearchOutcome<'a>,
    context: ContextSummary,
}

fn ai_error(err: &AskError, config: &ResolvedAIConfig) -> CliError {
    let code = ask_exit_code(err);
    let hint = match err {
        AskError::NotConfigured(_) => Some(format!(
            "set \"ai\": {{ \"provider\": \"openai\" }} in {}",
            Settings::config_path_display()
        )),
        AskError::MissingKey => config.blocking_reason.clone(),
        AskError::Network(_) => Some(format!("check connectivity to {}", config.endpoint)),
        _ => None,
    };
    CliError {
        code,
        message: format!("Error using AI: {}", err),
        hint,
    }
}

fn link_line(listing: &Listing) -> String {
    match &listing.website {
        Some(site) => format!("{} ({})", listing.title(), site),
        None => listing.title(),
    }
}

fn render_related(listing: &Listing) -> String {
    let show = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    format!(
        "Related: {}\n  Skills:   {}\n  Domain:   {}\n  Industry: {}\n",
        link_line(listing),
        show(&listing.skills),
        show(&listing.domain),
        show(&listing.industry)
    )
}

// ============================================================================
// ai doctor
// ============================================================================

#[derive(Serialize)]
struct DoctorOutput<'a> {
    schema_version: u32,
    status: &'a str,
    blocking_reason: Option<&'a str>,
    provider: &'a str,
    model: &'a str,
    endpoint: &'a str,
    key: &'a str,
    key_source: &'a str,
    keychain: &'a str,
    timeout_secs: u64,
    max_context_rows: usize,
    settings_path: String,
}

pub fn cmd_ai_doctor(ctx: &AppContext, json: bool) -> Result<(), CliError> {
    let config = ResolvedAIConfig::from_settings(&ctx.settings.ai);
    let diag = AIDiagnostics::from_resolved(&config);

    if json {
        print_json(&DoctorOutput {
            schema_version: 1,
            status: diag.status.as_str(),
            blocking_reason: diag.blocking_reason.as_deref(),
            provider: &diag.provider,
            model: &diag.model,
            endpoint: &diag.endpoint,
            key: if diag.key_present { "present" } else { "missing" },
            key_source: diag.key_source.as_str(),
            keychain: if diag.keychain_available { "ok" } else { "unavailable" },
            timeout_secs: diag.timeout_secs,
            max_context_rows: diag.max_context_rows,
            settings_path: Settings::config_path_display(),
        })?;
    } else {
        print!("{}", diag);
        println!("Settings:          {}", Settings::config_path_display());
    }

    match diag.status {
        AIConfigStatus::Ready => Ok(()),
        AIConfigStatus::Disabled => Err(CliError {
            code: EXIT_AI_DISABLED,
            message: "AI is disabled".to_string(),
            hint: Some(format!(
                "set ai.provider in {}",
                Settings::config_path_display()
            )),
        }),
        AIConfigStatus::MissingKey => Err(CliError {
            code: EXIT_AI_MISSING_KEY,
            message: "AI misconfigured: missing API key".to_string(),
            hint: diag.blocking_reason.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_line() {
        let mut listing = Listing {
            name: Some("Data Intern".into()),
            company: Some("Acme".into()),
            ..Default::default()
        };
        assert_eq!(link_line(&listing), "Data Intern at Acme");
        listing.website = Some("https://acme.example".into());
        assert_eq!(link_line(&listing), "Data Intern at Acme (https://acme.example)");
    }

    #[test]
    fn test_context_summary() {
        let full = ContextSummary::new(3, 500);
        assert_eq!(
            full,
            ContextSummary { sent_rows: 3, total_rows: 3, truncated: false }
        );
        assert_eq!(full.note(), None);

        let capped = ContextSummary::new(750, 500);
        assert!(capped.truncated);
        assert_eq!(capped.sent_rows, 500);
        assert_eq!(
            capped.note().as_deref(),
            Some("note: the AI saw only the first 500 of 750 listings (ai.max_context_rows)")
        );
    }

    #[test]
    fn test_ask_output_json_shape() {
        let listing = Listing {
            name: Some("Data Intern".into()),
            company: Some("Acme".into()),
            ..Default::default()
        };
        let outcome = AiSearchOutcome::Referenced {
            answer: "Data Intern at Acme".into(),
            listings: vec![&listing],
        };
        let v = serde_json::to_value(AskOutput {
            outcome: &outcome,
            context: ContextSummary::new(2, 1),
        })
        .unwrap();
        assert_eq!(v["outcome"], "referenced");
        assert_eq!(v["listings"][0]["company"], "Acme");
        assert_eq!(v["context"]["sent_rows"], 1);
        assert_eq!(v["context"]["total_rows"], 2);
        assert_eq!(v["context"]["truncated"], true);
    }

    #[test]
    fn test_ai_error_message() {
        let config = ResolvedAIConfig::from_settings(&internmatch_config::AISettings {
            provider: internmatch_config::AIProvider::None,
            ..Default::default()
        });
        let err = ai_error(
            &AskError::Api { status: 401, message: "bad key".into() },
            &config,
        );
        assert_eq!(err.code, crate::exit_codes::EXIT_AI_AGENT);
        assert_eq!(err.message, "Error using AI: API error (401): bad key");
    }
}
