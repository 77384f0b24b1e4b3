//! `imatch options` and `imatch match`: the preference form.

use serde::Serialize;

use internmatch_engine::{filter, Category, Listing, Selection};
use internmatch_io::{ResponseLog, SubmissionRecord};

use crate::exit_codes::log_exit_code;
use crate::{print_json, AppContext, CliError};

pub fn selection_from_args(
    domain: Vec<String>,
    role: Vec<String>,
    level: Vec<String>,
    industry: Vec<String>,
) -> Selection {
    let mut selection = Selection::new();
    for (category, values) in [
        (Category::Domain, domain),
        (Category::JobRole, role),
        (Category::Level, level),
        (Category::Industry, industry),
    ] {
        for value in values {
            selection.insert(category, value);
        }
    }
    selection
}

// ============================================================================
// options
// ============================================================================

#[derive(Serialize)]
struct OptionsOutput<'a> {
    domain: &'a [String],
    job_role: &'a [String],
    level: &'a [String],
    industry: &'a [String],
}

pub fn cmd_options(ctx: &AppContext, json: bool) -> Result<(), CliError> {
    let dataset = ctx.load_dataset()?;

    if json {
        return print_json(&OptionsOutput {
            domain: dataset.distinct(Category::Domain),
            job_role: dataset.distinct(Category::JobRole),
            level: dataset.distinct(Category::Level),
            industry: dataset.distinct(Category::Industry),
        });
    }

    for category in Category::ALL {
        let flag = match category {
            Category::Domain => "--domain",
            Category::JobRole => "--role",
            Category::Level => "--level",
            Category::Industry => "--industry",
        };
        println!("{} ({})", category.label(), flag);
        let values = dataset.distinct(category);
        if values.is_empty() {
            println!("  (none)");
        }
        for value in values {
            println!("  {}", value);
        }
        println!();
    }
    Ok(())
}

// ============================================================================
// match
// ============================================================================

#[derive(Serialize)]
struct MatchOutput<'a> {
    recorded: bool,
    empty_categories: Vec<Category>,
    count: usize,
    listings: Vec<&'a Listing>,
}

pub fn cmd_match(
    ctx: &AppContext,
    name: &str,
    contact: &str,
    selection: Selection,
    json: bool,
    no_log: bool,
) -> Result<(), CliError> {
    let name = name.trim();
    let contact = contact.trim();
    if name.is_empty() || contact.is_empty() {
        return Err(CliError::validation("Please fill in your name and contact info.")
            .with_hint("pass both --name and --contact"));
    }

    let dataset = ctx.load_dataset()?;

    let recorded = if no_log {
        false
    } else {
        let log = ResponseLog::new(ctx.responses_path.clone());
        log.append(&SubmissionRecord::now(name, contact, &selection))
            .map_err(|e| CliError {
                code: log_exit_code(&e),
                message: e.to_string(),
                hint: Some("pass --responses <PATH> or set INTERNMATCH_RESPONSES".to_string()),
            })?;
        true
    };

    let empty = selection.empty_categories();
    if !empty.is_empty() {
        let names: Vec<&str> = empty.iter().map(Category::label).collect();
        eprintln!(
            "warning: no {} selected; a category left empty matches nothing",
            names.join(", ")
        );
    }

    let matches = filter(&dataset, &selection);

    if json {
        return print_json(&MatchOutput {
            recorded,
            empty_categories: empty,
            count: matches.len(),
            listings: matches,
        });
    }

    if matches.is_empty() {
        println!("No exact matches found. Try broader criteria.");
        return Ok(());
    }

    println!("Found {} matching internships.", matches.len());
    for listing in &matches {
        println!();
        print!("{}", render_listing(listing));
    }
    Ok(())
}

/// Full detail block for one listing.
pub fn render_listing(listing: &Listing) -> String {
    let show = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    let mut out = String::new();
    out.push_str(&format!("{}\n", listing.title()));
    out.push_str(&format!("  Job Role: {}\n", show(&listing.job_role)));
    out.push_str(&format!("  Domain:   {}\n", show(&listing.domain)));
    out.push_str(&format!("  Industry: {}\n", show(&listing.industry)));
    out.push_str(&format!("  Level:    {}\n", show(&listing.level)));
    out.push_str(&format!("  Summary:  {}\n", show(&listing.summary)));
    out.push_str(&format!("  Skills:   {}\n", show(&listing.skills)));
    if let Some(site) = &listing.website {
        out.push_str(&format!("  Website:  {}\n", site));
    }
    out
}
