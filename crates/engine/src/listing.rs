//! Listing rows and the immutable dataset that owns them.
//!
//! Key invariants:
//! - Missing or blank cells are stored as `None`, never as `""`
//! - Row order is the source table order and never changes after build
//! - Distinct-value indexes are derived at construction and read-only afterward

use serde::Serialize;

use crate::filter::Category;

// =============================================================================
// Listing
// =============================================================================

/// One internship row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Identifying internship name.
    pub name: Option<String>,
    /// Organization offering the internship.
    pub company: Option<String>,
    pub domain: Option<String>,
    pub job_role: Option<String>,
    pub level: Option<String>,
    pub industry: Option<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Free-form skills text (usually comma separated).
    pub skills: Option<String>,
    /// Destination link.
    pub website: Option<String>,
}

/// Addressable listing field, used by column mappings and table rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Company,
    Domain,
    JobRole,
    Level,
    Industry,
    Summary,
    Skills,
    Website,
}

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Company,
        Field::Domain,
        Field::JobRole,
        Field::Level,
        Field::Industry,
        Field::Summary,
        Field::Skills,
        Field::Website,
    ];

    /// Short human label (used as table header in AI context).
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Internship",
            Field::Company => "Company",
            Field::Domain => "Domain",
            Field::JobRole => "Job Role",
            Field::Level => "Level",
            Field::Industry => "Industry",
            Field::Summary => "Summary",
            Field::Skills => "Skills",
            Field::Website => "Website",
        }
    }
}

impl Listing {
    /// Get a field value, `None` when missing.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Name => &self.name,
            Field::Company => &self.company,
            Field::Domain => &self.domain,
            Field::JobRole => &self.job_role,
            Field::Level => &self.level,
            Field::Industry => &self.industry,
            Field::Summary => &self.summary,
            Field::Skills => &self.skills,
            Field::Website => &self.website,
        };
        value.as_deref()
    }

    /// Set a field from a raw cell. Blank cells (after trim) become `None`.
    pub fn set(&mut self, field: Field, raw: &str) {
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Company => &mut self.company,
            Field::Domain => &mut self.domain,
            Field::JobRole => &mut self.job_role,
            Field::Level => &mut self.level,
            Field::Industry => &mut self.industry,
            Field::Summary => &mut self.summary,
            Field::Skills => &mut self.skills,
            Field::Website => &mut self.website,
        };
        *slot = value;
    }

    /// Value of one of the four filterable columns.
    pub fn category_value(&self, category: Category) -> Option<&str> {
        self.get(category.field())
    }

    /// "<name> at <company>", with placeholders for missing parts.
    pub fn title(&self) -> String {
        format!(
            "{} at {}",
            self.name.as_deref().unwrap_or("(untitled)"),
            self.company.as_deref().unwrap_or("(unknown company)")
        )
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// The loaded table: rows plus the four distinct-value indexes.
///
/// Built once at startup and shared by reference. There is no interior
/// mutability; reloading means building a new `Dataset`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    listings: Vec<Listing>,
    domains: Vec<String>,
    job_roles: Vec<String>,
    levels: Vec<String>,
    industries: Vec<String>,
}

impl Dataset {
    pub fn new(listings: Vec<Listing>) -> Self {
        let domains = distinct_values(&listings, Category::Domain);
        let job_roles = distinct_values(&listings, Category::JobRole);
        let levels = distinct_values(&listings, Category::Level);
        let industries = distinct_values(&listings, Category::Industry);

        log::debug!(
            "dataset built: {} listings, {} domains, {} roles, {} levels, {} industries",
            listings.len(),
            domains.len(),
            job_roles.len(),
            levels.len(),
            industries.len()
        );

        Self {
            listings,
            domains,
            job_roles,
            levels,
            industries,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Sorted distinct values of a filterable column (missing excluded).
    pub fn distinct(&self, category: Category) -> &[String] {
        match category {
            Category::Domain => &self.domains,
            Category::JobRole => &self.job_roles,
            Category::Level => &self.levels,
            Category::Industry => &self.industries,
        }
    }
}

fn distinct_values(listings: &[Listing], category: Category) -> Vec<String> {
    let mut values: Vec<String> = listings
        .iter()
        .filter_map(|l| l.category_value(category))
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}
