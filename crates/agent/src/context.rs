// Table context for agent prompts
//
// Renders the listing table as pipe-delimited text. Capped to keep token
// usage bounded; truncation is reported, never silent.

use internmatch_engine::{Dataset, Field};

/// Warning about context extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextWarning {
    /// Table was truncated due to the row cap
    Truncated { total_rows: usize, sent_rows: usize },
    /// Table has no rows
    EmptyTable,
}

impl ContextWarning {
    pub fn message(&self) -> String {
        match self {
            ContextWarning::Truncated { total_rows, sent_rows } => {
                format!("Table truncated from {} to {} rows for the AI request", total_rows, sent_rows)
            }
            ContextWarning::EmptyTable => "Table is empty".to_string(),
        }
    }
}

/// Listing table as sent to the agent.
#[derive(Debug, Clone)]
pub struct TableContext {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub warnings: Vec<ContextWarning>,
}

impl TableContext {
    pub fn from_dataset(dataset: &Dataset, max_rows: usize) -> Self {
        let total_rows = dataset.len();
        let rows: Vec<Vec<String>> = dataset
            .listings()
            .iter()
            .take(max_rows)
            .map(|listing| {
                Field::ALL
                    .iter()
                    .map(|f| sanitize_cell(listing.get(*f).unwrap_or("")))
                    .collect()
            })
            .collect();

        let mut warnings = Vec::new();
        if total_rows == 0 {
            warnings.push(ContextWarning::EmptyTable);
        } else if rows.len() < total_rows {
            warnings.push(ContextWarning::Truncated {
                total_rows,
                sent_rows: rows.len(),
            });
        }

        Self {
            headers: Field::ALL.iter().map(Field::label).collect(),
            rows,
            total_rows,
            warnings,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ContextWarning::Truncated { .. }))
    }

    pub fn to_prompt_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.headers.join(" | "));
        text.push('\n');
        for row in &self.rows {
            text.push_str(&row.join(" | "));
            text.push('\n');
        }
        text
    }
}

/// Cell text safe for a single pipe-delimited line.
fn sanitize_cell(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '|' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
