// Listing dataset import (CSV/TSV)

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use internmatch_engine::{Dataset, Field, Listing};

/// Header names for each listing field in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: String,
    pub company: String,
    pub domain: String,
    pub job_role: String,
    pub level: String,
    pub industry: String,
    pub summary: String,
    pub skills: String,
    pub website: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "Menternship Name".into(),
            company: "Company".into(),
            domain: "Domain".into(),
            job_role: "Job Role".into(),
            level: "Level".into(),
            industry: "Industry".into(),
            summary: "One-line Summary".into(),
            skills: "Skills - Apply".into(),
            website: "Website".into(),
        }
    }
}

impl ColumnMapping {
    pub fn header_for(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Company => &self.company,
            Field::Domain => &self.domain,
            Field::JobRole => &self.job_role,
            Field::Level => &self.level,
            Field::Industry => &self.industry,
            Field::Summary => &self.summary,
            Field::Skills => &self.skills,
            Field::Website => &self.website,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// File could not be read.
    Io { path: String, message: String },
    /// A mapped column is not present in the header row.
    MissingColumn { column: String },
    /// Malformed CSV (bad quoting, etc.).
    Csv(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load the listing table from a file. Delimiter is sniffed.
pub fn load_dataset(path: &Path, columns: &ColumnMapping) -> Result<Dataset, LoadError> {
    let content = read_file_as_utf8(path).map_err(|message| LoadError::Io {
        path: path.display().to_string(),
        message,
    })?;
    let dataset = parse_dataset(&content, columns)?;
    log::info!("loaded {} listings from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parse an in-memory table (first row is headers).
pub fn parse_dataset(content: &str, columns: &ColumnMapping) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut positions = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let column = columns.header_for(field);
        let idx = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| LoadError::MissingColumn { column: column.to_string() })?;
        positions.push((field, idx));
    }

    let mut listings = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Csv(e.to_string()))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut listing = Listing::default();
        for &(field, idx) in &positions {
            // Short rows leave trailing fields missing
            listing.set(field, record.get(idx).unwrap_or(""));
        }
        listings.push(listing);
    }

    Ok(Dataset::new(listings))
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Consistent lines weighted by field count; wider wins ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::warn!("{} is not valid UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
