//! Terminology source loading
//!
//! Term sources are CSV files with a header row:
//!
//! ```text
//! id,term,translation,domain
//! 1,server,servidor,it
//! 2,load balancer,balanceador de carga,
//! ```
//!
//! `id` and `domain` are optional, and an optional `language` column overrides the
//! language inferred from the file name (`terminologies_es.csv` → `es`, otherwise `en`).
//! Loading is lenient: a bad record is skipped, a bad file is reported, and neither
//! stops the remaining sources from loading.

use std::fs;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{TerminexError, TerminexResult};
use crate::store::TermStore;
use crate::term::{DEFAULT_DOMAIN, DEFAULT_LANGUAGE, Term, normalize};

static SOURCE_LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)terminologies_([a-z]+)\.csv").expect("source language regex"));

/// One CSV row as it appears on disk, before validation
#[derive(Debug, Deserialize)]
struct TermRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Outcome of reading a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub language: String,
    /// Records inserted into the store
    pub loaded: usize,
    /// Records dropped: empty term/translation, bad id, or unparsable row
    pub skipped: usize,
}

/// A source that could not be read at all
#[derive(Debug)]
pub struct LoadFailure {
    pub source: String,
    pub error: TerminexError,
}

/// Aggregated result of loading several sources
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn total_loaded(&self) -> usize {
        self.sources.iter().map(|s| s.loaded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.sources.iter().map(|s| s.skipped).sum()
    }

    /// True when every source was read (individual records may still have been skipped)
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn merge(&mut self, other: LoadReport) {
        self.sources.extend(other.sources);
        self.failures.extend(other.failures);
    }

    fn record(&mut self, source: &str, result: TerminexResult<SourceReport>) {
        match result {
            Ok(report) => self.sources.push(report),
            Err(error) => {
                warn!("Error loading terminology from {}: {}", source, error);
                self.failures.push(LoadFailure {
                    source: source.to_string(),
                    error,
                });
            }
        }
    }
}

/// Infer the language code from a source name such as `terminologies_fr.csv`.
pub fn language_from_source_name(name: &str) -> Option<String> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    SOURCE_LANGUAGE_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Load a file, or every `.csv` file in a directory, into the store.
pub fn load_path(store: &mut TermStore, path: &Path) -> LoadReport {
    let mut report = LoadReport::default();
    if path.is_dir() {
        match csv_files_in_dir(path) {
            Ok(files) => {
                if files.is_empty() {
                    warn!("No CSV files found in directory {}", path.display());
                }
                for file in files {
                    let result = load_file(store, &file);
                    report.record(&file.display().to_string(), result);
                }
            }
            Err(error) => report.record(&path.display().to_string(), Err(error)),
        }
    } else {
        let result = load_file(store, path);
        report.record(&path.display().to_string(), result);
    }
    report
}

/// Load a single CSV file into the store.
pub fn load_file(store: &mut TermStore, path: &Path) -> TerminexResult<SourceReport> {
    let file = fs::File::open(path).map_err(|source| TerminexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(store, &path.display().to_string(), file)
}

/// Load CSV records from any reader. `source_name` is used for language inference and reporting.
pub fn load_reader<R: Read>(
    store: &mut TermStore,
    source_name: &str,
    reader: R,
) -> TerminexResult<SourceReport> {
    let language =
        language_from_source_name(source_name).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| TerminexError::Csv {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();
    for column in ["term", "translation"] {
        if !headers.iter().any(|h| h == column) {
            return Err(TerminexError::MissingColumn {
                source_name: source_name.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut report = SourceReport {
        source: source_name.to_string(),
        language: language.clone(),
        loaded: 0,
        skipped: 0,
    };

    for (row, result) in csv_reader.deserialize::<TermRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(TerminexError::Csv {
                    source_name: source_name.to_string(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(
                    "Skipping malformed record {} in {}: {}",
                    row + 1, source_name, err
                );
                report.skipped += 1;
                continue;
            }
        };

        match build_term(record, store.len(), &language) {
            Ok(Some(term)) => {
                store.insert(term);
                report.loaded += 1;
            }
            Ok(None) => report.skipped += 1,
            Err(reason) => {
                warn!("Skipping record {} in {}: {}", row + 1, source_name, reason);
                report.skipped += 1;
            }
        }
    }

    store.set_language(&language);
    info!(
        "Loaded {} terms ({} skipped) from {} [{}]",
        report.loaded, report.skipped, source_name, language
    );
    Ok(report)
}

/// Validate a raw record. `Ok(None)` means the record is legitimately empty.
fn build_term(
    record: TermRecord,
    loaded_so_far: usize,
    source_language: &str,
) -> Result<Option<Term>, String> {
    let term_text = normalize(record.term.as_deref().unwrap_or_default());
    let translation = record.translation.as_deref().unwrap_or_default().trim();
    if term_text.is_empty() || translation.is_empty() {
        debug!("Ignoring record without term or translation");
        return Ok(None);
    }

    let id = match record.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_id(raw).ok_or_else(|| format!("invalid id '{}'", raw))?,
        None => loaded_so_far as u64 + 1,
    };

    let domain = record
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DOMAIN);
    let language = record
        .language
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(source_language);

    Ok(Some(
        Term::new(id, &term_text, translation)
            .with_domain(domain)
            .with_language(language),
    ))
}

/// Parse an id column. Spreadsheet exports often write integers as `3.0`.
fn parse_id(raw: &str) -> Option<u64> {
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }
    let float = raw.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

fn csv_files_in_dir(dir: &Path) -> TerminexResult<Vec<std::path::PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| TerminexError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TerminexError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
