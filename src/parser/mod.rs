pub mod disambiguate;
pub mod lines;
pub mod normalize;
pub mod pages;
pub mod project;
pub mod state;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{ParseError, Result};
use crate::source;
pub use project::Project;
use state::{Emitted, ParseState};

/// Non-fatal problems found while walking a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    ShortPage { page: usize, lines: Vec<String> },
    MissingDescription { page: usize, ordinal: u32, title: String },
    OrphanMetadata { page: usize, key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShortPage { page, lines } => {
                write!(f, "page {page}: short page ({} lines) {lines:?}", lines.len())
            }
            Diagnostic::MissingDescription { page, ordinal, title } => {
                write!(f, "page {page}: entry {ordinal} '{title}' has no description")
            }
            Diagnostic::OrphanMetadata { page, key } => {
                write!(f, "page {page}: '{key}' line outside any entry")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Pages at the end of every report that carry no entries.
    pub trailing_pages: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { trailing_pages: 1 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub document: String,
    pub date: String,
    pub projects: Vec<Project>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of one report. A failed report contributes no projects at all.
#[derive(Debug)]
pub enum Outcome {
    Parsed(Report),
    Failed { document: String, cause: ParseError },
}

/// Walk the pages of one report in order and collect its projects.
pub fn parse_pages(document: &str, texts: &[String], options: ParseOptions) -> Result<Report> {
    let content = &texts[..texts.len().saturating_sub(options.trailing_pages)];
    let mut state = ParseState::default();
    let mut out = Emitted::default();

    for (n, text) in content.iter().enumerate() {
        state.page = n + 1;
        let status = pages::walk_page(text, &mut state, &mut out);
        debug!(document, page = state.page, ?status, "walked page");
    }
    state.finish_project(&mut out);

    let date = state.date.ok_or(ParseError::MissingDate)?;
    Ok(Report {
        document: document.to_string(),
        date,
        projects: out.projects,
        diagnostics: out.diagnostics,
    })
}

pub fn parse_document(path: &Path, options: ParseOptions) -> Outcome {
    let document = path.display().to_string();
    let parsed = source::load_pages(path).and_then(|texts| parse_pages(&document, &texts, options));
    match parsed {
        Ok(report) => {
            info!(
                document = %report.document,
                date = %report.date,
                projects = report.projects.len(),
                diagnostics = report.diagnostics.len(),
                "parsed report"
            );
            Outcome::Parsed(report)
        }
        Err(cause) => {
            error!(%document, %cause, "parse failed");
            Outcome::Failed { document, cause }
        }
    }
}
