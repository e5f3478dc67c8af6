//! Parse state threaded through every line of one document.

use tracing::{debug, warn};

use super::project::{Draft, Project};
use super::Diagnostic;

#[derive(Debug, Default)]
pub struct ParseState {
    /// Report month/year, taken from the first page boilerplate that has one.
    pub date: Option<String>,
    /// 1-based number of the page being walked.
    pub page: usize,
    pub header: Option<String>,
    pub project: Option<Draft>,
}

/// Everything a document walk produces besides the date.
#[derive(Debug, Default)]
pub struct Emitted {
    pub projects: Vec<Project>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Emitted {
    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "report diagnostic");
        self.diagnostics.push(diagnostic);
    }
}

impl ParseState {
    pub fn on_entry_start(&mut self, ordinal: u32, raw_title: &str, out: &mut Emitted) {
        self.finish_project(out);
        self.project = Some(Draft::new(ordinal, raw_title, self.header.clone(), self.page));
    }

    /// A header closes the open entry without starting another.
    pub fn on_header(&mut self, text: &str, out: &mut Emitted) {
        self.finish_project(out);
        self.header = Some(text.to_string());
    }

    pub fn on_metadata(&mut self, key: &str, value: &str, out: &mut Emitted) {
        match self.project.as_mut() {
            Some(draft) => {
                draft.metadata.insert(key.to_string(), value.to_string());
            }
            None => out.diagnose(Diagnostic::OrphanMetadata {
                page: self.page,
                key: key.to_string(),
            }),
        }
    }

    pub fn on_continuation(&mut self, text: &str) {
        match self.project.as_mut() {
            Some(draft) => draft.description.push(text.to_string()),
            None => debug!(page = self.page, line = text, "text outside any entry"),
        }
    }

    /// Finalize and emit the open entry, if any.
    pub fn finish_project(&mut self, out: &mut Emitted) {
        let Some(draft) = self.project.take() else {
            return;
        };
        if draft.description.is_empty() {
            out.diagnose(Diagnostic::MissingDescription {
                page: draft.page,
                ordinal: draft.ordinal,
                title: draft.raw_title.clone(),
            });
        }
        out.projects.push(draft.finalize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_on_page(page: usize) -> ParseState {
        ParseState { page, ..ParseState::default() }
    }

    #[test]
    fn entry_start_closes_previous() {
        let mut state = state_on_page(1);
        let mut out = Emitted::default();
        state.on_entry_start(1, "First Project Site", &mut out);
        state.on_continuation("Some text.");
        assert!(out.projects.is_empty());

        state.on_entry_start(2, "Second Project Site", &mut out);
        assert_eq!(out.projects.len(), 1);
        assert_eq!(out.projects[0].ordinal, 1);
        assert_eq!(state.project.as_ref().map(|d| d.ordinal), Some(2));
    }

    #[test]
    fn header_closes_without_opening() {
        let mut state = state_on_page(3);
        let mut out = Emitted::default();
        state.on_entry_start(7, "Old Mill Conversion", &mut out);
        state.on_continuation("Adaptive reuse.");
        state.on_header("PROJECTS UNDER CONSTRUCTION", &mut out);

        assert!(state.project.is_none());
        assert_eq!(out.projects.len(), 1);
        assert_eq!(out.projects[0].header, None);
        assert_eq!(state.header.as_deref(), Some("PROJECTS UNDER CONSTRUCTION"));

        state.on_entry_start(8, "Depot Square Housing", &mut out);
        assert_eq!(
            state.project.as_ref().and_then(|d| d.header.as_deref()),
            Some("PROJECTS UNDER CONSTRUCTION")
        );
    }

    #[test]
    fn metadata_sets_field_on_open_entry() {
        let mut state = state_on_page(1);
        let mut out = Emitted::default();
        state.on_entry_start(1, "First Project Site", &mut out);
        state.on_metadata("Applicant", "Acme Homes", &mut out);
        state.on_metadata("Applicant", "Acme Homes LLC", &mut out);
        let draft = state.project.as_ref().unwrap();
        assert_eq!(draft.metadata.get("Applicant").map(String::as_str), Some("Acme Homes LLC"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn orphan_lines_are_dropped() {
        let mut state = state_on_page(5);
        let mut out = Emitted::default();
        state.on_metadata("Status", "Pending", &mut out);
        state.on_continuation("Introductory paragraph.");
        state.finish_project(&mut out);

        assert!(out.projects.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::OrphanMetadata { page: 5, key: "Status".into() }]
        );
    }

    #[test]
    fn empty_entry_is_reported_and_emitted() {
        let mut state = state_on_page(2);
        let mut out = Emitted::default();
        state.on_entry_start(3, "Vacant Lot Study", &mut out);
        state.finish_project(&mut out);

        assert_eq!(out.projects.len(), 1);
        assert_eq!(out.projects[0].description, "");
        assert!(matches!(
            out.diagnostics.as_slice(),
            [Diagnostic::MissingDescription { page: 2, ordinal: 3, .. }]
        ));
    }
}
