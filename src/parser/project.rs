use std::collections::BTreeMap;

use serde::Serialize;

use super::{disambiguate, normalize};

// Metadata keys the reports conventionally use. Any other bullet label is
// kept under its own name.
pub const PROJECT_PLANNER: &str = "Project Planner";
pub const PLANNING_AREA: &str = "Planning Area";
pub const STATUS: &str = "Status";
pub const APPLICANT: &str = "Applicant";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub ordinal: u32,
    pub title: String,
    pub title_alt: Option<String>,
    pub header: Option<String>,
    pub description: String,
    pub page: usize,
    pub metadata: BTreeMap<String, String>,
}

impl Project {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// An entry still being read. Description fragments stay raw until
/// [`Draft::finalize`].
#[derive(Debug, Clone)]
pub struct Draft {
    pub ordinal: u32,
    pub raw_title: String,
    pub header: Option<String>,
    pub page: usize,
    pub description: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl Draft {
    pub fn new(ordinal: u32, raw_title: &str, header: Option<String>, page: usize) -> Self {
        Draft {
            ordinal,
            raw_title: raw_title.to_string(),
            header,
            page,
            description: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn finalize(mut self) -> Project {
        if let Some(last) = self.description.last_mut() {
            let trailer = disambiguate::strip_trailer(last);
            if let Some(planner) = trailer.planner {
                self.metadata.insert(PROJECT_PLANNER.to_string(), planner);
            }
            if let Some(area) = trailer.planning_area {
                self.metadata.insert(PLANNING_AREA.to_string(), area);
            }
        }
        let (title, title_alt) = disambiguate::split_title(&self.raw_title);

        Project {
            ordinal: self.ordinal,
            title,
            title_alt,
            header: self.header,
            description: normalize::description(&self.description),
            page: self.page,
            metadata: self.metadata,
        }
    }
}
