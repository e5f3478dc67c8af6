use std::sync::LazyLock;

use regex::Regex;

use super::lines::{classify, is_header, Line};
use super::state::{Emitted, ParseState};
use super::Diagnostic;

static PAGE_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\s*planning division update\s*(.{5,25})page \d+ of \d+").unwrap()
});
static WIDE_GAP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"  +").unwrap());

/// Pages with fewer lines than this carry no entries worth reading.
const MIN_PAGE_LINES: usize = 3;
/// A page that arrives as one line longer than this lost its line breaks.
const COLLAPSED_PAGE_CHARS: usize = 100;
/// How far down a page a section header may sit and still count as its title.
const HEADER_SCAN_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageStatus {
    Walked { lines: usize },
    Short,
}

/// Drop the "Planning Division Update <date> Page N of M" boilerplate and
/// everything before it. The first date seen is kept in `state`.
pub fn strip_page_head<'a>(text: &'a str, state: &mut ParseState) -> &'a str {
    let mut body_start = None;
    for caps in PAGE_HEAD_RE.captures_iter(text) {
        if state.date.is_none() {
            state.date = caps.get(1).map(|m| m.as_str().trim().to_string());
        }
        body_start = caps.get(0).map(|m| m.end());
    }
    match body_start {
        Some(start) => text[start..].trim(),
        None => text.trim(),
    }
}

pub fn split_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 && text.chars().count() > COLLAPSED_PAGE_CHARS {
        // line breaks were lost; column gaps are the best remaining boundary
        return WIDE_GAP_RE.split(text).collect();
    }
    lines
}

/// Feed one page through the classifier into the open parse state.
pub fn walk_page(text: &str, state: &mut ParseState, out: &mut Emitted) -> PageStatus {
    let body = strip_page_head(text, state);
    let mut lines = split_lines(body);
    if lines.len() < MIN_PAGE_LINES {
        out.diagnose(Diagnostic::ShortPage {
            page: state.page,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        });
        return PageStatus::Short;
    }

    // A header near the top titles this page; one on the last line was
    // printed early and titles what follows.
    let top = lines.iter().take(HEADER_SCAN_LINES).position(|l| is_header(l));
    match top {
        Some(n) => {
            state.header = Some(lines[n].trim().to_string());
            lines = lines.split_off(n);
        }
        None => {
            if lines.last().is_some_and(|l| is_header(l)) {
                state.header = lines.pop().map(|l| l.trim().to_string());
            }
        }
    }

    let count = lines.len();
    for line in lines {
        match classify(line) {
            Line::Blank => {}
            Line::EntryStart { ordinal, title } => state.on_entry_start(ordinal, title, out),
            Line::Header(text) => state.on_header(text, out),
            Line::Metadata { key, value } => state.on_metadata(key, value, out),
            Line::Continuation(text) => state.on_continuation(text),
        }
    }
    PageStatus::Walked { lines: count }
}
