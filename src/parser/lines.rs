use std::sync::LazyLock;

use regex::Regex;

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ ?([0-9]{1,3})\. (.{5,})$").unwrap());
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z -]{20,}($|\()").unwrap());
static META_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^• +([^:]+):(.+)$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    EntryStart { ordinal: u32, title: &'a str },
    Header(&'a str),
    Metadata { key: &'a str, value: &'a str },
    Continuation(&'a str),
    Blank,
}

type Rule = for<'a> fn(&'a str) -> Option<Line<'a>>;

/// Structural rules, highest priority first. Anything none of them claims is
/// description text.
const RULES: &[Rule] = &[entry_start, header, metadata];

pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    RULES
        .iter()
        .find_map(|rule| rule(line))
        .unwrap_or(Line::Continuation(trimmed))
}

pub fn is_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

fn entry_start(line: &str) -> Option<Line<'_>> {
    let caps = ENTRY_RE.captures(line)?;
    let ordinal = caps.get(1)?.as_str().parse().ok()?;
    Some(Line::EntryStart {
        ordinal,
        title: caps.get(2)?.as_str().trim(),
    })
}

fn header(line: &str) -> Option<Line<'_>> {
    is_header(line).then(|| Line::Header(line.trim()))
}

fn metadata(line: &str) -> Option<Line<'_>> {
    let caps = META_RE.captures(line)?;
    // "Status/Next Steps" and "Status" are the same field
    let label = caps.get(1)?.as_str();
    let key = label.split('/').next().unwrap_or(label).trim();
    Some(Line::Metadata {
        key,
        value: caps.get(2)?.as_str().trim(),
    })
}
