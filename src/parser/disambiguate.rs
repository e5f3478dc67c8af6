//! Parenthetical fragments at the end of titles and descriptions.
//!
//! Reports write an entry as `Name (123 Some St)` or `123 Some St (Name)` and
//! close the last description sentence with `(Planning Area) (Planner)`.

use std::sync::LazyLock;

use regex::Regex;

static TRAILING_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\(([^)]+)\) *$").unwrap());
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+ ").unwrap());

/// Split `text` into the part before a trailing `(...)` and the text inside it.
pub fn split_trailing(text: &str) -> Option<(&str, &str)> {
    let caps = TRAILING_PAREN_RE.captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

pub fn looks_like_address(text: &str) -> bool {
    ADDRESS_RE.is_match(text)
}

/// Returns `(title, title_alt)`. The parenthesized label becomes the title
/// only when it reads like a street address.
pub fn split_title(raw: &str) -> (String, Option<String>) {
    match split_trailing(raw) {
        Some((outer, inner)) => {
            let (outer, inner) = (outer.trim(), inner.trim());
            if looks_like_address(inner) {
                (inner.to_string(), Some(outer.to_string()))
            } else {
                (outer.to_string(), Some(inner.to_string()))
            }
        }
        None => (raw.trim().to_string(), None),
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Trailer {
    pub planner: Option<String>,
    pub planning_area: Option<String>,
}

/// Strip `(Planning Area) (Planner)` from the end of the last description
/// fragment, in place. The innermost parenthetical is always the planner.
pub fn strip_trailer(last: &mut String) -> Trailer {
    let mut trailer = Trailer::default();
    let Some((rest, planner)) = split_trailing(last.as_str()) else {
        return trailer;
    };
    trailer.planner = Some(planner.to_string());
    let remaining = match split_trailing(rest) {
        Some((rest, area)) => {
            trailer.planning_area = Some(area.to_string());
            rest.to_string()
        }
        None => rest.to_string(),
    };
    *last = remaining;
    trailer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_in_parentheses_becomes_title() {
        let (title, alt) = split_title("Example Project Name (123 Example St)");
        assert_eq!(title, "123 Example St");
        assert_eq!(alt.as_deref(), Some("Example Project Name"));
    }

    #[test]
    fn address_outside_parentheses_stays_title() {
        let (title, alt) = split_title("123 Example St (Example Project Name)");
        assert_eq!(title, "123 Example St");
        assert_eq!(alt.as_deref(), Some("Example Project Name"));
    }

    #[test]
    fn title_without_parentheses() {
        assert_eq!(split_title("Riverside Transit Village "), ("Riverside Transit Village".to_string(), None));
    }

    #[test]
    fn number_without_space_is_not_address() {
        let (title, alt) = split_title("Lot Split (2nd Review)");
        assert_eq!(title, "Lot Split");
        assert_eq!(alt.as_deref(), Some("2nd Review"));
    }

    #[test]
    fn planner_and_area_removed() {
        let mut last = "Status update. (Downtown) (J. Smith)".to_string();
        let trailer = strip_trailer(&mut last);
        assert_eq!(trailer.planner.as_deref(), Some("J. Smith"));
        assert_eq!(trailer.planning_area.as_deref(), Some("Downtown"));
        assert_eq!(last.trim(), "Status update.");
    }

    #[test]
    fn single_parenthetical_is_planner() {
        let mut last = "Under construction. (A. Lee)".to_string();
        let trailer = strip_trailer(&mut last);
        assert_eq!(trailer.planner.as_deref(), Some("A. Lee"));
        assert_eq!(trailer.planning_area, None);
        assert_eq!(last, "Under construction. ");
    }

    #[test]
    fn no_trailing_parenthetical() {
        let mut last = "Pending (see note) for review.".to_string();
        assert_eq!(strip_trailer(&mut last), Trailer::default());
        assert_eq!(last, "Pending (see note) for review.");
    }

    #[test]
    fn bare_parenthetical_is_left_alone() {
        let mut last = "(Downtown)".to_string();
        assert_eq!(strip_trailer(&mut last), Trailer::default());
    }
}
