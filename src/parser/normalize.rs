use std::sync::LazyLock;

use regex::Regex;

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ([.,:;)/-])").unwrap());

/// Join description fragments into one line of prose: single spaces only,
/// no space in front of closing punctuation.
pub fn description(fragments: &[String]) -> String {
    let joined = fragments.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    SPACE_BEFORE_PUNCT_RE.replace_all(&collapsed, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        description(&[s.to_string()])
    }

    #[test]
    fn joins_fragments_with_single_space() {
        let parts = vec!["Construct a five-story".to_string(), "mixed-use building".to_string()];
        assert_eq!(description(&parts), "Construct a five-story mixed-use building");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(norm("two  \t units\n  proposed"), "two units proposed");
    }

    #[test]
    fn removes_space_before_punctuation() {
        assert_eq!(
            norm("Approved , pending appeal ; see ( attached ) map / plan - final ."),
            "Approved, pending appeal; see ( attached) map/ plan- final."
        );
    }

    #[test]
    fn trims_ends() {
        assert_eq!(norm("  Status update. "), "Status update.");
    }

    #[test]
    fn empty_input() {
        assert_eq!(description(&[]), "");
    }

    #[test]
    fn idempotent() {
        for s in [
            "a  .  b ,c",
            "Hearing : 6 : 30 PM ) ) .",
            "  lots   of\nspace  - here / there ",
            "x . . .",
        ] {
            let once = norm(s);
            assert_eq!(norm(&once), once, "input: {s:?}");
            assert!(!once.contains("  "));
        }
    }
}
