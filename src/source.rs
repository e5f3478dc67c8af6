//! Page text acquisition.
//!
//! PDF reports go through [`pdf_extract`], which can panic on malformed
//! input instead of returning an error; those panics are caught and turned
//! into [`ParseError::Extract`]. Anything else is read as UTF-8 text with
//! form feeds between pages, the layout `pdftotext` writes.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use crate::error::{ParseError, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";
const PAGE_BREAK: char = '\x0c';

/// Extensions picked up when a whole directory of reports is loaded.
pub const REPORT_EXTENSIONS: &[&str] = &["pdf", "txt"];

pub fn load_pages(path: &Path) -> Result<Vec<String>> {
    let data = fs::read(path)?;
    let pages = if data.starts_with(PDF_MAGIC) {
        extract_pdf(&data)?
    } else {
        split_pages(&String::from_utf8(data)?)
    };
    debug!(path = %path.display(), pages = pages.len(), "loaded page text");
    Ok(pages)
}

fn extract_pdf(data: &[u8]) -> Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(data)));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ParseError::Extract(e.to_string())),
        Err(_) => Err(ParseError::Extract("extractor panicked (malformed document)".into())),
    }
}

/// Split form-feed separated text into pages. The break after the last page
/// does not start another one.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

pub fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| REPORT_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_form_feed() {
        assert_eq!(split_pages("one\x0ctwo\x0cthree"), vec!["one", "two", "three"]);
    }

    #[test]
    fn trailing_break_is_dropped() {
        assert_eq!(split_pages("one\x0ctwo\x0c\n"), vec!["one", "two"]);
    }

    #[test]
    fn text_without_breaks_is_one_page() {
        assert_eq!(split_pages("only page"), vec!["only page"]);
        assert_eq!(split_pages(""), vec![""]);
    }

    #[test]
    fn fixture_has_four_pages() {
        let pages = load_pages(Path::new("tests/fixtures/march_2019.txt")).unwrap();
        assert_eq!(pages.len(), 4);
        assert!(pages[0].starts_with("Planning Division Update"));
    }

    #[test]
    fn malformed_pdf_is_an_error() {
        assert!(matches!(extract_pdf(b"%PDF-1.4\n%%EOF\n"), Err(ParseError::Extract(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(load_pages(Path::new("tests/fixtures/nope.pdf")), Err(ParseError::Io(_))));
    }

    #[test]
    fn report_extensions() {
        assert!(is_report_file(Path::new("reports/2019-03.PDF")));
        assert!(is_report_file(Path::new("march.txt")));
        assert!(!is_report_file(Path::new("data.sqlite")));
        assert!(!is_report_file(Path::new("README")));
    }
}
