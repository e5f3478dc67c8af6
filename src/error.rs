//! Errors that abort a whole report.
//!
//! Anything recoverable (short pages, orphan lines, empty descriptions) is a
//! [`crate::parser::Diagnostic`] instead and never reaches this type.

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// File could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Text report is not valid UTF-8.
    #[error("text report is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// PDF text layer could not be extracted.
    #[error("PDF extraction failed: {0}")]
    Extract(String),

    /// No page carried the "Planning Division Update" boilerplate.
    #[error("no report date found in page boilerplate")]
    MissingDate,
}

pub type Result<T> = std::result::Result<T, ParseError>;
