//! Error types for the sempdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sempdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing the PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The metadata override file is invalid or not a JSON object.
    #[error("invalid metadata file {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    /// No input documents were found to process.
    #[error("no PDF files found to process")]
    NoInputs,

    /// Page number is out of range.
    #[error("page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during HTML rendering.
    #[error("rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoInputs;
        assert_eq!(err.to_string(), "no PDF files found to process");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
