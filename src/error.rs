//! Error types for rezume library.
//!
//! Normalizing and transpiling markup never fails; malformed markup is
//! reported through `ConversionResult::warnings`. These errors cover the
//! surfaces around the core: reading input, serializing output and parsing
//! option strings.

use std::io;
use thiserror::Error;

/// Result type alias for rezume operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error during rendering (HTML, Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// An option value could not be parsed (page size, output format).
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOption("page size 'b5'".to_string());
        assert_eq!(err.to_string(), "Invalid option: page size 'b5'");

        let err = Error::Render("JSON serialization error: boom".to_string());
        assert_eq!(err.to_string(), "Rendering error: JSON serialization error: boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_utf8_error_conversion() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: Error = bad.into();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
