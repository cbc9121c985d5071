//! Error types for vCard building, QR image acquisition and export

use thiserror::Error;

/// Result type alias for vcardqr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Notice shown when required contact fields are missing
pub const VALIDATION_NOTICE: &str =
    "Please fill in at least First Name, Last Name, and Mobile Number";

/// Notice shown when the QR image could not be produced
pub const GENERATION_NOTICE: &str = "Error generating QR code. Please try again.";

/// Notice shown when a download is attempted before any image exists
pub const EXPORT_NOTICE: &str = "Please generate a QR code first";

/// Errors that can occur while building, fetching or saving a QR contact card
#[derive(Error, Debug)]
pub enum Error {
    /// Required contact fields are missing
    #[error("Missing required fields: {}", .0.join(", "))]
    ValidationError(Vec<&'static str>),

    /// The remote renderer failed or returned something that is not an image
    #[error("QR generation failed: {0}")]
    GenerationError(String),

    /// The image request did not complete in time
    #[error("QR generation timed out after {0}ms")]
    Timeout(u64),

    /// Nothing to export, or the export could not be written
    #[error("Export failed: {0}")]
    ExportError(String),

    /// A response arrived for a request that a newer one already superseded
    #[error("Superseded by a newer generation request")]
    Stale,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used to pick the user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Generation,
    Export,
    Other,
}

impl Error {
    /// Which of the three user-visible failure families this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ValidationError(_) => ErrorKind::Validation,
            Error::GenerationError(_) | Error::Timeout(_) => ErrorKind::Generation,
            Error::ExportError(_) => ErrorKind::Export,
            Error::Stale | Error::ConfigError(_) | Error::Io(_) => ErrorKind::Other,
        }
    }

    /// Short message suitable for showing to the person filling in the form.
    pub fn user_notice(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => VALIDATION_NOTICE.to_string(),
            ErrorKind::Generation => GENERATION_NOTICE.to_string(),
            ErrorKind::Export => EXPORT_NOTICE.to_string(),
            ErrorKind::Other => self.to_string(),
        }
    }
}

impl From<crate::vcard::NotReady> for Error {
    fn from(err: crate::vcard::NotReady) -> Self {
        Error::ValidationError(err.missing().iter().map(|f| f.label()).collect())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::GenerationError(format!("Image decoding failed: {}", err))
    }
}
