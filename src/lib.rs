//! vCard QR generator
//!
//! Turns a contact record into a vCard 3.0 text record, fetches a scannable
//! QR code image for it from a hosted QR rendering service, and saves the
//! result as a PNG.
//!
//! # Features
//!
//! - **remote** (default): [`QrServerRenderer`], a blocking HTTP client for
//!   the hosted QR API
//! - **Renderer seam**: anything implementing [`ImageRenderer`] can stand in
//!   for the hosted service
//! - **Session state**: [`Session`] keeps the form fields, live preview and
//!   last generated image in one explicit object
//!
//! # Example
//!
//! ```no_run
//! use vcardqr::{Field, GeneratorConfig, ImageClient, Session};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! session.set_field(Field::FirstName, "Jane");
//! session.set_field(Field::LastName, "Doe");
//! session.set_field(Field::Phone, "+1-555-000-0000");
//! println!("{}", session.preview());
//!
//! let client = ImageClient::new(GeneratorConfig::default()).await?;
//! session.generate(&client).await?;
//! let path = session.download(".")?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod contact;
pub mod export;
pub mod logging;
pub mod render;
pub mod session;
pub mod vcard;

// HTTP renderer for the hosted QR API
#[cfg(feature = "remote")]
pub mod qrserver;

// Async front for blocking renderers (worker thread + oneshot replies)
pub mod async_api;

pub use async_api::ImageClient;
pub use contact::{ContactRecord, Field};
pub use render::{ImageFormat, ImageRenderer, PixelDimension, RenderedImage};
pub use session::{GenerationTicket, ImageState, Session};
pub use vcard::{build, NotReady, VCardText};

#[cfg(feature = "remote")]
pub use qrserver::QrServerRenderer;

/// Default hosted QR rendering endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Largest square image the hosted service will produce
pub const MAX_SIZE: u32 = 1000;

/// Largest margin the hosted service accepts
pub const MAX_MARGIN: u32 = 50;

/// Configuration for image acquisition
///
/// The defaults match what the contact form asked for: a 300×300 PNG with a
/// margin of 10, fetched from the public QR server with a bounded timeout.
///
/// # Examples
///
/// ```
/// let cfg = vcardqr::GeneratorConfig::default();
/// assert_eq!(cfg.size.get(), 300);
/// assert_eq!(cfg.margin, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// QR rendering endpoint (absolute http or https URL)
    pub endpoint: String,
    /// Side length of the square image
    pub size: PixelDimension,
    /// Quiet zone around the code, in modules
    pub margin: u32,
    /// Transfer format requested from the service
    pub format: ImageFormat,
    /// Timeout for the image request in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            size: PixelDimension::DEFAULT,
            margin: 10,
            format: ImageFormat::Png,
            timeout_ms: 10_000,
            user_agent: format!("vcardqr/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg: GeneratorConfig = serde_json::from_str(&text)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the hosted service cannot honour.
    pub fn validate(&self) -> Result<()> {
        let size = self.size.get();
        if size == 0 || size > MAX_SIZE {
            return Err(Error::ConfigError(format!(
                "size must be between 1 and {}, got {}",
                MAX_SIZE, size
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(Error::ConfigError(format!(
                "margin must be at most {}, got {}",
                MAX_MARGIN, self.margin
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout_ms must be positive".into()));
        }
        let scheme_ok = self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://");
        if !scheme_ok {
            return Err(Error::ConfigError(format!(
                "endpoint must be an absolute http(s) URL: {}",
                self.endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.size, PixelDimension(300));
        assert_eq!(config.margin, 10);
        assert_eq!(config.format, ImageFormat::Png);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let too_big = GeneratorConfig { size: PixelDimension(1001), ..Default::default() };
        assert!(too_big.validate().is_err());

        let zero = GeneratorConfig { size: PixelDimension(0), ..Default::default() };
        assert!(zero.validate().is_err());

        let margin = GeneratorConfig { margin: 51, ..Default::default() };
        assert!(margin.validate().is_err());

        let endpoint = GeneratorConfig { endpoint: "ftp://x".into(), ..Default::default() };
        assert!(matches!(endpoint.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_from_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"size": 512, "format": "gif", "timeout_ms": 2500}"#).unwrap();

        let cfg = GeneratorConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.size, PixelDimension(512));
        assert_eq!(cfg.format, ImageFormat::Gif);
        assert_eq!(cfg.timeout_ms, 2500);
        assert_eq!(cfg.margin, 10);
    }

    #[test]
    fn test_config_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = GeneratorConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io(_))));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"margin": 99}"#).unwrap();
        assert!(matches!(GeneratorConfig::from_json_file(&path), Err(Error::ConfigError(_))));
    }
}
