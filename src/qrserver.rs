//! Renderer backed by a hosted QR image API (api.qrserver.com by default).
//!
//! The service does the QR encoding; this module only builds the GET
//! request, checks that what comes back is an image and decodes it.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

use crate::render::{ImageRenderer, PixelDimension, RenderedImage};
use crate::vcard::VCardText;
use crate::{Error, GeneratorConfig, Result};

/// Build the request URL for `payload` at `size`.
///
/// Query parameters are emitted as `size`, `data`, `format`, `margin`.
pub fn request_url(config: &GeneratorConfig, payload: &VCardText, size: PixelDimension) -> Result<Url> {
    let mut url = Url::parse(&config.endpoint)
        .map_err(|e| Error::ConfigError(format!("Invalid endpoint {}: {}", config.endpoint, e)))?;
    url.query_pairs_mut()
        .append_pair("size", &size.to_string())
        .append_pair("data", payload.as_str())
        .append_pair("format", config.format.as_param())
        .append_pair("margin", &config.margin.to_string());
    Ok(url)
}

/// Blocking HTTP renderer.
pub struct QrServerRenderer {
    client: Client,
    config: GeneratorConfig,
}

impl QrServerRenderer {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.config.timeout_ms)
        } else {
            Error::GenerationError(format!("HTTP GET failed: {}", e))
        }
    }
}

impl ImageRenderer for QrServerRenderer {
    fn render(&self, payload: &VCardText, size: PixelDimension) -> Result<RenderedImage> {
        let url = request_url(&self.config, payload, size)?;
        log::debug!("requesting QR image: {}", url);

        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::GenerationError(format!(
                "QR service answered with HTTP {}",
                status
            )));
        }

        // A missing Content-Type is tolerated; the decoder has the last word.
        if let Some(ct) = res.headers().get(CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or_default().to_ascii_lowercase();
            if !ct.starts_with("image/") {
                return Err(Error::GenerationError(format!(
                    "QR service returned non-image content: {}",
                    ct
                )));
            }
        }

        let body = res
            .bytes()
            .map_err(|e| self.transport_error(e))?;

        let image = RenderedImage::from_encoded(&body, size)?;
        log::debug!(
            "received {}x{} QR image ({} bytes, sha256 {})",
            image.width(),
            image.height(),
            body.len(),
            image.digest()
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactRecord;
    use crate::vcard;

    fn payload() -> VCardText {
        let rec = ContactRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone: "+1 555".into(),
            ..Default::default()
        };
        vcard::build(&rec).unwrap()
    }

    #[test]
    fn request_url_has_expected_parameters() {
        let cfg = GeneratorConfig::default();
        let url = request_url(&cfg, &payload(), PixelDimension(300)).unwrap();
        assert_eq!(url.host_str(), Some("api.qrserver.com"));
        assert_eq!(url.path(), "/v1/create-qr-code/");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("size".into(), "300x300".into()));
        assert_eq!(pairs[1], ("data".into(), payload().into_string()));
        assert_eq!(pairs[2], ("format".into(), "png".into()));
        assert_eq!(pairs[3], ("margin".into(), "10".into()));

        // payload must be escaped, never raw newlines or semicolons
        let raw = url.as_str();
        assert!(!raw.contains('\n'));
        assert!(!raw.contains("N:Doe;Jane"));
    }

    #[test]
    fn request_url_rejects_bad_endpoint() {
        let cfg = GeneratorConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            request_url(&cfg, &payload(), PixelDimension(300)),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn renderer_fetches_from_local_server() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();

        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = tiny_http::Response::from_data(crate::render::sample_png(300))
                    .with_header("Content-Type: image/png".parse::<tiny_http::Header>().unwrap());
                let _ = request.respond(response);
            }
        });

        let cfg = GeneratorConfig {
            endpoint: format!("http://{}/v1/create-qr-code/", addr),
            ..Default::default()
        };
        let renderer = QrServerRenderer::new(cfg).expect("Failed to create renderer");
        let image = renderer
            .render(&payload(), PixelDimension(300))
            .expect("Failed to render");
        assert_eq!(image.width(), 300);
    }
}
