//! Rendered QR images and the renderer seam.
//!
//! A renderer turns a [`VCardText`] into a [`RenderedImage`]. The crate's
//! own implementation talks to a hosted QR service (see `qrserver`); tests
//! and embedders can plug in anything that implements [`ImageRenderer`].

use std::fmt;
use std::io::Cursor;

use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat as RasterFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::vcard::VCardText;
use crate::{Error, Result};

/// Side length in pixels of the square QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelDimension(pub u32);

impl PixelDimension {
    pub const DEFAULT: PixelDimension = PixelDimension(300);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PixelDimension {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PixelDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Transfer format requested from the renderer.
///
/// Whatever comes over the wire, the exported bytes are always PNG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Gif,
    Jpeg,
}

impl ImageFormat {
    /// Value of the `format` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(Error::ConfigError(format!("Unsupported image format: {}", other))),
        }
    }
}

/// A decoded QR bitmap together with its PNG encoding.
///
/// The bitmap is always `size × size`; the PNG bytes are what gets written
/// on export.
#[derive(Clone)]
pub struct RenderedImage {
    bitmap: RgbaImage,
    png: Vec<u8>,
}

impl fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedImage")
            .field("width", &self.bitmap.width())
            .field("height", &self.bitmap.height())
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl RenderedImage {
    /// Decode raster bytes returned by a renderer.
    ///
    /// The image is scaled onto a `size × size` canvas when the service sent
    /// something else, then re-encoded as PNG.
    pub fn from_encoded(bytes: &[u8], size: PixelDimension) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::GenerationError("Empty image response".into()));
        }
        let decoded = image::load_from_memory(bytes)?;
        Self::from_bitmap(decoded, size)
    }

    /// Wrap an already decoded image, normalising it to `size × size`.
    pub fn from_bitmap(image: DynamicImage, size: PixelDimension) -> Result<Self> {
        let side = size.get();
        if side == 0 {
            return Err(Error::GenerationError("Requested image size is zero".into()));
        }
        let mut bitmap = image.to_rgba8();
        if bitmap.width() != side || bitmap.height() != side {
            bitmap = image::imageops::resize(&bitmap, side, side, FilterType::Nearest);
        }

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(bitmap.clone())
            .write_to(&mut Cursor::new(&mut png), RasterFormat::Png)?;

        Ok(Self { bitmap, png })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// PNG bytes to write on export.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:` URL embedding the PNG, usable directly as an `<img src>`.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// Hex SHA-256 of the PNG bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png))
    }

    /// Largest display size that fits in `max_width × max_height` while
    /// keeping the bitmap's aspect ratio. Never upscales.
    pub fn fit_within(&self, max_width: u32, max_height: u32) -> (u32, u32) {
        fit_within(self.width(), self.height(), max_width, max_height)
    }
}

/// Scale `(width, height)` down to fit the bounding box without distortion.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    // compare max_w/w against max_h/h without floats
    let (w, h) = (u64::from(width), u64::from(height));
    let (mw, mh) = (u64::from(max_width), u64::from(max_height));
    if mw * h <= mh * w {
        (max_width, ((h * mw) / w) as u32)
    } else {
        (((w * mh) / h) as u32, max_height)
    }
}

/// Something that can turn a vCard payload into a QR image.
pub trait ImageRenderer {
    /// Produce the image for `payload` at `size`. Failures are reported as
    /// generation errors; no retry is attempted.
    fn render(&self, payload: &VCardText, size: PixelDimension) -> Result<RenderedImage>;
}

impl<R: ImageRenderer + ?Sized> ImageRenderer for Box<R> {
    fn render(&self, payload: &VCardText, size: PixelDimension) -> Result<RenderedImage> {
        (**self).render(payload, size)
    }
}

#[cfg(test)]
pub(crate) fn sample_png(side: u32) -> Vec<u8> {
    let img = image::GrayImage::from_fn(side, side, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            image::Luma([0u8])
        } else {
            image::Luma([255u8])
        }
    });
    let mut out = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut out), RasterFormat::Png)
        .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_keeps_requested_size() {
        let img = RenderedImage::from_encoded(&sample_png(300), PixelDimension(300)).unwrap();
        assert_eq!((img.width(), img.height()), (300, 300));
        assert_eq!(&img.png_bytes()[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rescales_to_requested_canvas() {
        let img = RenderedImage::from_encoded(&sample_png(64), PixelDimension(128)).unwrap();
        assert_eq!((img.width(), img.height()), (128, 128));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = RenderedImage::from_encoded(b"<html>nope</html>", PixelDimension(300)).unwrap_err();
        assert!(matches!(err, Error::GenerationError(_)));

        let err = RenderedImage::from_encoded(&[], PixelDimension(300)).unwrap_err();
        assert!(matches!(err, Error::GenerationError(_)));
    }

    #[test]
    fn data_url_and_digest_are_stable() {
        let a = RenderedImage::from_encoded(&sample_png(32), PixelDimension(32)).unwrap();
        let b = RenderedImage::from_encoded(&sample_png(32), PixelDimension(32)).unwrap();
        assert!(a.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn fit_preserves_square_aspect() {
        assert_eq!(fit_within(300, 300, 200, 400), (200, 200));
        assert_eq!(fit_within(300, 300, 500, 120), (120, 120));
        assert_eq!(fit_within(300, 300, 1000, 1000), (300, 300));
        assert_eq!(fit_within(400, 200, 100, 100), (100, 50));
        assert_eq!(fit_within(0, 10, 100, 100), (0, 0));
    }

    #[test]
    fn pixel_dimension_formats_as_square() {
        assert_eq!(PixelDimension::default().to_string(), "300x300");
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert!("svg".parse::<ImageFormat>().is_err());
    }
}
