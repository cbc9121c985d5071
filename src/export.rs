//! Saving a rendered QR image to disk.

use std::path::{Path, PathBuf};

use crate::render::RenderedImage;
use crate::{Error, Result};

/// `<first>_<last>_contact_qr.png`, with each run of whitespace replaced by
/// a single underscore.
pub fn export_filename(first_name: &str, last_name: &str) -> String {
    let raw = format!("{}_{}_contact_qr.png", first_name, last_name);
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Write `image` as PNG into `dir` under the derived filename.
///
/// With no image nothing is written and an export error is returned; a
/// failing write surfaces as an I/O error.
pub fn save(
    image: Option<&RenderedImage>,
    first_name: &str,
    last_name: &str,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let image = image.ok_or_else(|| Error::ExportError("no QR code has been generated yet".into()))?;

    let path = dir.as_ref().join(export_filename(first_name, last_name));
    std::fs::write(&path, image.png_bytes())?;
    log::info!("saved QR code to {} (sha256 {})", path.display(), image.digest());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{sample_png, PixelDimension};

    #[test]
    fn filename_collapses_whitespace() {
        assert_eq!(export_filename("Mary Jane", "Smith"), "Mary_Jane_Smith_contact_qr.png");
        assert_eq!(export_filename("Jane", "Doe"), "Jane_Doe_contact_qr.png");
        assert_eq!(export_filename("A \t B", "van  Dyke"), "A_B_van_Dyke_contact_qr.png");
        // leading whitespace becomes an underscore too
        assert_eq!(export_filename(" Ann", "Lee"), "_Ann_Lee_contact_qr.png");
    }

    #[test]
    fn save_requires_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(None, "Jane", "Doe", dir.path()).unwrap_err();
        assert!(matches!(err, Error::ExportError(_)));
        assert!(!dir.path().join("Jane_Doe_contact_qr.png").exists());
    }

    #[test]
    fn save_writes_png_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let img = RenderedImage::from_encoded(&sample_png(40), PixelDimension(40)).unwrap();
        let path = save(Some(&img), "Mary Jane", "Smith", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Mary_Jane_Smith_contact_qr.png"));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, img.png_bytes());
    }

    #[test]
    fn save_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let img = RenderedImage::from_encoded(&sample_png(8), PixelDimension(8)).unwrap();
        let err = save(Some(&img), "a", "b", dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Other);
        assert_ne!(err.user_notice(), crate::error::EXPORT_NOTICE);
    }
}
