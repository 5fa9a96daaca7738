//! Presentation-only image handling.
//!
//! Decodes stored blobs and resizes them for on-screen display. The stored
//! bytes are never touched; resizing produces a separate rendered asset that
//! the view owns for as long as it is displayed.

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::error::{DkError, Result};

/// Maximum display box for inline thumbnails (from the reference build).
pub const THUMBNAIL_BOX: (u32, u32) = (350, 250);

/// Maximum display box for the full-size viewer window.
pub const FULL_VIEW_BOX: (u32, u32) = (550, 400);

/// A decoded, display-ready image.
///
/// Owns its pixels; the view replaces it wholesale on refresh so the
/// rendered asset lives exactly as long as something displays it.
#[derive(Debug)]
pub struct RenderedImage {
    /// Resized pixels, bounded to the requested display box.
    pub image: DynamicImage,
    /// Dimensions of the rendered asset.
    pub width: u32,
    /// Dimensions of the rendered asset.
    pub height: u32,
    /// Dimensions of the stored original.
    pub source_width: u32,
    /// Dimensions of the stored original.
    pub source_height: u32,
}

impl RenderedImage {
    /// Writes the rendered asset to a file; format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image
            .save(path.as_ref())
            .map_err(|e| DkError::ImageDecode(format!("Failed to write preview: {e}")))
    }
}

/// Decodes raw blob bytes into pixels.
///
/// # Errors
///
/// Returns `DkError::ImageDecode` for malformed or unsupported bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| DkError::ImageDecode(e.to_string()))
}

/// Computes dimensions that fit `(width, height)` within the display box
/// while preserving aspect ratio. Never upscales.
#[must_use]
pub fn fit_box(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(max_w) / f64::from(width),
        f64::from(max_h) / f64::from(height),
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fitted = (
        ((f64::from(width) * ratio) as u32).max(1),
        ((f64::from(height) * ratio) as u32).max(1),
    );
    fitted
}

/// Decodes stored bytes and bounds the result to a display box.
///
/// The original blob is left untouched; only the returned asset is resized.
pub fn render_preview(bytes: &[u8], max_w: u32, max_h: u32) -> Result<RenderedImage> {
    let original = decode(bytes)?;
    let (source_width, source_height) = original.dimensions();
    let (target_w, target_h) = fit_box(source_width, source_height, max_w, max_h);

    let image = if (target_w, target_h) == (source_width, source_height) {
        original
    } else {
        original.resize(target_w, target_h, image::imageops::FilterType::Lanczos3)
    };

    let (width, height) = image.dimensions();
    Ok(RenderedImage {
        image,
        width,
        height,
        source_width,
        source_height,
    })
}
