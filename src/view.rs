//! View controller: translates user intents into store calls and refreshed
//! projections.
//!
//! Holds no record state of its own. Every projection re-reads the store, so
//! what the user sees is always a projection of store state. The only thing
//! the controller owns is the currently rendered image asset, replaced
//! wholesale on each refresh.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::device::DeviceName;
use crate::error::{DkError, Result};
use crate::image_ops::{self, RenderedImage};
use crate::store::{DeviceStats, DeviceStore};

/// Projection of one device record for display.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    /// ASCII slug for the device.
    pub device: DeviceName,
    /// Canonical label.
    pub label: &'static str,
    /// Stored description.
    pub text_content: Option<String>,
    /// True if an image blob is stored.
    pub has_image: bool,
    /// Size of the stored blob in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_bytes: Option<usize>,
    /// Provenance path recorded at import time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    /// Last mutation time.
    pub last_updated: DateTime<Utc>,
}

/// Projection of a rendered image for display.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    /// Device the preview belongs to.
    pub label: &'static str,
    /// Rendered (display) dimensions.
    pub width: u32,
    /// Rendered (display) dimensions.
    pub height: u32,
    /// Dimensions of the stored original.
    pub source_width: u32,
    /// Dimensions of the stored original.
    pub source_height: u32,
    /// Where the preview file was written, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

/// Maps the user intents onto the record store.
pub struct ViewController {
    store: DeviceStore,
    /// Strong reference to the asset currently on display; replaced wholesale
    /// on every refresh.
    current_preview: Option<RenderedImage>,
}

impl ViewController {
    /// Wraps an opened store.
    #[must_use]
    pub fn new(store: DeviceStore) -> Self {
        Self {
            store,
            current_preview: None,
        }
    }

    /// The overview screen: per-device has-text/has-image summary.
    pub fn overview(&self) -> Result<Vec<DeviceStats>> {
        self.store.stats()
    }

    /// Re-reads one record from the store.
    pub fn show(&self, device: DeviceName) -> Result<RecordView> {
        let record = self.store.get(device)?;
        Ok(RecordView {
            device,
            label: record.label,
            has_image: record.has_image(),
            image_bytes: record.image_len(),
            image_path: record.image_path,
            text_content: record.text_content,
            last_updated: record.last_updated,
        })
    }

    /// Raw stored image bytes, for callers that embed the blob in output.
    pub fn image_bytes(&self, device: DeviceName) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(device)?.image_data)
    }

    /// Intent: edit text. Persists synchronously, then refreshes.
    #[instrument(skip(self, text))]
    pub fn edit_text(&self, device: DeviceName, text: &str) -> Result<RecordView> {
        self.store.set_text(device, text)?;
        self.show(device)
    }

    /// Intent: load text from a file. Reads the file wholesale as UTF-8 and
    /// stores it through the same path as a manual edit.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_text_file(&self, device: DeviceName, path: &Path) -> Result<RecordView> {
        let bytes = read_input_file(path)?;
        let text = String::from_utf8(bytes).map_err(|_| DkError::InputNotUtf8 {
            path: path.display().to_string(),
        })?;

        info!(device = %device, chars = text.chars().count(), "Importing text file");
        self.store.set_text(device, &text)?;
        self.show(device)
    }

    /// Intent: load an image from a file. Stores the raw bytes verbatim with
    /// the source path as provenance; no decode happens on import.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_image_file(&self, device: DeviceName, path: &Path) -> Result<RecordView> {
        let bytes = read_input_file(path)?;
        info!(device = %device, bytes = bytes.len(), "Importing image file");
        self.store.set_image(device, &bytes, Some(path))?;
        self.show(device)
    }

    /// Intent: view image. Decodes the stored blob and resizes it into the
    /// display box; the rendered asset is kept alive on the controller until
    /// the next refresh. Stored bytes are never mutated.
    #[instrument(skip(self))]
    pub fn view_image(
        &mut self,
        device: DeviceName,
        max_w: u32,
        max_h: u32,
    ) -> Result<&RenderedImage> {
        let record = self.store.get(device)?;
        let Some(bytes) = record.image_data else {
            return Err(DkError::NoImage {
                device: device.label().to_string(),
            });
        };

        let rendered = image_ops::render_preview(&bytes, max_w, max_h)?;
        debug!(
            device = %device,
            width = rendered.width,
            height = rendered.height,
            "Preview rendered"
        );
        Ok(self.current_preview.insert(rendered))
    }

    /// Removes the stored image; the blob field is nulled, the row stays.
    #[instrument(skip(self))]
    pub fn clear_image(&mut self, device: DeviceName) -> Result<RecordView> {
        self.store.clear_image(device)?;
        self.current_preview = None;
        self.show(device)
    }

    /// Intent: reset to default text.
    #[instrument(skip(self))]
    pub fn reset_text(&self, device: DeviceName) -> Result<RecordView> {
        self.store.reset_text(device)?;
        self.show(device)
    }

    /// Full factory reset: every row deleted and reseeded with defaults.
    #[instrument(skip(self))]
    pub fn factory_reset(&mut self) -> Result<Vec<DeviceStats>> {
        self.store.clear_all()?;
        self.current_preview = None;
        self.overview()
    }

    /// Exports a timestamped copy of the database file.
    pub fn export(&self, dest_dir: &Path) -> Result<PathBuf> {
        self.store.export_snapshot(dest_dir)
    }

    /// The rendered asset currently on display, if any.
    #[must_use]
    pub fn current_preview(&self) -> Option<&RenderedImage> {
        self.current_preview.as_ref()
    }
}

fn read_input_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(DkError::InputFileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read(path)?)
}
