//! Record types for the device store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::device::DeviceName;

/// A single device row as persisted in the store.
///
/// The image blob is always the original imported file content; display
/// resizing never touches it.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRecord {
    /// Which device this row belongs to.
    pub device: DeviceName,
    /// Canonical label (the database key).
    pub label: &'static str,
    /// Free-form description; None only for rows damaged externally.
    pub text_content: Option<String>,
    /// Raw bytes of the imported image file, if any.
    #[serde(skip_serializing)]
    pub image_data: Option<Vec<u8>>,
    /// Provenance path recorded when the image was imported.
    pub image_path: Option<PathBuf>,
    /// Bumped on every mutation.
    pub last_updated: DateTime<Utc>,
}

impl DeviceRecord {
    /// The freshly-seeded shape of a row: default text, no image.
    #[must_use]
    pub fn default_for(device: DeviceName) -> Self {
        Self {
            device,
            label: device.label(),
            text_content: Some(device.default_text().to_string()),
            image_data: None,
            image_path: None,
            last_updated: Utc::now(),
        }
    }

    /// True if an image blob is stored.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_data.is_some()
    }

    /// Size of the stored blob in bytes, if any.
    #[must_use]
    pub fn image_len(&self) -> Option<usize> {
        self.image_data.as_ref().map(Vec::len)
    }
}

/// Per-device summary backing the overview listing.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStats {
    /// Which device this row belongs to.
    pub device: DeviceName,
    /// Canonical label.
    pub label: &'static str,
    /// Number of characters in the stored description.
    pub text_chars: usize,
    /// True if an image blob is stored.
    pub has_image: bool,
    /// Last mutation time.
    pub last_updated: DateTime<Utc>,
}
