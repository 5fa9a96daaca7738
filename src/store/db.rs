//! SQLite operations for the device record store.
//!
//! One table, one row per device in the fixed set. The connection is opened
//! once at startup and released when the store is dropped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument, trace, warn};

use super::schema::{DeviceRecord, DeviceStats};
use crate::device::DeviceName;
use crate::error::{DkError, Result};

/// SQLite schema for device storage.
///
/// `device_name` is the primary key, which both enforces the one-row-per-name
/// invariant and provides the supporting index on the name column.
const SCHEMA_SQL: &str = r#"
-- One row per device in the fixed set
CREATE TABLE IF NOT EXISTS devices (
    device_name TEXT PRIMARY KEY,
    text_content TEXT,
    image_data BLOB,
    image_path TEXT,
    last_updated TEXT NOT NULL
);
"#;

/// Database wrapper for device records.
pub struct DeviceStore {
    conn: Connection,
    /// Backing file, None for in-memory stores.
    path: Option<PathBuf>,
}

impl DeviceStore {
    /// Opens or creates a database at the standard location.
    ///
    /// Location: `<platform data dir>/devkeep/devices.db`
    #[instrument]
    pub fn open_default() -> Result<Self> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Opens or creates a database at the given path.
    ///
    /// Runs schema creation and row reconciliation, so every name in the
    /// fixed set has a row by the time this returns.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DkError::Other(format!(
                        "Failed to create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        debug!(path = %path.display(), "Opening device database");
        let conn = Connection::open(path)?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.ensure_initialized()?;
        info!(path = %path.display(), "Device database ready");
        Ok(store)
    }

    /// Creates an in-memory database (useful for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.ensure_initialized()?;
        Ok(store)
    }

    /// Returns the backing file path, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates the schema if absent, then reconciles rows against the fixed
    /// device set, inserting defaults for any missing name.
    ///
    /// Idempotent; called on every open, so a row deleted externally comes
    /// back with default text on the next startup.
    pub fn ensure_initialized(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;

        let now = Utc::now().to_rfc3339();
        let mut seeded = 0usize;
        for device in DeviceName::ALL {
            let inserted = self.conn.execute(
                "INSERT OR IGNORE INTO devices (device_name, text_content, last_updated)
                 VALUES (?1, ?2, ?3)",
                params![device.label(), device.default_text(), now],
            )?;
            if inserted > 0 {
                trace!(device = %device, "Seeded default row");
                seeded += 1;
            }
        }

        if seeded > 0 {
            info!(seeded, "Reconciled missing device rows");
        }
        Ok(())
    }

    /// Loads the current row for a device.
    ///
    /// Falls back to the default-shaped record if the row is absent, which
    /// cannot happen after `ensure_initialized` short of external deletion
    /// mid-process.
    #[instrument(skip(self))]
    pub fn get(&self, device: DeviceName) -> Result<DeviceRecord> {
        let row = self
            .conn
            .query_row(
                "SELECT text_content, image_data, image_path, last_updated
                 FROM devices WHERE device_name = ?1",
                params![device.label()],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<Vec<u8>>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((text_content, image_data, image_path, last_updated)) = row else {
            warn!(device = %device, "Row missing, returning default record");
            return Ok(DeviceRecord::default_for(device));
        };

        Ok(DeviceRecord {
            device,
            label: device.label(),
            text_content,
            image_data,
            image_path: image_path.map(PathBuf::from),
            last_updated: parse_timestamp(&last_updated)?,
        })
    }

    /// Overwrites the description with the trimmed input and bumps
    /// `last_updated`. Upserts, so it also heals a missing row.
    #[instrument(skip(self, text))]
    pub fn set_text(&self, device: DeviceName, text: &str) -> Result<()> {
        let trimmed = text.trim();
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO devices (device_name, text_content, last_updated)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(device_name) DO UPDATE SET
                text_content = excluded.text_content,
                last_updated = excluded.last_updated",
            params![device.label(), trimmed, now],
        )?;
        debug!(device = %device, chars = trimmed.chars().count(), "Text saved");
        Ok(())
    }

    /// Stores image bytes verbatim plus the optional provenance path and
    /// bumps `last_updated`. The stored blob is always the original file
    /// content; display resizing happens elsewhere.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn set_image(
        &self,
        device: DeviceName,
        bytes: &[u8],
        provenance: Option<&Path>,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO devices (device_name, text_content, image_data, image_path, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(device_name) DO UPDATE SET
                image_data = excluded.image_data,
                image_path = excluded.image_path,
                last_updated = excluded.last_updated",
            params![
                device.label(),
                device.default_text(),
                bytes,
                provenance.map(|p| p.display().to_string()),
                now
            ],
        )?;
        info!(device = %device, bytes = bytes.len(), "Image saved");
        Ok(())
    }

    /// Nulls the image blob and its provenance path.
    #[instrument(skip(self))]
    pub fn clear_image(&self, device: DeviceName) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE devices
             SET image_data = NULL, image_path = NULL, last_updated = ?1
             WHERE device_name = ?2",
            params![now, device.label()],
        )?;
        if changed == 0 {
            // Row lost externally; reconcile restores the (image-less) default.
            self.ensure_initialized()?;
        }
        info!(device = %device, "Image cleared");
        Ok(())
    }

    /// Rewrites the description with the built-in default for this device.
    #[instrument(skip(self))]
    pub fn reset_text(&self, device: DeviceName) -> Result<()> {
        self.set_text(device, device.default_text())
    }

    /// Deletes every row and reseeds one default row per device, in a single
    /// transaction. The factory-reset path.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM devices", [])?;

        let now = Utc::now().to_rfc3339();
        for device in DeviceName::ALL {
            tx.execute(
                "INSERT INTO devices (device_name, text_content, last_updated)
                 VALUES (?1, ?2, ?3)",
                params![device.label(), device.default_text(), now],
            )?;
        }
        tx.commit()?;
        info!("Store cleared and reseeded with defaults");
        Ok(())
    }

    /// Per-device summary for the overview listing. Re-reads every row.
    #[instrument(skip(self))]
    pub fn stats(&self) -> Result<Vec<DeviceStats>> {
        let mut out = Vec::with_capacity(DeviceName::ALL.len());
        for device in DeviceName::ALL {
            let record = self.get(device)?;
            out.push(DeviceStats {
                device,
                label: device.label(),
                text_chars: record
                    .text_content
                    .as_deref()
                    .map_or(0, |t| t.chars().count()),
                has_image: record.has_image(),
                last_updated: record.last_updated,
            });
        }
        Ok(out)
    }

    /// Copies the database file to a timestamped backup inside `dest_dir`.
    ///
    /// The copy is named `<basename>_backup_<YYYYMMDD_HHMMSS>.<ext>`.
    /// Best-effort: fails if the source file is missing or the destination
    /// is unwritable, and is never offered for in-memory stores.
    #[instrument(skip(self), fields(dest = %dest_dir.display()))]
    pub fn export_snapshot(&self, dest_dir: &Path) -> Result<PathBuf> {
        let source = self.path.as_deref().ok_or_else(|| {
            DkError::Other("In-memory store has no file to export".to_string())
        })?;

        if !source.exists() {
            return Err(DkError::StoreFileMissing {
                path: source.display().to_string(),
            });
        }

        std::fs::create_dir_all(dest_dir).map_err(|e| DkError::ExportFailed {
            path: dest_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let backup = dest_dir.join(backup_file_name(source, Local::now().naive_local()));
        std::fs::copy(source, &backup).map_err(|e| DkError::ExportFailed {
            path: backup.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(backup = %backup.display(), "Database exported");
        Ok(backup)
    }
}

/// Builds `<basename>_backup_<YYYYMMDD_HHMMSS>.<ext>` for the given source.
fn backup_file_name(source: &Path, at: chrono::NaiveDateTime) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| "devices".to_string(), |s| s.to_string_lossy().into_owned());
    let ext = source
        .extension()
        .map_or_else(|| "db".to_string(), |e| e.to_string_lossy().into_owned());
    format!("{stem}_backup_{}.{ext}", at.format("%Y%m%d_%H%M%S"))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DkError::Other(format!("Invalid last_updated timestamp: {e}")))
}

/// Returns the default database path.
///
/// Location: `<platform data dir>/devkeep/devices.db`
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| DkError::Other("Could not determine local data directory".to_string()))?;
    Ok(data_dir.join("devkeep").join("devices.db"))
}
