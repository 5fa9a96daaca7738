//! Persistent storage for device records.
//!
//! One SQLite table keyed by device name, holding the description text and
//! the raw image blob for each device in the fixed set. The store self-heals
//! missing rows on every open, so callers can rely on one row existing per
//! device name.
//!
//! # Usage
//!
//! ```ignore
//! use devkeep::store::DeviceStore;
//! use devkeep::device::DeviceName;
//!
//! let store = DeviceStore::open_default()?;
//! store.set_text(DeviceName::Cameras, "4K, 25 fps")?;
//! let record = store.get(DeviceName::Cameras)?;
//! ```

mod db;
mod schema;

pub use db::{default_db_path, DeviceStore};
pub use schema::{DeviceRecord, DeviceStats};
