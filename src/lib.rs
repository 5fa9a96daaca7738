//! devkeep library - local device dossier over a single SQLite table.
//!
//! This library exposes the core functionality of the `devkeep` CLI for use
//! in tests and potentially other applications.
//!
//! # Modules
//!
//! - `device`: The fixed device set and its default descriptions
//! - `store`: Record store over one SQLite connection
//! - `view`: View controller mapping user intents to store calls
//! - `image_ops`: Presentation-only image decode and resize
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod device;
pub mod error;
pub mod image_ops;
pub mod logging;
pub mod store;
pub mod view;
