//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::device::DeviceName;
use crate::image_ops::THUMBNAIL_BOX;

/// devkeep - local device dossier: descriptions and images per device in one SQLite table.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "devkeep", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "DEVKEEP_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (repeat for more: -v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "DEVKEEP_DB", value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Browsing ===
    /// Overview of every device: has text, has image, last update
    List(ListArgs),

    /// Show one device record
    Show(ShowArgs),

    /// Render the stored image into a bounded preview
    View(ViewArgs),

    // === Editing ===
    /// Overwrite a device description (input is trimmed)
    SetText(SetTextArgs),

    /// Load a description from a UTF-8 text file
    ImportText(ImportTextArgs),

    /// Load an image file (bytes stored verbatim)
    ImportImage(ImportImageArgs),

    /// Remove the stored image for a device
    ClearImage(ClearImageArgs),

    /// Restore the built-in default description
    ResetText(ResetTextArgs),

    // === Maintenance ===
    /// Factory reset: delete every row and reseed defaults
    ClearAll(ClearAllArgs),

    /// Copy the database file to a timestamped backup
    Export(ExportArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show extended record information
    #[arg(long, short = 'l')]
    pub long: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,

    /// Embed the stored image as base64 (JSON output only)
    #[arg(long)]
    pub include_image: bool,
}

#[derive(Parser, Debug)]
pub struct ViewArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,

    /// Maximum preview width in pixels
    #[arg(long, default_value_t = THUMBNAIL_BOX.0)]
    pub max_width: u32,

    /// Maximum preview height in pixels
    #[arg(long, default_value_t = THUMBNAIL_BOX.1)]
    pub max_height: u32,

    /// Write the rendered preview to this file (format from extension)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SetTextArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,

    /// New description text
    pub text: String,
}

#[derive(Parser, Debug)]
pub struct ImportTextArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,

    /// UTF-8 text file to read wholesale
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ImportImageArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,

    /// Image file (PNG, JPEG, BMP, GIF); bytes stored as-is
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ClearImageArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,
}

#[derive(Parser, Debug)]
pub struct ResetTextArgs {
    /// Device name (Cyrillic label or ASCII slug)
    pub device: DeviceName,
}

#[derive(Parser, Debug)]
pub struct ClearAllArgs {
    /// Confirm the irreversible reset
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Destination directory for the backup copy
    #[arg(default_value = ".")]
    pub dest: PathBuf,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
