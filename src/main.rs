//! devkeep CLI - browse and maintain a fixed set of device records.
//!
//! Each invocation is one user intent: one store operation, then one
//! refreshed projection of store state.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use base64::Engine as _;
use clap::Parser;
use console::style;
use serde::Serialize;

use devkeep::cli::{self, Cli, Commands};
use devkeep::error::{DkError, Result};
use devkeep::logging::init_logging;
use devkeep::store::DeviceStore;
use devkeep::view::{PreviewView, RecordView, ViewController};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const NAME: &str = env!("CARGO_PKG_NAME");
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Run the command
    let result = run(&cli);

    // Handle errors
    if let Err(e) = result {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::List(args)) => cmd_list(cli, args),
        Some(Commands::Show(args)) => cmd_show(cli, args),
        Some(Commands::View(args)) => cmd_view(cli, args),
        Some(Commands::SetText(args)) => cmd_set_text(cli, args),
        Some(Commands::ImportText(args)) => cmd_import_text(cli, args),
        Some(Commands::ImportImage(args)) => cmd_import_image(cli, args),
        Some(Commands::ClearImage(args)) => cmd_clear_image(cli, args),
        Some(Commands::ResetText(args)) => cmd_reset_text(cli, args),
        Some(Commands::ClearAll(args)) => cmd_clear_all(cli, args),
        Some(Commands::Export(args)) => cmd_export(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

/// Opens the store (per --db or the default location) and wraps it.
fn open_controller(cli: &Cli) -> Result<ViewController> {
    let store = match &cli.db {
        Some(path) => DeviceStore::open(path)?,
        None => DeviceStore::open_default()?,
    };
    Ok(ViewController::new(store))
}

// === Quick Start ===

/// Prints quick-start help for humans or JSON for scripts.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: build_info::NAME,
        version: build_info::VERSION,
        description: "Per-device descriptions and images in one local SQLite table",
        browse: RobotBrowse {
            overview: "devkeep list --robot",
            record: "devkeep show <DEVICE> --robot",
            record_with_blob: "devkeep show <DEVICE> --include-image --robot",
            preview: "devkeep view <DEVICE> --out preview.png",
        },
        edit: RobotEdit {
            set_text: "devkeep set-text <DEVICE> <TEXT>",
            import_text: "devkeep import-text <DEVICE> <FILE>",
            import_image: "devkeep import-image <DEVICE> <FILE>",
            clear_image: "devkeep clear-image <DEVICE>",
            reset_text: "devkeep reset-text <DEVICE>",
        },
        maintenance: RobotMaintenance {
            factory_reset: "devkeep clear-all --yes",
            export_backup: "devkeep export [DEST_DIR]",
        },
        devices: devkeep::device::DeviceName::ALL
            .iter()
            .map(|d| RobotDevice {
                label: d.label(),
                slug: d.slug(),
            })
            .collect(),
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
    };

    println!("{}", serde_json::to_string_pretty(&help).unwrap());
}

fn print_human_quick_start() {
    println!(
        "{} {} - device dossier\n",
        style(build_info::NAME).bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  Overview of every device", style("devkeep list").green());
    println!(
        "  {}  Show one record",
        style("devkeep show cameras").green()
    );
    println!(
        "  {}  Save a description",
        style("devkeep set-text thermometer \"...\"").green()
    );
    println!(
        "  {}  Attach an image",
        style("devkeep import-image cameras photo.png").green()
    );
    println!(
        "  {}  Render a bounded preview",
        style("devkeep view cameras -o preview.png").green()
    );
    println!(
        "  {}  Timestamped database backup",
        style("devkeep export backups/").green()
    );
    println!();

    println!("{}", style("DEVICES").bold().underlined());
    println!();
    for device in devkeep::device::DeviceName::ALL {
        println!("  {:<16} {}", device.slug(), style(device.label()).dim());
    }
    println!();

    println!(
        "Run {} for full help",
        style("devkeep --help").yellow()
    );
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    browse: RobotBrowse,
    edit: RobotEdit,
    maintenance: RobotMaintenance,
    devices: Vec<RobotDevice>,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotBrowse {
    overview: &'static str,
    record: &'static str,
    record_with_blob: &'static str,
    preview: &'static str,
}

#[derive(Serialize)]
struct RobotEdit {
    set_text: &'static str,
    import_text: &'static str,
    import_image: &'static str,
    clear_image: &'static str,
    reset_text: &'static str,
}

#[derive(Serialize)]
struct RobotMaintenance {
    factory_reset: &'static str,
    export_backup: &'static str,
}

#[derive(Serialize)]
struct RobotDevice {
    label: &'static str,
    slug: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_list(cli: &Cli, args: &cli::ListArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let stats = ctl.overview()?;

    if cli.use_json() {
        output_json(cli, &stats);
    } else {
        for s in &stats {
            let text_mark = if s.text_chars > 0 {
                style("✓").green()
            } else {
                style("✗").red()
            };
            let image_mark = if s.has_image {
                style("✓").green()
            } else {
                style("✗").red()
            };
            if args.long {
                println!(
                    "{:<20} text {text_mark} ({} chars)  image {image_mark}  updated {}",
                    s.label,
                    s.text_chars,
                    s.last_updated.format("%Y-%m-%d %H:%M:%S")
                );
            } else {
                println!("{:<20} text {text_mark}  image {image_mark}", s.label);
            }
        }
    }
    Ok(())
}

fn cmd_show(cli: &Cli, args: &cli::ShowArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let view = ctl.show(args.device)?;

    if cli.use_json() {
        if args.include_image {
            let blob = ctl.image_bytes(args.device)?;
            let encoded = blob
                .as_deref()
                .map(|b| base64::engine::general_purpose::STANDARD.encode(b));
            output_json(
                cli,
                &serde_json::json!({
                    "record": view,
                    "image_base64": encoded,
                }),
            );
        } else {
            output_json(cli, &view);
        }
    } else {
        print_record(&view);
    }
    Ok(())
}

fn cmd_view(cli: &Cli, args: &cli::ViewArgs) -> Result<()> {
    let mut ctl = open_controller(cli)?;
    let rendered = ctl.view_image(args.device, args.max_width, args.max_height)?;

    let preview = PreviewView {
        label: args.device.label(),
        width: rendered.width,
        height: rendered.height,
        source_width: rendered.source_width,
        source_height: rendered.source_height,
        saved_to: args.out.clone(),
    };

    if let Some(out) = &args.out {
        rendered.save(out)?;
    }

    if cli.use_json() {
        output_json(cli, &preview);
    } else if !cli.quiet {
        println!(
            "{}: {}x{} (original {}x{})",
            preview.label,
            preview.width,
            preview.height,
            preview.source_width,
            preview.source_height
        );
        if let Some(out) = &preview.saved_to {
            println!("Preview written to {}", style(out.display()).green());
        }
    }
    Ok(())
}

fn cmd_set_text(cli: &Cli, args: &cli::SetTextArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let view = ctl.edit_text(args.device, &args.text)?;

    if cli.use_json() {
        output_json(cli, &view);
    } else if !cli.quiet {
        println!("Text for {} saved", style(view.label).bold());
    }
    Ok(())
}

fn cmd_import_text(cli: &Cli, args: &cli::ImportTextArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let view = ctl.import_text_file(args.device, &args.file)?;

    if cli.use_json() {
        output_json(cli, &view);
    } else if !cli.quiet {
        println!(
            "Text for {} loaded from {}",
            style(view.label).bold(),
            args.file.display()
        );
    }
    Ok(())
}

fn cmd_import_image(cli: &Cli, args: &cli::ImportImageArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let view = ctl.import_image_file(args.device, &args.file)?;

    if cli.use_json() {
        output_json(cli, &view);
    } else if !cli.quiet {
        println!(
            "Image for {} saved ({} bytes)",
            style(view.label).bold(),
            view.image_bytes.unwrap_or(0)
        );
    }
    Ok(())
}

fn cmd_clear_image(cli: &Cli, args: &cli::ClearImageArgs) -> Result<()> {
    let mut ctl = open_controller(cli)?;
    let view = ctl.clear_image(args.device)?;

    if cli.use_json() {
        output_json(cli, &view);
    } else if !cli.quiet {
        println!("Image for {} removed", style(view.label).bold());
    }
    Ok(())
}

fn cmd_reset_text(cli: &Cli, args: &cli::ResetTextArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let view = ctl.reset_text(args.device)?;

    if cli.use_json() {
        output_json(cli, &view);
    } else if !cli.quiet {
        println!("Text for {} reset to default", style(view.label).bold());
    }
    Ok(())
}

fn cmd_clear_all(cli: &Cli, args: &cli::ClearAllArgs) -> Result<()> {
    if !args.yes {
        return Err(DkError::Other(
            "Refusing to clear the whole database; pass --yes to confirm".to_string(),
        ));
    }

    let mut ctl = open_controller(cli)?;
    let stats = ctl.factory_reset()?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "cleared": true, "devices": stats }));
    } else if !cli.quiet {
        println!(
            "{}",
            style("Database cleared, defaults restored").yellow()
        );
    }
    Ok(())
}

fn cmd_export(cli: &Cli, args: &cli::ExportArgs) -> Result<()> {
    let ctl = open_controller(cli)?;
    let backup = ctl.export(&args.dest)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "backup": backup.display().to_string(), "ok": true }),
        );
    } else if !cli.quiet {
        println!("Database exported to {}", style(backup.display()).green());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "name": build_info::NAME,
                "version": build_info::VERSION,
            }),
        );
    } else {
        println!("{} {}", build_info::NAME, build_info::VERSION);
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "devkeep", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn print_record(view: &RecordView) {
    println!("{}", style(view.label).bold().cyan());
    println!(
        "{}: {}",
        style("Updated").bold(),
        view.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match view.image_bytes {
        Some(len) => {
            println!("{}: {len} bytes", style("Image").bold());
            if let Some(path) = &view.image_path {
                println!("{}: {}", style("Source").bold(), path.display());
            }
        }
        None => println!("{}: none", style("Image").bold()),
    }
    println!();
    match view.text_content.as_deref() {
        Some(text) if !text.is_empty() => println!("{text}"),
        _ => println!("{}", style("(no description)").dim()),
    }
}

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &DkError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
