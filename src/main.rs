use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use swipedeck::config::DeckConfig;
use swipedeck::deck::SwipeDeck;
use swipedeck::geometry::Viewport;
use swipedeck::logging::{init_logging, LogTarget, LoggingConfig};
use swipedeck::script::{replay, Script};
use swipedeck::ui::transcript::format_render_set;
use swipedeck::ui::{load_image, tui, CellImage, ColorMode, TranscriptRenderer};
use swipedeck::Result;

/// Output format for replay transcripts
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per event plus a summary
    #[default]
    Text,
    /// Structured JSON transcript
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "swipedeck")]
#[command(version)]
#[command(about = "Swipe through a stack of profile cards in the terminal")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Jump straight to release targets instead of animating
    #[arg(long, global = true)]
    no_animation: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive deck (default)
    Run,
    /// Replay a JSON gesture script without a terminal UI
    Replay {
        /// Path to the script
        script: PathBuf,

        /// Viewport width in reference units
        #[arg(long, value_parser = parse_extent)]
        width: Option<f64>,

        /// Viewport height in reference units
        #[arg(long, value_parser = parse_extent)]
        height: Option<f64>,

        /// Transcript format
        #[arg(long, short, default_value = "text", value_enum)]
        format: OutputFormat,
    },
    /// List the configured profiles
    Profiles {
        /// Print each profile picture
        #[arg(long)]
        preview: bool,

        /// Preview width in columns
        #[arg(long, default_value = "24", value_name = "COLUMNS")]
        preview_width: u16,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// A viewport extent: finite and greater than zero.
fn parse_extent(value: &str) -> std::result::Result<f64, String> {
    let extent: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !extent.is_finite() || extent <= 0.0 {
        return Err(format!("'{}' must be a finite number greater than 0", value));
    }
    Ok(extent)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let use_color = !cli.no_color && std::env::var("NO_COLOR").is_err();

    let mut config = DeckConfig::load(cli.config.as_deref())?;
    if cli.no_animation {
        config.motion.animate = false;
    }

    match cli.command {
        None | Some(Commands::Run) => {
            init_logging(LoggingConfig::for_terminal_ui(
                cli.verbose,
                cli.log_file.clone(),
            ))?;
            let stats = tui::run(&config)?;
            println!(
                "{} liked, {} noped, {} cancelled",
                stats.accepted, stats.rejected, stats.cancelled
            );
        }
        Some(Commands::Replay {
            ref script,
            width,
            height,
            format,
        }) => {
            init_logging(headless_logging(&cli, use_color))?;
            let defaults = Viewport::default();
            let viewport = Viewport::new(
                width.unwrap_or(defaults.width),
                height.unwrap_or(defaults.height),
            );
            let script = Script::load(script)?;
            let mut deck = SwipeDeck::from_config(&config, viewport)?;
            let transcript = replay(&mut deck, &script);
            match format {
                OutputFormat::Text => print!(
                    "{}",
                    TranscriptRenderer::new()
                        .with_colors(use_color)
                        .render(&transcript)
                ),
                OutputFormat::Json => println!("{}", transcript.to_json()?),
            }
        }
        Some(Commands::Profiles {
            preview,
            preview_width,
        }) => {
            init_logging(headless_logging(&cli, use_color))?;
            let deck = SwipeDeck::from_config(&config, Viewport::default())?;
            let set = deck.render_set();
            println!("profiles ({})", deck.profiles().len());
            for profile in deck.profiles().iter() {
                let role = if set.active == Some(profile.id) {
                    "active"
                } else if set.next == Some(profile.id) {
                    "next"
                } else {
                    ""
                };
                println!(
                    "{:>4}  {:<16} {:<24} {}",
                    profile.id,
                    profile.label(),
                    profile.image,
                    role
                );
                if preview {
                    print_preview(&profile.image, preview_width, use_color);
                }
            }
            println!("render set: {}", format_render_set(&set));
        }
        Some(Commands::Config) => {
            init_logging(headless_logging(&cli, use_color))?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Headless commands log to stderr unless a file is given.
fn headless_logging(cli: &Cli, use_color: bool) -> LoggingConfig {
    let config = LoggingConfig::from_verbosity(cli.verbose).with_colors(use_color);
    match &cli.log_file {
        Some(path) => config.with_log_target(LogTarget::File(path.clone())),
        None => config,
    }
}

fn print_preview(reference: &str, width: u16, use_color: bool) {
    if !use_color {
        return;
    }
    match load_image(reference) {
        Ok(img) => {
            let width = width.max(1);
            let rows = (width as u32 * img.height() / img.width().max(1) / 2).max(1);
            let cells = CellImage::from_image(&img, width, rows.min(u16::MAX as u32) as u16);
            let mode = if std::env::var("COLORTERM")
                .map(|v| v == "truecolor" || v == "24bit")
                .unwrap_or(false)
            {
                ColorMode::TrueColor
            } else {
                ColorMode::Color256
            };
            print!("{}", cells.to_ansi(mode));
        }
        Err(err) => {
            tracing::warn!(reference, error = %err, "no preview");
            println!("      (image unavailable)");
        }
    }
}
