use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

use datestamp::{Config, batch::process_directory};

#[derive(Parser, Debug)]
#[command(author, version, about = "Add date watermarks to photos based on EXIF data", long_about = None)]
struct Cli {
    /// Path to the directory containing images
    directory: PathBuf,

    /// Font size for the watermark text; 0 or omitted sizes it from the image width
    #[arg(long)]
    font_size: Option<u32>,

    /// Color of the watermark text (e.g. 'teal', '#FFFFFF', 'rgb(255,0,0)' or 'auto')
    #[arg(long)]
    color: Option<String>,

    /// Position of the watermark: top-left, top-right, bottom-left, bottom-right or center
    #[arg(long)]
    position: Option<String>,

    /// Optional TOML file with watermark, font and output settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG, when set, takes precedence over --log-level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) if path.exists() => match Config::load(path) {
            Ok(config) => {
                info!("Configuration loaded from: {:?}", path);
                config
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Some(path) => {
            info!("Config file not found at {:?}, using defaults", path);
            Config::default()
        }
        None => Config::default(),
    };

    if let Some(font_size) = cli.font_size {
        config.watermark.font_size = font_size;
    }
    if let Some(color) = cli.color {
        config.watermark.color = color;
    }
    if let Some(position) = cli.position {
        config.watermark.position = position;
    }

    let options = match config.batch_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let fonts = config.font_resolver();

    if let Err(e) = process_directory(&cli.directory, &options, &fonts) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
