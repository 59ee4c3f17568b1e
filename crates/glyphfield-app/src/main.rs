use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use glyphfield_core::{FieldConfig, Rgba};
use glyphfield_platform::SurfaceSize;
use glyphfield_ui::{run_window, WindowOptions};

mod headless;

use crate::headless::{render_frames, RenderOptions};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "glyphfield", about = "Text drawn as a field of drifting particles")]
struct Cli {
    /// TOML or JSON field configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured text.
    #[arg(long, global = true)]
    text: Option<String>,
    /// Overrides the configured font, e.g. "bold 96px Inter, sans-serif".
    #[arg(long, global = true)]
    font: Option<String>,
    /// Fixes the RNG seed for a reproducible scatter.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Opens the field in a native window (default).
    Window {
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 200.0)]
        height: f32,
    },
    /// Runs the field without a window and writes frames as PNG.
    Render {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 120)]
        frames: u32,
        /// Save every n-th frame; the last frame is always saved.
        #[arg(long, default_value_t = 10)]
        every: u32,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 200)]
        height: u32,
        /// Drag a synthetic pointer across the middle third of the run.
        #[arg(long)]
        sweep: bool,
        #[arg(long, default_value = "#0b0b12")]
        background: Rgba,
    },
}

fn load_config(cli: &Cli) -> Result<FieldConfig, BoxError> {
    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::default(),
    };
    if let Some(text) = &cli.text {
        config.text = text.clone();
    }
    if let Some(font) = &cli.font {
        config.font = font.parse()?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), BoxError> {
    let config = load_config(&cli)?;
    match cli.command.unwrap_or(Command::Window {
        width: 800.0,
        height: 200.0,
    }) {
        Command::Window { width, height } => run_window(
            config,
            WindowOptions {
                width,
                height,
                ..WindowOptions::default()
            },
        ),
        Command::Render {
            out,
            frames,
            every,
            width,
            height,
            sweep,
            background,
        } => {
            let options = RenderOptions {
                out_dir: out,
                size: SurfaceSize::new(width, height),
                frames,
                every,
                sweep,
                background,
            };
            render_frames(config, &options).map(|_| ())
        }
    }
}

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Glyphfield starting");
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Glyphfield error: {e}");
        std::process::exit(1);
    }
}
