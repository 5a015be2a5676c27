//! Density Tiler
//!
//! Renders density heatmap tiles from a file of `lat,lng` points.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use renderer::KernelSpec;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use density_tiler::{pipeline, TilerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// Density heatmap tile renderer
#[derive(Parser, Debug)]
#[command(name = "density-tiler")]
#[command(about = "Render density heatmap tiles from a point file")]
struct Args {
    /// Point file (`lat,lng` per line), or `-` for stdin
    input: String,

    /// YAML configuration file
    #[arg(short, long, env = "DENSITY_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory for the tile tree
    #[arg(short, long, env = "DENSITY_OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Shallowest zoom level
    #[arg(long, env = "DENSITY_MIN_ZOOM")]
    min_zoom: Option<u32>,

    /// Deepest zoom level
    #[arg(long, env = "DENSITY_MAX_ZOOM")]
    max_zoom: Option<u32>,

    /// Intensity multiplier
    #[arg(long, env = "DENSITY_SCALE")]
    scale: Option<f64>,

    /// Use a radial kernel of this radius
    #[arg(long, env = "DENSITY_KERNEL_RADIUS")]
    kernel_radius: Option<u32>,

    /// Pixels beyond a tile edge that still feed the tile
    #[arg(long, env = "DENSITY_EDGE_MARGIN")]
    edge_margin: Option<u32>,

    /// Do not write manifest.json
    #[arg(long)]
    no_manifest: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "json", env = "DENSITY_LOG_FORMAT")]
    log_format: LogFormat,
}

impl Args {
    /// Layer command line overrides on top of the file (or default) config.
    fn resolve_config(&self) -> Result<TilerConfig> {
        let mut config = match &self.config {
            Some(path) => TilerConfig::from_file(path)?,
            None => TilerConfig::default(),
        };

        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if let Some(z) = self.min_zoom {
            config.min_zoom = z;
        }
        if let Some(z) = self.max_zoom {
            config.max_zoom = z;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(radius) = self.kernel_radius {
            config.kernel = KernelSpec::Radial { radius };
        }
        if let Some(margin) = self.edge_margin {
            config.edge_margin = Some(margin);
        }
        if self.no_manifest {
            config.write_manifest = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    let config = args.resolve_config()?;
    info!(input = %args.input, "Starting density tiler");

    let summary = if args.input == "-" {
        pipeline::run(&config, io::stdin().lock())?
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open point file {}", args.input))?;
        pipeline::run(&config, file)?
    };

    info!(
        tiles = summary.tiles.len(),
        accepted = summary.points_accepted,
        rejected = summary.points_rejected,
        parse_errors = summary.parse_errors,
        "Done"
    );
    Ok(())
}
