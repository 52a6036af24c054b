//! Fold CLI
//!
//! Drive the fold carousel engine headlessly and inspect its configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fold_layout::CarouselConfig;

mod simulate;

use simulate::{Simulation, SimulationReport};

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "fold.toml";

#[derive(Parser)]
#[command(name = "fold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fold carousel simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Carousel config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in config used when no file is given
    #[arg(long, global = true, value_enum, default_value = "standard")]
    preset: Preset,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Standard,
    Compact,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a carousel, replay drags and print every settled frame
    Simulate {
        /// Number of items in the data set
        #[arg(short = 'n', long, default_value = "21")]
        items: usize,

        /// Measured item width in pixels
        #[arg(long, default_value = "200")]
        item_width: i32,

        /// Measured item height in pixels
        #[arg(long, default_value = "300")]
        item_height: i32,

        /// Viewport width in pixels
        #[arg(long, default_value = "800")]
        viewport: i32,

        /// Viewport height in pixels
        #[arg(long, default_value = "400")]
        viewport_height: i32,

        /// Drag distance; repeat for several drags (positive moves content left)
        #[arg(short, long, allow_negative_numbers = true)]
        drag: Vec<i32>,

        /// Jump to this index before dragging
        #[arg(short, long)]
        jump: Option<usize>,

        /// Frame interval for animation ticks (ms)
        #[arg(long, default_value = "16")]
        frame_ms: f32,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref(), cli.preset)?;

    match cli.command {
        Commands::Simulate {
            items,
            item_width,
            item_height,
            viewport,
            viewport_height,
            drag,
            jump,
            frame_ms,
        } => cmd_simulate(
            config,
            Simulation {
                items,
                item_width,
                item_height,
                viewport_width: viewport,
                viewport_height,
                drags: drag,
                jump,
                frame_ms,
            },
        ),

        Commands::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>, preset: Preset) -> Result<CarouselConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        }
    };

    match path {
        Some(path) => {
            info!("Using config {}", path.display());
            CarouselConfig::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))
        }
        None => Ok(match preset {
            Preset::Standard => CarouselConfig::standard(),
            Preset::Compact => CarouselConfig::compact(),
        }),
    }
}

fn cmd_simulate(config: CarouselConfig, simulation: Simulation) -> Result<()> {
    if simulation.frame_ms <= 0.0 {
        anyhow::bail!("--frame-ms must be positive, got {}", simulation.frame_ms);
    }
    if simulation.item_width <= 0 || simulation.viewport_width <= 0 {
        anyhow::bail!("item width and viewport width must be positive");
    }

    info!(
        "Simulating {} items of {}x{} in a {}px viewport",
        simulation.items, simulation.item_width, simulation.item_height, simulation.viewport_width
    );

    let report = simulation.run(config);
    print_report(&report);
    Ok(())
}

fn cmd_config(config: &CarouselConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{}", text);
    Ok(())
}

fn print_report(report: &SimulationReport) {
    for frame in &report.frames {
        println!(
            "{} (offset {}, {} frames)",
            frame.label, frame.offset, frame.ticks
        );
        if frame.items.is_empty() {
            println!("  (empty)");
        }
        for item in &frame.items {
            let rect = item.rect;
            println!(
                "  #{:<3} [{:>5}, {:>5}, {:>5}, {:>5}]  scale {:.3}  opacity {:.2}  pivot ({:.0}, {:.0})  z {}  {:?}",
                item.index,
                rect.left,
                rect.top,
                rect.right,
                rect.bottom,
                item.scale,
                item.opacity,
                item.pivot.x,
                item.pivot.y,
                item.z_order,
                item.edge,
            );
        }
        println!();
    }
    println!(
        "Instances: {} created, {} live",
        report.created, report.outstanding
    );
}
