mod branch;
mod canvas;
mod config;
mod engine;
mod fern;
mod help;
mod noise;
mod scheduler;
mod settings;
mod shade;
mod svg;
mod terminal;

use clap::{Parser, Subcommand};
use config::{GrowConfig, PrintConfig, SvgConfig};
use settings::Settings;
use std::io;
use std::path::PathBuf;

// Hard ceiling on the generation cap: tips quadruple per generation, so
// anything past this buries the sink in primitives.
const MAX_GENERATION_CAP: u32 = 10;

#[derive(Parser)]
#[command(name = "fernart")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal-based generative art: a fern fractal grown one generation per keypress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a fern interactively, one generation per spacebar press
    Grow {
        /// Branch angle in degrees
        #[arg(short, long)]
        angle: Option<f64>,

        /// Generation cap (0-10); one more growth than this succeeds
        #[arg(short, long)]
        generations: Option<u32>,

        /// Cooldown between accepted presses, in seconds
        #[arg(short, long)]
        cooldown: Option<f64>,

        /// Advance generations on a timer instead of keypresses
        #[arg(long)]
        auto: bool,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Grow the whole fern at once and print it to stdout
    Print {
        /// Branch angle in degrees
        #[arg(short, long)]
        angle: Option<f64>,

        /// Number of generations to grow (0-10)
        #[arg(short, long)]
        generations: Option<u32>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Grow the fern into an SVG document
    Svg {
        /// Branch angle in degrees
        #[arg(short, long)]
        angle: Option<f64>,

        /// Number of generations to grow (0-10)
        #[arg(short, long)]
        generations: Option<u32>,

        /// Canvas width in pixels
        #[arg(short = 'W', long, default_value = "800")]
        width: f64,

        /// Canvas height in pixels
        #[arg(short = 'H', long, default_value = "600")]
        height: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    // Flags win over the settings file, the settings file over built-ins.
    let angle_of = |flag: Option<f64>| flag.or(settings.fern.angle).unwrap_or(engine::DEFAULT_ANGLE);
    let generations_of = |flag: Option<u32>| {
        flag.or(settings.fern.generations)
            .unwrap_or(scheduler::DEFAULT_MAX_GENERATIONS)
            .min(MAX_GENERATION_CAP)
    };

    match cli.command {
        Commands::Grow {
            angle,
            generations,
            cooldown,
            auto,
            seed,
        } => {
            let config = GrowConfig {
                seed,
                angle: angle_of(angle),
                max_generations: generations_of(generations),
                cooldown: cooldown
                    .or(settings.fern.cooldown)
                    .unwrap_or(scheduler::DEFAULT_COOLDOWN.as_secs_f64()),
                auto,
            };
            fern::run_grow(config)?;
        }
        Commands::Print {
            angle,
            generations,
            seed,
        } => {
            let config = PrintConfig {
                seed,
                angle: angle_of(angle),
                // The scheduler cap counts one more growth than its index cap.
                generations: generations_of(generations) + 1,
            };
            fern::run_print(config)?;
        }
        Commands::Svg {
            angle,
            generations,
            width,
            height,
            output,
            seed,
        } => {
            let config = SvgConfig {
                seed,
                angle: angle_of(angle),
                generations: generations_of(generations) + 1,
                width,
                height,
                output,
            };
            fern::run_svg(config)?;
        }
    }

    Ok(())
}
