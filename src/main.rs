//! Contraption command line
//!
//! Runs a machine headless: print a snapshot, record the draw calls for a
//! frame, or check that random seeks replay identically.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use contraption::renderer::DrawList;
use contraption::{ConfigError, MachineSystem, Settings};

#[derive(Parser)]
#[command(name = "contraption")]
#[command(about = "Deterministic hamster-powered machine simulator")]
#[command(version)]
struct Cli {
    /// Settings file (JSON); flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Machine number (unsupported numbers select machine 1)
    #[arg(short, long, global = true)]
    machine: Option<i64>,

    /// Resources directory holding `images/`
    #[arg(short, long, global = true)]
    resources: Option<PathBuf>,

    /// Frames per second
    #[arg(short, long, global = true)]
    frame_rate: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate to a frame and print the machine snapshot as JSON
    Run {
        /// Timeline frame; the machine waits for the configured start frame
        #[arg(long, default_value = "90")]
        frame: u32,
    },

    /// Record the draw calls for one frame as JSON
    Draw {
        /// Timeline frame
        #[arg(long, default_value = "0")]
        frame: u32,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Seek to random frames, come back, and compare with a straight run
    Verify {
        /// Timeline frame to check
        #[arg(long, default_value = "90")]
        frame: u32,

        /// Number of random seeks before returning to `frame`
        #[arg(long, default_value = "20")]
        seeks: u32,

        #[arg(long, default_value = "1")]
        seed: u64,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(resources) = &cli.resources {
        settings.resources_dir = Some(resources.clone());
    }
    if let Some(number) = cli.machine {
        // Out-of-range numbers fall back when the machine is built
        settings.machine = u32::try_from(number).unwrap_or(0);
    }
    if let Some(frame_rate) = cli.frame_rate {
        settings.frame_rate = frame_rate;
    }
    settings.validate()?;
    Ok(settings)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(cli)?;
    let mut system = MachineSystem::from_settings(&settings)?;
    log::info!(
        "Machine {} at {} fps",
        system.machine_number(),
        system.frame_rate()
    );

    match &cli.command {
        Commands::Run { frame } => {
            system.set_timeline(*frame);
            println!("{}", serde_json::to_string_pretty(&system.snapshot())?);
        }
        Commands::Draw { frame, out } => {
            system.set_timeline(*frame);
            let mut list = DrawList::new();
            system.draw(&mut list);
            let json = serde_json::to_string_pretty(&list)?;
            match out {
                Some(path) => {
                    fs::write(path, json)?;
                    log::info!("Wrote {} draw calls to {}", list.commands.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Verify { frame, seeks, seed } => {
            let mut rng = Pcg32::seed_from_u64(*seed);
            let max_frame = frame.saturating_mul(2).max(1);
            for _ in 0..*seeks {
                let target = rng.random_range(0..=max_frame);
                log::debug!("Seeking to frame {target}");
                system.set_timeline(target);
            }
            system.set_timeline(*frame);

            let mut straight = MachineSystem::from_settings(&settings)?;
            straight.set_timeline(*frame);
            if system.snapshot() != straight.snapshot() {
                return Err(format!("frame {frame} diverged after {seeks} seeks").into());
            }
            println!("frame {frame} replayed identically after {seeks} seeks");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
