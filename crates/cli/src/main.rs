mod console;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use j1939_core::{DataRepository, FreezeFrame, Lookup, ModuleInfo, Packet, VehicleInformation};
use orchestrator::{TableA1Validator, TableA2ValueValidator, VerifierConfig};

use crate::console::ConsoleListener;

#[derive(Parser)]
#[command(name = "j1939-verifier")]
#[command(about = "Heavy-duty OBD compliance checks over decoded J1939 captures", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding .j1939-verifier/config.json
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Print part and step names
    Names {
        #[arg(long)]
        part: Option<u8>,
    },
    /// Run the Table A-1 data stream checks over a capture
    Validate {
        /// JSON array of decoded packets
        #[arg(long)]
        packets: PathBuf,

        /// JSON array of OBD modules and their supported SPNs
        #[arg(long)]
        modules: Option<PathBuf>,

        #[arg(long)]
        part: u8,

        #[arg(long)]
        step: u8,

        /// Procedure section, defaults to 6.<part>.<step>
        #[arg(long)]
        section: Option<String>,

        /// The engine was running while the capture was taken
        #[arg(long)]
        engine_on: bool,
    },
    /// Run the Table A-2 range checks over freeze frames
    FreezeFrames {
        /// JSON array of freeze frames with resolved signals
        #[arg(long)]
        frames: PathBuf,

        #[arg(long)]
        part: u8,

        #[arg(long)]
        step: u8,

        #[arg(long)]
        citation: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Init => init(&cli.config_dir).await,
        Commands::Names { part } => names(part),
        Commands::Validate {
            packets,
            modules,
            part,
            step,
            section,
            engine_on,
        } => {
            let section = section.unwrap_or_else(|| format!("6.{}.{}", part, step));
            validate(&cli.config_dir, &packets, modules.as_deref(), part, step, &section, engine_on).await
        }
        Commands::FreezeFrames {
            frames,
            part,
            step,
            citation,
        } => freeze_frames(&cli.config_dir, &frames, part, step, &citation).await,
    }
}

async fn init(config_dir: &Path) -> Result<()> {
    let config = VerifierConfig::read(config_dir).await;
    config
        .write(config_dir)
        .await
        .with_context(|| format!("Failed to write config under {}", config_dir.display()))?;
    println!("Wrote {}", config_dir.join(".j1939-verifier/config.json").display());
    Ok(())
}

fn names(part: Option<u8>) -> Result<()> {
    let parts: Vec<u8> = match part {
        Some(part) if part as usize > Lookup::part_count() || part == 0 => {
            bail!("Unknown part {}", part)
        }
        Some(part) => vec![part],
        None => (1..=Lookup::part_count() as u8).collect(),
    };

    for part in parts {
        println!("{}", format!("Part {}: {}", part, Lookup::part_name(part as i32)).bold());
        for step in 1..=Lookup::step_count(part as i32) as i32 {
            println!("  {}.{}. {}", part, step, Lookup::step_name(part as i32, step));
        }
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn repository(config_dir: &Path) -> (DataRepository, VerifierConfig) {
    let config = VerifierConfig::read(config_dir).await;
    let repository = DataRepository::new();
    repository.set_vehicle_information(VehicleInformation {
        fuel_type: config.fuel_type,
        ..Default::default()
    });
    (repository, config)
}

async fn validate(
    config_dir: &Path,
    packets: &Path,
    modules: Option<&Path>,
    part: u8,
    step: u8,
    section: &str,
    engine_on: bool,
) -> Result<()> {
    let (repository, _config) = repository(config_dir).await;
    if let Some(modules) = modules {
        let modules: Vec<ModuleInfo> = read_json(modules).await?;
        for module in modules {
            repository.put_module(module);
        }
    }
    let packets: Vec<Packet> = read_json(packets).await?;
    tracing::info!(packets = packets.len(), part, step, section, "Validating capture");

    let listener = ConsoleListener::new();
    let validator = TableA1Validator::new(repository);
    validator.report_duplicate_spns(&packets, &listener, part, step, section);
    for packet in &packets {
        validator.report_non_obd_module_provided_spns(packet, &listener, part, step, section);
    }
    for packet in &packets {
        validator.report_implausible_spn_values(packet, &listener, engine_on, part, step, section);
    }

    summary(&listener);
    Ok(())
}

async fn freeze_frames(config_dir: &Path, frames: &Path, part: u8, step: u8, citation: &str) -> Result<()> {
    let (_repository, config) = repository(config_dir).await;
    let frames: Vec<FreezeFrame> = read_json(frames).await?;
    tracing::info!(frames = frames.len(), part, step, "Checking freeze frames");

    let listener = ConsoleListener::new();
    let validator = TableA2ValueValidator::new(part, step)
        .with_engine_speed_threshold(config.engine_speed_threshold_rpm);
    for frame in &frames {
        println!("{}", frame);
        validator.report_warnings(frame, &listener, citation);
    }

    summary(&listener);
    Ok(())
}

fn summary(listener: &ConsoleListener) {
    println!();
    println!(
        "{} failures, {} warnings, {} info",
        listener.failures(),
        listener.warnings(),
        listener.infos()
    );
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
