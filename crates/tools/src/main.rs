use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog::{BUILTIN, DomainId};
use choreography::{ChoreographyConfig, ResolvedConfig};
use clap::{Parser, Subcommand};
use tools::{SimOptions, simulate_intro, simulate_loader, simulate_split, sweep_scroll};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless runs of the site choreography")]
struct Args {
    /// JSON choreography config (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frame interval in milliseconds
    #[arg(long, default_value_t = 16.667)]
    frame_ms: f64,

    /// Stop the simulation after this many milliseconds
    #[arg(long, default_value_t = 6000.0)]
    until_ms: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print intro phase transitions
    Intro,

    /// Print progress loader snapshots
    Loader {
        /// Domain whose loader messages are cycled
        #[arg(long, default_value = "backend")]
        domain: String,
    },

    /// Print split loader snapshots
    Split {
        #[arg(long, default_value = "backend")]
        domain: String,
    },

    /// Map scroll progress to domains and indicator state
    Resolve {
        /// A single progress value; sweeps [0, 1] when omitted
        progress: Option<f64>,

        /// Sweep resolution
        #[arg(long, default_value_t = 20)]
        steps: u32,
    },

    /// Check a config file and print its normalised form
    Validate { path: PathBuf },

    /// Print the built-in domain catalog
    Catalog,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let opts = sim_options(args.frame_ms, args.until_ms)?;

    let config = || load_config(args.config.as_ref());

    match &args.command {
        Command::Intro => emit(simulate_intro(&config()?, opts).to_json_lines()?),
        Command::Loader { domain } => {
            let trace = simulate_loader(&config()?, messages_for(domain)?, opts);
            emit(trace.to_json_lines()?)
        }
        Command::Split { domain } => {
            let trace = simulate_split(&config()?, messages_for(domain)?, opts);
            emit(trace.to_json_lines()?)
        }
        Command::Resolve { progress, steps } => cmd_resolve(&config()?, *progress, *steps),
        Command::Validate { path } => cmd_validate(path),
        Command::Catalog => {
            println!("{}", BUILTIN.to_json_pretty().map_err(|e| e.to_string())?);
            Ok(())
        }
    }
}

fn sim_options(frame_ms: f64, until_ms: f64) -> Result<SimOptions, String> {
    let dur = |name: &str, ms: f64| {
        Duration::try_from_secs_f64(ms / 1000.0).map_err(|e| format!("--{name}: {e}"))
    };
    let frame = dur("frame-ms", frame_ms)?;
    if frame.is_zero() {
        return Err("--frame-ms must be positive".to_string());
    }
    Ok(SimOptions {
        frame,
        until: dur("until-ms", until_ms)?,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<ResolvedConfig, String> {
    let config = match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|e| format!("read {}: {e}", p.display()))?;
            ChoreographyConfig::from_json(&raw).map_err(|e| e.to_string())?
        }
        None => ChoreographyConfig::default(),
    };
    config.validate().map_err(|e| e.to_string())
}

fn messages_for(domain: &str) -> Result<Vec<String>, String> {
    let id = domain.parse::<DomainId>().map_err(|e| e.to_string())?;
    Ok(BUILTIN.loader_messages(id).to_vec())
}

fn emit(lines: String) -> Result<(), String> {
    print!("{lines}");
    Ok(())
}

fn cmd_resolve(config: &ResolvedConfig, progress: Option<f64>, steps: u32) -> Result<(), String> {
    match progress {
        Some(p) => println!("{}", config.ranges.resolve(p)),
        None => {
            for row in sweep_scroll(config, steps) {
                println!("{}", serde_json::to_string(&row).map_err(|e| e.to_string())?);
            }
        }
    }
    Ok(())
}

fn cmd_validate(path: &Path) -> Result<(), String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    let config = ChoreographyConfig::from_json(&raw).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    info!(path = %path.display(), "config ok");
    println!("{}", config.to_json_pretty().map_err(|e| e.to_string())?);
    Ok(())
}
