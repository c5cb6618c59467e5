use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tools::{Preset, export_payload, inspect, load_map, lookup, parse_script, replay, to_json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Linked segment maps: inspect, replay and export")]
struct Args {
    /// Map preset
    #[arg(long, value_enum, default_value = "segments")]
    preset: Preset,

    /// JSON map config replacing the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input coordinates are lon/lat and get projected to Web Mercator
    #[arg(long)]
    project_lon_lat: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a dataset and its indices
    Inspect { input: PathBuf },

    /// Rows matching a lookup key
    Lookup { input: PathBuf, key: String },

    /// Replay a JSON event script through the controller
    Replay {
        input: PathBuf,
        script: PathBuf,

        /// Append the final view snapshot
        #[arg(long)]
        snapshot: bool,
    },

    /// Write the client payload for a browser-side runtime
    Export {
        input: PathBuf,

        /// Output file (stdout when absent)
        #[arg(long)]
        out: Option<PathBuf>,
    },
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
    let preset = args.preset;
    let config = args.config.as_deref();

    match args.command {
        Command::Inspect { input } => {
            let loaded = load_map(&input, preset, config, args.project_lon_lat)?;
            println!("{}", to_json(&inspect(&loaded))?);
        }
        Command::Lookup { input, key } => {
            let loaded = load_map(&input, preset, config, args.project_lon_lat)?;
            println!("{}", to_json(&lookup(&loaded.map, &key))?);
        }
        Command::Replay {
            input,
            script,
            snapshot,
        } => {
            let mut loaded = load_map(&input, preset, config, args.project_lon_lat)?;
            let text = fs::read_to_string(&script).map_err(|e| format!("read {script:?}: {e}"))?;
            let events = parse_script(&text)?;
            let report = replay(&mut loaded.map, events, snapshot);
            println!("{}", to_json(&report)?);
        }
        Command::Export { input, out } => {
            let loaded = load_map(&input, preset, config, args.project_lon_lat)?;
            let json = to_json(&export_payload(&loaded))?;
            match out {
                Some(path) => {
                    fs::write(&path, json).map_err(|e| format!("write {path:?}: {e}"))?;
                    info!(path = %path.display(), "client payload written");
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}
