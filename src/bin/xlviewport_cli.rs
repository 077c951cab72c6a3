//! CLI tool for xlviewport - resolves a viewport query and outputs JSON
//!
//! Usage:
//!   xlviewport_cli '<query>'                          # Response JSON to stdout
//!   xlviewport_cli '<query>' --config grid.json       # Sizes and frozen panes
//!   xlviewport_cli '<query>' --delta delta.json       # Filter a delta to the window
//!   xlviewport_cli '<query>' --labels labels.json     # Resolve selectionType=label
//!   xlviewport_cli '<query>' --cell                   # Cell request: frozen flag optional
//!   xlviewport_cli '<query>' -o out.json              # Write to a file

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use xlviewport::labels::LabelStore;
use xlviewport::{Delta, GridConfig, LabelMapping, RequiredKeys, SheetLayout, ViewportRequest};

const USAGE: &str = "Usage: xlviewport_cli <query> [--config grid.json] [--delta delta.json] \
                     [--labels labels.json] [--cell] [-o output.json]";

#[derive(Default)]
struct Args {
    query: String,
    config: Option<String>,
    delta: Option<String>,
    labels: Option<String>,
    required: RequiredKeys,
    output: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut query = None;
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--config" => parsed.config = Some(value("--config")?),
            "--delta" => parsed.delta = Some(value("--delta")?),
            "--labels" => parsed.labels = Some(value("--labels")?),
            "-o" => parsed.output = Some(value("-o")?),
            "--cell" => parsed.required = RequiredKeys::Cell,
            flag if flag.starts_with('-') && flag.len() > 1 => return Err(format!("Unknown option {flag}")),
            other if query.is_none() => query = Some(other.to_string()),
            other => return Err(format!("Unexpected argument {other}")),
        }
    }
    parsed.query = query.ok_or_else(|| USAGE.to_string())?;
    Ok(parsed)
}

fn read(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Error reading {path}: {e}"))
}

fn run(args: &Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => GridConfig::from_json(&read(path)?).map_err(|e| format!("{path}: {e}"))?,
        None => GridConfig::default(),
    };
    let layout = SheetLayout::from_config(&config).map_err(|e| e.to_string())?;

    let labels: LabelStore = match &args.labels {
        Some(path) => serde_json::from_str::<Vec<LabelMapping>>(&read(path)?)
            .map_err(|e| format!("{path}: {e}"))?
            .into_iter()
            .collect(),
        None => LabelStore::new(),
    };

    let delta: Option<Delta> = match &args.delta {
        Some(path) => Some(serde_json::from_str(&read(path)?).map_err(|e| format!("{path}: {e}"))?),
        None => None,
    };

    let response = ViewportRequest::new(&layout, &labels)
        .handle(&args.query, args.required, delta.as_ref())
        .map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&response).map_err(|e| format!("Error serializing JSON: {e}"))
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    let json = match run(&args) {
        Ok(json) => json,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            if writeln!(stdout, "{json}").is_err() {
                std::process::exit(1);
            }
        }
    }
}
