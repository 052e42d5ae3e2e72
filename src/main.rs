//! polyedit-replay: replay a JSON event script through the polygon editor
//! and write the resulting labels as BDD JSON.
//!
//! Usage: `polyedit-replay <script.json> [--config <cfg.json>] [--out <file>]`
//!
//! Without `--out` the export is printed to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use polyedit::config::AppConfig;
use polyedit::format::{AnnotationFormat, BddJsonFormat, ExportOptions};
use polyedit::replay::{ReplayScript, replay};
use polyedit::store::Dispatcher;

const USAGE: &str = "Usage: polyedit-replay <script.json> [--config <cfg.json>] [--out <file>]";

struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut script = None;
    let mut config = None;
    let mut out = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().ok_or("--config needs a path")?.into()),
            "--out" => out = Some(args.next().ok_or("--out needs a path")?.into()),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if arg.starts_with("--") => return Err(format!("Unknown option '{}'", arg)),
            _ if script.is_none() => script = Some(PathBuf::from(arg)),
            _ => return Err(format!("Unexpected argument '{}'", arg)),
        }
    }
    let script = script.ok_or_else(|| USAGE.to_string())?;
    Ok(Args {
        script,
        config,
        out,
    })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::default(),
    };
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level.to_level_filter())
        .init();

    let script = ReplayScript::load_from_path(&args.script)?;
    let list = replay(&script, &config)?;
    let state = list.store().state();

    let format = BddJsonFormat;
    let options = ExportOptions::new().pretty(true);
    match &args.out {
        Some(path) => {
            let result = format.export(&state, path, &options)?;
            for warning in &result.warnings {
                log::warn!("⚠️ {}", warning.message);
            }
        }
        None => {
            let (bytes, _) = format.export_to_bytes(&state, &options)?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
