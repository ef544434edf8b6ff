//! Command-line caller for the document core.
//!
//! # Responsibility
//! - Load a JSON document from disk; the core itself never touches files.
//! - Print stats, validation issues, or one of the three exports to stdout.
//!
//! Usage: `docutree <document.json> [stats|validate|csv|semantic|lines]`
//! or `docutree --version`.

use docutree_core::{
    core_version, export_lines, export_semantic, export_tabular, DocumentService, ExportContext,
    LoggingConfig, Node,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str =
    "usage: docutree <document.json> [stats|validate|csv|semantic|lines] | docutree --version";

fn main() -> ExitCode {
    if let Some(config) = LoggingConfig::from_env() {
        if let Err(err) = config.init() {
            eprintln!("docutree: logging disabled: {err}");
        }
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("docutree: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, Box<dyn Error>> {
    let (path, command) = match args {
        [flag] if flag == "--version" => return Ok(format!("docutree {}", core_version())),
        [path] => (path, "stats"),
        [path, command] => (path, command.as_str()),
        _ => return Err(USAGE.into()),
    };

    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{path}`: {err}"))?;
    let root: Node = serde_json::from_str(&raw)?;
    let service = DocumentService::new(root)?;
    info!("event=cli_command module=cli status=start command={command}");

    let mut ctx = ExportContext::from_config(service.config());
    let output = match command {
        "stats" => serde_json::to_string_pretty(&service.stats())?,
        "validate" => serde_json::to_string_pretty(&service.validate())?,
        "csv" => export_tabular(service.root(), &mut ctx)?,
        "semantic" => export_semantic(service.root(), &mut ctx)?,
        "lines" => export_lines(service.root(), &mut ctx)?,
        other => return Err(format!("unknown command `{other}`\n{USAGE}").into()),
    };
    Ok(output)
}
