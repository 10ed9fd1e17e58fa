use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use doclist::config::BrowserConfig;
use doclist::replay::{self, Script};

#[derive(Debug, Parser)]
#[command(name = "doclist", about = "Replay store events through the document list")]
struct Cli {
    /// YAML script of store events and user actions.
    script: PathBuf,

    /// Browser config (.yaml, .yml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rendered height of one row, overriding the script.
    #[arg(long)]
    row_height: Option<u32>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> doclist::error::Result<()> {
    let config = match &cli.config {
        Some(path) => BrowserConfig::load(path)?,
        None => BrowserConfig::default(),
    };
    doclist::telemetry::init(&config.logging.filter);

    let mut script = Script::load(&cli.script)?;
    if cli.row_height.is_some() {
        script.row_height = cli.row_height;
    }

    let report = replay::run(&script, &config)?;
    println!("{}", report.render(cli.pretty)?);
    Ok(())
}
