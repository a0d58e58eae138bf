mod app;
mod container;
mod error;

use std::{path::PathBuf, process::ExitCode};

use app::{CliApp, Config, TerminalSession};
use clap::{ArgAction, Parser};
use error::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Write the answers here instead of the file named by the schema
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log more details to stderr, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// JSON Schema describing the file to generate
    schema: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let schema_path = args.schema.ok_or(AppError::MissingArgument)?;
    let config = Config::load();
    let app = CliApp::new(schema_path, args.output, &config)?;

    let mut session = TerminalSession::open();
    app.run(&mut session)?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "jprompt=debug",
        _ => "jprompt=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
