mod commands;
mod helpers;

use analisi_core::domain::{AnalisiError, ErrorClass};
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            if let Some(condition_line) = error.exit_condition_line() {
                eprintln!("{}", condition_line);
            }
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("analisi-job".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "analisi-job",
    version,
    about = "Stage, run and parse analisi trajectory analyses"
)]
struct Cli {
    /// Log debug details unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Stage the trajectory and write the job descriptor
    Prepare(commands::PrepareArgs),
    /// Run analisi on a prepared working directory
    Run(commands::RunArgs),
    /// Parse retrieved analisi output into named arrays
    Parse(commands::ParseArgs),
    /// Prepare, run and parse in one working directory
    Submit(commands::SubmitArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Prepare(args) => commands::run_prepare_command(args),
        CliCommand::Run(args) => commands::run_run_command(args),
        CliCommand::Parse(args) => commands::run_parse_command(args),
        CliCommand::Submit(args) => commands::run_submit_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Job(AnalisiError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => format!("ERROR: [CLI.USAGE] {}", message.trim_end()),
            Self::Job(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [CLI.IO] {error:#}"),
        }
    }

    fn exit_condition_line(&self) -> Option<String> {
        match self {
            Self::Job(error) => Some(error.exit_condition_line()),
            Self::Usage(_) | Self::Internal(_) => None,
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => ErrorClass::RequestValidation.process_exit_code(),
            Self::Job(error) => error.process_exit_code(),
            Self::Internal(_) => ErrorClass::Staging.process_exit_code(),
        }
    }
}
