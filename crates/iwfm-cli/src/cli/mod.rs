mod commands;
mod helpers;

use clap::Parser;
use iwfm_core::domain::IwfmError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_iwfm_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            if let Some(summary_line) = diagnostic.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("iwfm-sub".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
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

#[derive(Parser)]
#[command(name = "iwfm-sub", version, about = "IWFM submodel extraction")]
struct Cli {
    /// Log every skipped block and file decision
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Extract the preprocessor files and save the submodel manifest
    Preproc(commands::PreprocArgs),
    /// Extract the simulation files using a saved submodel manifest
    Sim(commands::SimArgs),
    /// Print the layer arrays of a stratigraphy file as JSON
    Strat(commands::StratArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Preproc(args) => commands::run_preproc_command(args),
        CliCommand::Sim(args) => commands::run_sim_command(args),
        CliCommand::Strat(args) => commands::run_strat_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Extract(IwfmError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_iwfm_error(&self) -> IwfmError {
        match self {
            Self::Usage(message) => IwfmError::invalid_argument("INPUT.CLI_USAGE", message.clone()),
            Self::Extract(error) => error.clone(),
            Self::Internal(error) => IwfmError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

impl From<IwfmError> for CliError {
    fn from(error: IwfmError) -> Self {
        Self::Extract(error)
    }
}
