mod commands;
mod helpers;

use clap::Parser;
use fitsdiff_core::FitsDiffError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("fitsdiff-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => commands::run_compare_command(cli.compare),
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
#[command(
    name = "fitsdiff-rs",
    about = "Compare FITS files and report differences in header keywords and data"
)]
struct Cli {
    #[command(flatten)]
    compare: commands::CompareArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Diff(#[from] FitsDiffError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Diff(_) => 3,
            Self::Internal(_) => 4,
        }
    }

    fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => message.clone(),
            Self::Diff(error) => format!("ERROR: {error}"),
            Self::Internal(error) => format!("ERROR: {error:#}"),
        }
    }
}
