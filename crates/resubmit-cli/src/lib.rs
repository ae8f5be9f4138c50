//! CLI argument parsing and validation for resubmit.

pub mod config;
pub mod error;
pub mod settings;

pub use config::{AccessProbe, Config, NixAccess};
pub use error::ResubmitError;
pub use settings::Settings;

use camino::Utf8PathBuf;
use clap::error::{ContextKind, ErrorKind};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = "resubmit")]
#[command(about = "Clean up failed lxbatch EventLoop jobs and resubmit them")]
#[command(args_override_self = true)]
pub struct Args {
    /// submitDir made by EventLoop
    #[arg(short = 'd', long = "submitDir", value_name = "DIR", allow_hyphen_values = true)]
    pub submit_dir: Option<Utf8PathBuf>,

    /// Segment number
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub number: Option<String>,

    /// Queue to submit to
    #[arg(short = 'q', long, allow_hyphen_values = true)]
    pub queue: Option<String>,

    /// Force running (remove all files from job and resubmit cleanly)
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Flags that take the next token as their value.
const VALUE_FLAGS: [&str; 6] = ["-d", "--submitDir", "-n", "--number", "-q", "--queue"];

/// Flags that take no value.
const SWITCH_FLAGS: [&str; 2] = ["-f", "--force"];

impl Args {
    /// Parse a full argument vector, program name first.
    ///
    /// Only the exact flag spellings are accepted: attached values
    /// (`-n3`, `--number=3`), clustered switches, `--` and `-h` are all
    /// parse errors.
    pub fn parse_from_args<I, T>(argv: I) -> Result<Self, ResubmitError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        check_tokens(argv.get(1..).unwrap_or_default())?;

        Args::try_parse_from(argv).map_err(|e| ResubmitError::Parse {
            detail: describe_parse_error(&e),
        })
    }
}

/// Walk the arguments the way the flag table reads them, stopping at the
/// first token that is neither a known flag nor a flag's value.
fn check_tokens(tokens: &[OsString]) -> Result<(), ResubmitError> {
    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        let flag = token.to_str();
        if flag.is_some_and(|f| VALUE_FLAGS.contains(&f)) {
            if tokens.next().is_none() {
                return Err(ResubmitError::Parse {
                    detail: format!("Argument does not have value: {}", token.to_string_lossy()),
                });
            }
        } else if !flag.is_some_and(|f| SWITCH_FLAGS.contains(&f)) {
            return Err(ResubmitError::Parse {
                detail: format!("Error parsing argument: {}", token.to_string_lossy()),
            });
        }
    }
    Ok(())
}

/// One-line description of what clap rejected.
fn describe_parse_error(err: &clap::Error) -> String {
    match (err.kind(), err.get(ContextKind::InvalidArg)) {
        (ErrorKind::UnknownArgument, Some(arg)) => format!("Error parsing argument: {}", arg),
        _ => err
            .render()
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Help text shown with usage errors.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}
