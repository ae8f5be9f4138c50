//! Reasons resubmit refuses to touch a submit directory.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// A refusal to proceed. Each variant maps to its own process exit code.
#[derive(Error, Diagnostic, Debug)]
pub enum ResubmitError {
    #[error("Error parsing arguments!  Exiting!")]
    #[diagnostic(code(resubmit::parse))]
    Parse { detail: String },

    #[error("Missing required argument!  Exiting!")]
    #[diagnostic(
        code(resubmit::missing_argument),
        help("-d, -n and -q are all required")
    )]
    MissingArgument,

    #[error("submitDir MUST be an absolute path! (/afs/cern.ch/...)")]
    #[diagnostic(code(resubmit::relative_submit_dir), help("got {path}"))]
    RelativeSubmitDir { path: Utf8PathBuf },

    #[error("Cannot write to submit directory!  Exiting!")]
    #[diagnostic(code(resubmit::not_writable), help("{path}: {reason}"))]
    NotWritable { path: Utf8PathBuf, reason: String },

    #[error("Fail file does not exist and you did not specify -f!  Exiting!")]
    #[diagnostic(
        code(resubmit::no_fail_marker),
        help("{marker} is missing; pass -f to clean up and resubmit anyway")
    )]
    NoFailMarker { marker: Utf8PathBuf },
}

impl ResubmitError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ResubmitError::Parse { .. } => 1,
            ResubmitError::MissingArgument => 2,
            ResubmitError::RelativeSubmitDir { .. } => 3,
            ResubmitError::NotWritable { .. } => 4,
            ResubmitError::NoFailMarker { .. } => 5,
        }
    }

    /// Whether the help text should accompany the message.
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            ResubmitError::Parse { .. } | ResubmitError::MissingArgument
        )
    }

    /// Parser detail naming the offending token, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ResubmitError::Parse { detail } => Some(detail.as_str()),
            _ => None,
        }
    }
}
