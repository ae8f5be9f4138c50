//! LSF integration for resubmit.
//!
//! Build and run the bsub call that sends a segment back to the queue.

pub mod bsub;
pub mod command;

pub use bsub::{
    parse_submission_reply, shell_quote, BsubRequest, SubmitOutcome, ATLAS_SETUP, DEFAULT_BSUB,
    LOGIN_SHELL,
};
pub use command::{run_command_allow_failure, CommandError, CommandOutput};
