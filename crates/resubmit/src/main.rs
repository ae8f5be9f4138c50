//! resubmit - clean up a failed lxbatch EventLoop segment and send it back to LSF.

mod logging;

use miette::Diagnostic;
use resubmit_cli::{usage, Args, Config, NixAccess, ResubmitError, Settings};
use resubmit_core::clean_segment;
use resubmit_lsf::BsubRequest;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let settings = Settings::from_env();
    logging::init(&settings.log_filter);

    let config = Args::parse_from_args(std::env::args_os())
        .and_then(|args| Config::validate(args, &NixAccess));

    match config {
        Ok(config) => {
            resubmit(&config, &settings).await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Print a refusal the way an operator expects to read it on a terminal.
fn report(err: &ResubmitError) {
    if let Some(detail) = err.detail() {
        println!("{}", detail);
    }
    if err.shows_usage() {
        println!("{}", usage());
    }
    println!("{}", err);
    if let Some(help) = err.help() {
        tracing::info!("{}", help);
    }
}

/// Clear the segment's markers and hand it back to the scheduler.
///
/// Whatever the scheduler makes of the job, the command has been issued.
async fn resubmit(config: &Config, settings: &Settings) {
    let report = clean_segment(&config.submit_dir, &config.number, config.force);
    tracing::info!(
        removed = report.removed.len(),
        absent = report.absent.len(),
        failed = report.failed.len(),
        segment_name = ?report.segment_name,
        "cleaned segment {}",
        config.number
    );

    let request = BsubRequest::for_segment(&config.submit_dir, &config.number, &config.queue);
    println!("{}", request);

    match request.submit(&settings.bsub).await {
        Ok(outcome) => {
            print!("{}", outcome.stdout);
            eprint!("{}", outcome.stderr);
            match (&outcome.job_id, outcome.success) {
                (Some(job_id), _) => tracing::info!(
                    job_id = %job_id,
                    queue = outcome.queue.as_deref().unwrap_or(&config.queue),
                    "submitted"
                ),
                (None, true) => tracing::debug!("scheduler gave no job ID"),
                (None, false) => tracing::warn!(
                    exit_code = ?outcome.exit_code,
                    "{} did not accept the job",
                    settings.bsub
                ),
            }
        }
        Err(e) => tracing::warn!("{}", e),
    }
}
