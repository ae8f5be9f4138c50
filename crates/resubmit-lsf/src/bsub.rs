//! Submit an EventLoop segment with bsub.

use crate::command::{run_command_allow_failure, CommandError};
use resubmit_core::SubmitDir;
use std::fmt;
use tokio::process::Command;

/// Environment bootstrap run in front of every segment on the batch node.
pub const ATLAS_SETUP: &str = "export ATLAS_LOCAL_ROOT_BASE=/cvmfs/atlas.cern.ch/repo/ATLASLocalRootBase && source ${ATLAS_LOCAL_ROOT_BASE}/user/atlasLocalSetup.sh && ";

/// Login shell requested with `bsub -L`.
pub const LOGIN_SHELL: &str = "/bin/bash";

/// Scheduler executable used unless overridden.
pub const DEFAULT_BSUB: &str = "bsub";

/// Quote a word for a POSIX shell, leaving plain words untouched.
pub fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// A single bsub invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsubRequest {
    /// Target queue (`-q`)
    pub queue: String,
    /// Login shell (`-L`)
    pub shell: String,
    /// Command line the job runs
    pub script: String,
}

impl BsubRequest {
    /// Request that reruns segment `number` of an EventLoop submit directory.
    pub fn for_segment(dir: &SubmitDir, number: &str, queue: &str) -> Self {
        let script = format!(
            "{}{} {}",
            ATLAS_SETUP,
            shell_quote(dir.run_script().as_str()),
            shell_quote(number)
        );
        Self {
            queue: queue.to_string(),
            shell: LOGIN_SHELL.to_string(),
            script,
        }
    }

    /// Arguments passed to bsub, one per word.
    pub fn args(&self) -> [&str; 5] {
        ["-q", &self.queue, "-L", &self.shell, &self.script]
    }

    /// Run `program` with this request's arguments.
    ///
    /// A rejected submission is still `Ok`; only a spawn failure is an error.
    pub async fn submit(&self, program: &str) -> Result<SubmitOutcome, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(self.args());

        tracing::debug!(program, queue = %self.queue, "submitting");
        let output = run_command_allow_failure(&mut cmd, program).await?;

        let reply = parse_submission_reply(&output.stdout);
        Ok(SubmitOutcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            job_id: reply.as_ref().map(|(id, _)| id.clone()),
            queue: reply.map(|(_, queue)| queue),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

impl fmt::Display for BsubRequest {
    /// Shell-equivalent form of the call, for the operator's log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -q {} -L {} {}",
            DEFAULT_BSUB,
            shell_quote(&self.queue),
            shell_quote(&self.shell),
            shell_quote(&self.script)
        )
    }
}

/// What bsub said about a submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// bsub exited with status 0
    pub success: bool,
    /// Exit code, None if killed by a signal
    pub exit_code: Option<i32>,
    /// LSF job ID from the reply
    pub job_id: Option<String>,
    /// Queue LSF placed the job in
    pub queue: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

/// Parse bsub's `Job <id> is submitted to queue <queue>.` reply.
///
/// Returns the job ID and queue name.
pub fn parse_submission_reply(stdout: &str) -> Option<(String, String)> {
    stdout.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Job <")?;
        let (job_id, rest) = rest.split_once('>')?;
        let rest = rest.strip_prefix(" is submitted to ")?;
        let (_, rest) = rest.split_once('<')?;
        let (queue, _) = rest.split_once('>')?;
        Some((job_id.to_string(), queue.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("short"), "short");
        assert_eq!(shell_quote("/tmp/job/submit/run"), "/tmp/job/submit/run");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("x; rm -rf ~"), "'x; rm -rf ~'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_request_for_segment() {
        let dir = SubmitDir::new("/tmp/job");
        let request = BsubRequest::for_segment(&dir, "3", "short");
        assert_eq!(request.queue, "short");
        assert_eq!(request.shell, "/bin/bash");
        assert!(request.script.starts_with(ATLAS_SETUP));
        assert!(request.script.ends_with("atlasLocalSetup.sh && /tmp/job/submit/run 3"));
        assert_eq!(request.args()[..4], ["-q", "short", "-L", "/bin/bash"]);
    }

    #[test]
    fn test_display_matches_shell_form() {
        let dir = SubmitDir::new("/tmp/job");
        let request = BsubRequest::for_segment(&dir, "3", "short");
        assert_eq!(
            request.to_string(),
            "bsub -q short -L /bin/bash 'export ATLAS_LOCAL_ROOT_BASE=/cvmfs/atlas.cern.ch/repo/ATLASLocalRootBase && source ${ATLAS_LOCAL_ROOT_BASE}/user/atlasLocalSetup.sh && /tmp/job/submit/run 3'"
        );
    }

    #[test]
    fn test_unsafe_values_stay_inert() {
        let dir = SubmitDir::new("/tmp/my job");
        let request = BsubRequest::for_segment(&dir, "3;reboot", "short");
        assert!(request.script.ends_with("'/tmp/my job/submit/run' '3;reboot'"));
    }

    #[test]
    fn test_parse_submission_reply() {
        assert_eq!(
            parse_submission_reply("Job <123456> is submitted to queue <short>.\n"),
            Some(("123456".to_string(), "short".to_string()))
        );
        assert_eq!(
            parse_submission_reply("Job <7> is submitted to default queue <normal>."),
            Some(("7".to_string(), "normal".to_string()))
        );
        assert_eq!(parse_submission_reply("Bad queue name. Job not submitted."), None);
        assert_eq!(parse_submission_reply(""), None);
    }

    #[tokio::test]
    async fn test_submit_with_stand_in_scheduler() {
        let dir = SubmitDir::new("/tmp/job");
        let request = BsubRequest::for_segment(&dir, "3", "short");
        let outcome = request.submit("echo").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.stdout.starts_with("-q short -L /bin/bash export"));
        assert!(outcome.job_id.is_none());
    }

    #[tokio::test]
    async fn test_submit_missing_scheduler() {
        let dir = SubmitDir::new("/tmp/job");
        let request = BsubRequest::for_segment(&dir, "3", "short");
        let result = request.submit("nonexistent_bsub_12345").await;
        assert!(matches!(result, Err(CommandError::Execution { .. })));
    }
}
