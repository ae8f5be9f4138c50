//! Validated resubmission settings.

use crate::error::ResubmitError;
use crate::Args;
use camino::Utf8Path;
use nix::unistd::{access, AccessFlags};
use resubmit_core::{Marker, SubmitDir};

/// Checks whether the process may write to a directory.
pub trait AccessProbe {
    /// `Err` carries the reason access was refused.
    fn writable(&self, path: &Utf8Path) -> Result<(), String>;
}

/// Asks the kernel via access(2) with the real uid/gid.
pub struct NixAccess;

impl AccessProbe for NixAccess {
    fn writable(&self, path: &Utf8Path) -> Result<(), String> {
        access(path.as_std_path(), AccessFlags::W_OK).map_err(|e| e.to_string())
    }
}

/// Everything needed to clean and resubmit one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub submit_dir: SubmitDir,
    pub number: String,
    pub queue: String,
    pub force: bool,
}

impl Config {
    /// Validate parsed arguments against the filesystem.
    ///
    /// Checks run in a fixed order and the first failure wins: all
    /// mandatory values present, absolute submit directory, write access,
    /// then the fail marker exists unless `force` is set.
    pub fn validate(args: Args, probe: &impl AccessProbe) -> Result<Self, ResubmitError> {
        let (Some(submit_dir), Some(number), Some(queue)) =
            (args.submit_dir, args.number, args.queue)
        else {
            return Err(ResubmitError::MissingArgument);
        };
        if submit_dir.as_str().is_empty() || number.is_empty() || queue.is_empty() {
            return Err(ResubmitError::MissingArgument);
        }

        if !submit_dir.as_str().starts_with('/') {
            return Err(ResubmitError::RelativeSubmitDir { path: submit_dir });
        }

        if let Err(reason) = probe.writable(&submit_dir) {
            return Err(ResubmitError::NotWritable {
                path: submit_dir,
                reason,
            });
        }

        let submit_dir = SubmitDir::new(submit_dir);
        if !args.force && !submit_dir.has_marker(Marker::Fail, &number) {
            return Err(ResubmitError::NoFailMarker {
                marker: submit_dir.marker(Marker::Fail, &number),
            });
        }

        tracing::debug!(
            submit_dir = %submit_dir.root(),
            number = %number,
            queue = %queue,
            force = args.force,
            "validated"
        );
        Ok(Self {
            submit_dir,
            number,
            queue,
            force: args.force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    struct AllowAll;

    impl AccessProbe for AllowAll {
        fn writable(&self, _path: &Utf8Path) -> Result<(), String> {
            Ok(())
        }
    }

    struct DenyAll;

    impl AccessProbe for DenyAll {
        fn writable(&self, _path: &Utf8Path) -> Result<(), String> {
            Err("EACCES: Permission denied".to_string())
        }
    }

    fn args(dir: &str, number: &str, queue: &str, force: bool) -> Args {
        Args {
            submit_dir: Some(Utf8PathBuf::from(dir)),
            number: Some(number.to_string()),
            queue: Some(queue.to_string()),
            force,
        }
    }

    fn job_dir(fail_marker: Option<&str>) -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap().to_path_buf();
        std::fs::create_dir(root.join("fetch")).unwrap();
        if let Some(number) = fail_marker {
            std::fs::write(root.join("fetch").join(format!("fail-{}", number)), "").unwrap();
        }
        (temp, root)
    }

    fn exit_code(result: Result<Config, ResubmitError>) -> u8 {
        result.unwrap_err().exit_code()
    }

    #[test]
    fn test_missing_arguments() {
        let full = args("/tmp/job", "3", "short", false);
        for missing in [
            Args {
                submit_dir: None,
                ..full.clone()
            },
            Args {
                number: None,
                ..full.clone()
            },
            Args {
                queue: None,
                ..full.clone()
            },
            args("/tmp/job", "", "short", false),
            args("", "3", "short", true),
            Args::default(),
        ] {
            assert_eq!(exit_code(Config::validate(missing, &AllowAll)), 2);
        }
    }

    #[test]
    fn test_relative_submit_dir() {
        for dir in ["job", "./job", "~/job"] {
            assert_eq!(
                exit_code(Config::validate(args(dir, "3", "short", true), &AllowAll)),
                3
            );
        }
    }

    #[test]
    fn test_missing_arguments_checked_before_path() {
        assert_eq!(
            exit_code(Config::validate(args("job", "", "short", false), &AllowAll)),
            2
        );
    }

    #[test]
    fn test_not_writable() {
        let (_temp, root) = job_dir(Some("3"));
        let result = Config::validate(args(root.as_str(), "3", "short", false), &DenyAll);
        assert_eq!(exit_code(result), 4);
    }

    #[test]
    fn test_nonexistent_dir_is_not_writable() {
        let (_temp, root) = job_dir(None);
        let missing = root.join("does-not-exist");
        let result = Config::validate(args(missing.as_str(), "3", "short", true), &NixAccess);
        assert_eq!(exit_code(result), 4);
    }

    #[test]
    fn test_no_fail_marker() {
        let (_temp, root) = job_dir(Some("2"));
        let result = Config::validate(args(root.as_str(), "3", "short", false), &NixAccess);
        assert_eq!(exit_code(result), 5);
    }

    #[test]
    fn test_force_skips_fail_marker() {
        let (_temp, root) = job_dir(None);
        let config = Config::validate(args(root.as_str(), "3", "short", true), &NixAccess).unwrap();
        assert!(config.force);
        assert_eq!(config.submit_dir.root(), root.as_path());
    }

    #[test]
    fn test_valid_config() {
        let (_temp, root) = job_dir(Some("3"));
        let config =
            Config::validate(args(root.as_str(), "3", "short", false), &NixAccess).unwrap();
        assert_eq!(
            config,
            Config {
                submit_dir: SubmitDir::new(root),
                number: "3".to_string(),
                queue: "short".to_string(),
                force: false,
            }
        );
    }
}
