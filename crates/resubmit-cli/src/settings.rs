//! Environment overrides.

use resubmit_lsf::DEFAULT_BSUB;

/// Scheduler executable to run instead of `bsub`.
pub const BSUB_ENV: &str = "RESUBMIT_BSUB";

/// Log filter directives, `tracing_subscriber::EnvFilter` syntax.
pub const LOG_ENV: &str = "RESUBMIT_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bsub: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bsub: DEFAULT_BSUB.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            bsub: get(BSUB_ENV).unwrap_or(defaults.bsub),
            log_filter: get(LOG_ENV).unwrap_or(defaults.log_filter),
        }
    }
}
