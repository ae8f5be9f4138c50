//! Fixed on-disk layout of an EventLoop submit directory.

use camino::{Utf8Path, Utf8PathBuf};

/// Per-segment marker files written by EventLoop under `fetch/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `done-<n>` - output was fetched
    Done,
    /// `fail-<n>` - segment failed on the batch node
    Fail,
    /// `completed-<n>` - segment finished and was merged
    Completed,
}

impl Marker {
    /// File name prefix used on disk.
    pub fn prefix(self) -> &'static str {
        match self {
            Marker::Done => "done",
            Marker::Fail => "fail",
            Marker::Completed => "completed",
        }
    }
}

/// An EventLoop submit directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitDir {
    root: Utf8PathBuf,
}

impl SubmitDir {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The submit directory itself.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory holding markers and fetched histograms.
    pub fn fetch_dir(&self) -> Utf8PathBuf {
        self.root.join("fetch")
    }

    /// Directory holding the job scripts and segment table.
    pub fn submit_subdir(&self) -> Utf8PathBuf {
        self.root.join("submit")
    }

    /// Path of a marker file for the given segment number.
    pub fn marker(&self, kind: Marker, number: &str) -> Utf8PathBuf {
        self.fetch_dir().join(format!("{}-{}", kind.prefix(), number))
    }

    /// Fetched histogram file for a named segment.
    pub fn history_file(&self, name: &str) -> Utf8PathBuf {
        self.fetch_dir().join(format!("hist-{}.root", name))
    }

    /// Segment number to segment name table.
    pub fn segments_file(&self) -> Utf8PathBuf {
        self.submit_subdir().join("segments")
    }

    /// Per-segment entry point executed on the batch node.
    pub fn run_script(&self) -> Utf8PathBuf {
        self.submit_subdir().join("run")
    }

    /// Whether the marker file exists.
    pub fn has_marker(&self, kind: Marker, number: &str) -> bool {
        self.marker(kind, number).exists()
    }
}
