//! Removal of the files that block a segment from being resubmitted.

use crate::layout::{Marker, SubmitDir};
use crate::segments::read_segment_name;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Outcome of a cleanup pass. Cleanup never aborts, so failures are only
/// recorded here.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files that existed and were deleted
    pub removed: Vec<Utf8PathBuf>,
    /// Files that were already gone
    pub absent: Vec<Utf8PathBuf>,
    /// Files that could not be deleted
    pub failed: Vec<(Utf8PathBuf, String)>,
    /// Segment name found in the segments table (force only)
    pub segment_name: Option<String>,
}

impl CleanupReport {
    fn remove(&mut self, path: Utf8PathBuf) {
        match remove_file_if_exists(&path) {
            Ok(true) => {
                tracing::debug!(%path, "removed");
                self.removed.push(path);
            }
            Ok(false) => {
                tracing::debug!(%path, "already absent");
                self.absent.push(path);
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "could not remove");
                self.failed.push((path, e.to_string()));
            }
        }
    }
}

/// Delete a file, treating a missing file as success.
///
/// Returns whether a file was actually deleted.
pub fn remove_file_if_exists(path: &Utf8Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Clear the markers of a segment so EventLoop will pick it up again.
///
/// `done` and `fail` are always removed. With `force` the `completed`
/// marker goes too, along with the segment's fetched histogram file,
/// whose name comes from `submit/segments`. An unreadable or missing
/// segments table just skips the histogram.
pub fn clean_segment(dir: &SubmitDir, number: &str, force: bool) -> CleanupReport {
    let mut report = CleanupReport::default();

    report.remove(dir.marker(Marker::Done, number));
    report.remove(dir.marker(Marker::Fail, number));

    if !force {
        return report;
    }

    report.remove(dir.marker(Marker::Completed, number));

    let segments = dir.segments_file();
    match read_segment_name(&segments, number) {
        Ok(Some(name)) => {
            report.remove(dir.history_file(&name));
            report.segment_name = Some(name);
        }
        Ok(None) => tracing::debug!(%segments, number, "segment not listed"),
        Err(e) => tracing::debug!(%segments, error = %e, "skipping segments table"),
    }

    report
}
