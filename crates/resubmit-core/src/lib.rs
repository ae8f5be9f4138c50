//! EventLoop submit-directory handling for resubmit.
//!
//! This crate knows where EventLoop keeps its per-segment marker files and
//! how to clear them before a segment is sent back to the batch queue.

pub mod cleanup;
pub mod layout;
pub mod segments;

pub use cleanup::{clean_segment, remove_file_if_exists, CleanupReport};
pub use layout::{Marker, SubmitDir};
pub use segments::{find_segment_name, read_segment_name, SegmentsError};
