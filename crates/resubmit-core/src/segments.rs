//! Lookup in the `submit/segments` table.
//!
//! The table is a stream of whitespace-separated `<number> <name>` pairs.
//! Pairs are read token by token, so line breaks carry no meaning.

use camino::Utf8Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Find the name of the first segment whose number equals `number`.
///
/// A trailing number without a name ends the scan.
pub fn find_segment_name<'a>(content: &'a str, number: &str) -> Option<&'a str> {
    let mut tokens = content.split_whitespace();
    while let (Some(segment), Some(name)) = (tokens.next(), tokens.next()) {
        if segment == number {
            return Some(name);
        }
    }
    None
}

/// Read the segments table and look up `number`.
pub fn read_segment_name(path: &Utf8Path, number: &str) -> Result<Option<String>, SegmentsError> {
    let content = std::fs::read_to_string(path)?;
    Ok(find_segment_name(&content, number).map(str::to_string))
}
