/// Tracker dump to CSV conversion.
///
/// The overtone tracker prints its template storage as semicolon-terminated
/// records that may wrap over several lines. This module turns those into
/// CSV rows, optionally trimmed to the columns the pivot reads.
mod scanner;
mod types;

pub use scanner::convert;
pub use types::{
    ConvertConfig, ConvertError, ConvertSummary, DEFAULT_MARKER, HEADER, PIVOT_COLUMNS,
};
