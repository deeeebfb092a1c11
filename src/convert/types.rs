/// Line prefix that marks the start of the record section in a tracker dump
pub const DEFAULT_MARKER: &str = "template-storage";

/// Header of the full converter output. Leading spaces are part of the names.
pub const HEADER: [&str; 11] = [
    "#seq",
    " freq_ratio",
    " harmonic",
    " amp_ratio",
    " tracknum",
    " f",
    " amp",
    " newflag",
    " env",
    " pitch",
    "note",
];

/// Record columns kept for the harmonic pivot: harmonic, tracknum, f, amp, newflag
pub const PIVOT_COLUMNS: [usize; 5] = [2, 4, 5, 6, 7];

/// Converter options
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Prefix of section marker lines
    pub marker: String,
    /// Emit only the pivot's five columns, without a header
    pub select_pivot_columns: bool,
}

/// What a conversion wrote
#[derive(Debug, Default, PartialEq)]
pub struct ConvertSummary {
    /// Records written (excluding the header)
    pub records: usize,
    /// Records too short to project onto the pivot columns
    pub skipped: usize,
    /// Tokens left pending at end of input without a terminator
    pub unterminated_tokens: usize,
}

/// Errors that can occur while converting a tracker dump
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// IO errors when reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the CSV writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input ended before the section marker appeared
    #[error("Marker line '{0}' not found in input")]
    MarkerNotFound(String),
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            marker: DEFAULT_MARKER.to_string(),
            select_pivot_columns: false,
        }
    }
}
