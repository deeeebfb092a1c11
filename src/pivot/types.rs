use std::path::PathBuf;

/// Default number of harmonic columns in the pivot table
pub const DEFAULT_MAX_HARMONIC: usize = 20;

/// Default input file, as written by the overtone tracker export
pub const DEFAULT_IN_FILE: &str = "bassnote.wav-oout.csv";

/// One per-harmonic measurement read from the input CSV
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicRow {
    /// Harmonic index (1 is the fundamental, anything below 1 is an outlier)
    pub harmonic: i64,
    /// Track (frame) number within the note
    pub track_number: i64,
    /// Frequency in Hz, only meaningful on the fundamental row
    pub freq: f64,
    /// Linear amplitude contribution
    pub amp: f64,
    /// Tracker "new peak" flag, carried through but not used
    pub new_flag: i64,
}

/// One wide output row, produced when a set of rows closes
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    /// Last fundamental frequency seen in the set, if any
    pub fundamental: Option<f64>,
    /// Overall level of the set in dB
    pub total_db: f64,
    /// Per-slot levels: harmonics `1..=max_harmonic`, then tweeters, then outliers
    pub slot_db: Vec<f64>,
}

/// Result of pivoting a full input
#[derive(Debug, Default)]
pub struct PivotOutput {
    /// Completed rows in input order
    pub rows: Vec<PivotRow>,
    /// Rows after the last closing track that never formed a complete set
    pub dropped_rows: usize,
}

/// Configuration for a file-to-file pivot run
#[derive(Debug, Clone)]
pub struct PivotConfig {
    /// Input CSV path
    pub in_file: PathBuf,
    /// Explicit output path; derived from `in_file` when absent
    pub out_file: Option<PathBuf>,
    /// Number of dedicated harmonic columns
    pub max_harmonic: usize,
}

/// What a completed run did
#[derive(Debug)]
pub struct PivotSummary {
    pub out_file: PathBuf,
    pub input_rows: usize,
    pub sets_written: usize,
    pub dropped_rows: usize,
}

/// Errors that can occur while pivoting harmonic data
#[derive(Debug, thiserror::Error)]
pub enum PivotError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the CSV reader or writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A five-field row contained a value that is not a number of the expected type
    #[error("Malformed field on line {line}: column '{column}' has value '{value}'")]
    MalformedField {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// No usable rows, so there is no maximum track number
    #[error("Input contains no five-field rows")]
    EmptyInput,

    /// The derived output path would overwrite the input
    #[error("Output path would overwrite input {} (file name lacks 'oout'; pass --outFile)", .0.display())]
    OutputCollision(PathBuf),

    /// Invalid parameter values
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl PivotConfig {
    /// Creates a config for `in_file` with the default harmonic count
    pub fn new(in_file: impl Into<PathBuf>) -> Self {
        PivotConfig {
            in_file: in_file.into(),
            out_file: None,
            max_harmonic: DEFAULT_MAX_HARMONIC,
        }
    }

    /// Validates the configuration before any file is touched
    ///
    /// # Returns
    /// * `Ok(())` if the configuration is valid
    /// * `Err(PivotError)` if the configuration is invalid
    pub fn validate(&self) -> Result<(), PivotError> {
        if self.max_harmonic == 0 {
            return Err(PivotError::InvalidParams(
                "maxHarmonic must be at least 1".to_string(),
            ));
        }
        if !self.in_file.exists() {
            return Err(PivotError::InputNotFound(self.in_file.clone()));
        }
        Ok(())
    }
}
