/// Harmonic pivot: per-harmonic tracker rows in, one decibel row per note out.
///
/// This module provides functionality to:
/// - Read five-field harmonic rows from CSV
/// - Group rows into sets that close on the largest track number
/// - Convert each set's amplitudes to dB relative to the fundamental
/// - Write the wide table next to the input file
mod accumulator;
mod decibel;
mod ingest;
mod output;
mod types;

pub use accumulator::{pivot_rows, HarmonicSet};
pub use decibel::{ampratio_to_db, rms_to_db, REFERENCE_DB, SILENT_DB, UNBOUNDED_DB};
pub use ingest::{max_track, read_rows, ROW_FIELDS};
pub use output::{format_row, header, output_path, write_table};
pub use types::{
    HarmonicRow, PivotConfig, PivotError, PivotOutput, PivotRow, PivotSummary,
    DEFAULT_IN_FILE, DEFAULT_MAX_HARMONIC,
};

use std::fs::File;
use std::io::{BufReader, BufWriter};

/// Pivots `config.in_file` into its output table.
///
/// The whole input is read and pivoted before the output file is created,
/// so a bad input never leaves a truncated table behind.
///
/// # Errors
/// * If the input does not exist or cannot be read
/// * If a row is malformed or the input has no usable rows
/// * If no output path is given and none can be derived safely
pub fn run(config: &PivotConfig) -> Result<PivotSummary, PivotError> {
    config.validate()?;
    let out_file = match &config.out_file {
        Some(path) => path.clone(),
        None => output_path(&config.in_file)?,
    };
    if out_file == config.in_file {
        return Err(PivotError::OutputCollision(out_file));
    }

    let input = BufReader::new(File::open(&config.in_file)?);
    let rows = read_rows(input)?;
    let pivoted = pivot_rows(&rows, config.max_harmonic)?;

    let output = BufWriter::new(File::create(&out_file)?);
    write_table(output, config.max_harmonic, &pivoted.rows)?;

    tracing::info!(
        "Pivoted {} rows into {} sets: {}",
        rows.len(),
        pivoted.rows.len(),
        out_file.display()
    );
    Ok(PivotSummary {
        out_file,
        input_rows: rows.len(),
        sets_written: pivoted.rows.len(),
        dropped_rows: pivoted.dropped_rows,
    })
}
