use super::types::{PivotError, PivotRow};
use csv::{Terminator, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Part of the tracker export file name replaced to name the pivot table
pub const INPUT_TAG: &str = "oout";
pub const OUTPUT_TAG: &str = "hpivot";

/// Column names: `pitch, dB, 1..=max_harmonic, tweeters, outliers`
pub fn header(max_harmonic: usize) -> Vec<String> {
    let mut columns = Vec::with_capacity(max_harmonic + 4);
    columns.push("pitch".to_string());
    columns.push("dB".to_string());
    columns.extend((1..=max_harmonic).map(|h| h.to_string()));
    columns.push("tweeters".to_string());
    columns.push("outliers".to_string());
    columns
}

/// Writes the header followed by one line per row, `\n` terminated.
pub fn write_table<W: Write>(
    writer: W,
    max_harmonic: usize,
    rows: &[PivotRow],
) -> Result<(), PivotError> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(header(max_harmonic))?;
    for row in rows {
        wtr.write_record(format_row(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders a row as CSV fields; a missing fundamental is an empty field.
pub fn format_row(row: &PivotRow) -> Vec<String> {
    let mut fields = Vec::with_capacity(row.slot_db.len() + 2);
    fields.push(row.fundamental.map(format_number).unwrap_or_default());
    fields.push(format_number(row.total_db));
    fields.extend(row.slot_db.iter().copied().map(format_number));
    fields
}

// Debug formatting keeps the shortest round-trip digits and always a decimal point.
fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

/// Derives the pivot table path by swapping `oout` for `hpivot` in the file name.
///
/// # Errors
/// * `OutputCollision` if the file name has no `oout`, since the derived
///   path would be the input itself
pub fn output_path(input: &Path) -> Result<PathBuf, PivotError> {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| PivotError::InvalidParams(format!("Not a file path: {}", input.display())))?;

    if !name.contains(INPUT_TAG) {
        return Err(PivotError::OutputCollision(input.to_path_buf()));
    }
    Ok(input.with_file_name(name.replace(INPUT_TAG, OUTPUT_TAG)))
}
