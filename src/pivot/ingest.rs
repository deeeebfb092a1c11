use super::types::{HarmonicRow, PivotError};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::str::FromStr;

/// Number of fields a usable input row carries
pub const ROW_FIELDS: usize = 5;

const COLUMNS: [&str; ROW_FIELDS] = ["harmonic", "trackNumber", "freq", "amp", "newFlag"];

/// Reads every five-field row from a headerless CSV stream.
///
/// Records with any other field count are skipped without comment, which
/// also drops header lines and the converter's 11-column records. A
/// five-field record that does not parse fails the whole read.
///
/// # Errors
/// * If the stream cannot be read as CSV
/// * If a five-field record holds a non-numeric value
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<HarmonicRow>, PivotError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        if record.len() != ROW_FIELDS {
            skipped += 1;
            continue;
        }
        rows.push(parse_record(&record)?);
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} records without {} fields", skipped, ROW_FIELDS);
    }
    Ok(rows)
}

/// Largest track number in `rows`; it marks the end of every set.
pub fn max_track(rows: &[HarmonicRow]) -> Result<i64, PivotError> {
    rows.iter()
        .map(|row| row.track_number)
        .max()
        .ok_or(PivotError::EmptyInput)
}

fn parse_record(record: &StringRecord) -> Result<HarmonicRow, PivotError> {
    let line = record.position().map_or(0, |pos| pos.line());
    Ok(HarmonicRow {
        harmonic: parse_field(record, 0, line)?,
        track_number: parse_field(record, 1, line)?,
        freq: parse_field(record, 2, line)?,
        amp: parse_field(record, 3, line)?,
        new_flag: parse_field(record, 4, line)?,
    })
}

fn parse_field<T: FromStr>(record: &StringRecord, index: usize, line: u64) -> Result<T, PivotError> {
    let raw = record.get(index).unwrap_or_default();
    raw.trim().parse().map_err(|_| PivotError::MalformedField {
        line,
        column: COLUMNS[index],
        value: raw.to_string(),
    })
}
