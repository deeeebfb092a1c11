use super::types::{ConvertConfig, ConvertError, ConvertSummary, HEADER, PIVOT_COLUMNS};
use csv::{Writer, WriterBuilder};
use std::io::{BufRead, Write};

const TERMINATOR: char = ';';

/// Converts a tracker dump into CSV.
///
/// Everything up to and including the first line starting with the marker is
/// ignored. After that, whitespace-separated tokens are collected across
/// lines until a line ends in `;`, and each collected record becomes one
/// CSV row. Later marker lines are skipped.
///
/// # Errors
/// * `MarkerNotFound` if the input has no marker line
/// * If reading the input or writing the CSV fails
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    config: &ConvertConfig,
) -> Result<ConvertSummary, ConvertError> {
    let mut lines = reader.lines();
    let mut found = false;
    for line in lines.by_ref() {
        if line?.trim().starts_with(&config.marker) {
            found = true;
            break;
        }
    }
    if !found {
        return Err(ConvertError::MarkerNotFound(config.marker.clone()));
    }

    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    if !config.select_pivot_columns {
        wtr.write_record(HEADER)?;
    }

    let mut summary = ConvertSummary::default();
    let mut record: Vec<String> = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim();
        let (body, end_of_record) = match line.strip_suffix(TERMINATOR) {
            Some(body) => (body, true),
            None => (line, false),
        };
        if body.starts_with(&config.marker) {
            continue;
        }
        record.extend(body.split_whitespace().map(str::to_string));

        if end_of_record && !record.is_empty() {
            write_record(&mut wtr, &record, config, &mut summary)?;
            record.clear();
        }
    }
    wtr.flush()?;

    if !record.is_empty() {
        tracing::warn!(
            "Discarding {} tokens after the last '{}'",
            record.len(),
            TERMINATOR
        );
        summary.unterminated_tokens = record.len();
    }
    tracing::info!("Wrote {} records", summary.records);
    Ok(summary)
}

fn write_record<W: Write>(
    wtr: &mut Writer<W>,
    record: &[String],
    config: &ConvertConfig,
    summary: &mut ConvertSummary,
) -> Result<(), ConvertError> {
    if !config.select_pivot_columns {
        wtr.write_record(record)?;
        summary.records += 1;
        return Ok(());
    }

    match project(record) {
        Some(fields) => {
            wtr.write_record(fields)?;
            summary.records += 1;
        }
        None => {
            tracing::warn!(
                "Skipping record with {} fields, need {} for pivot columns",
                record.len(),
                PIVOT_COLUMNS[PIVOT_COLUMNS.len() - 1] + 1
            );
            summary.skipped += 1;
        }
    }
    Ok(())
}

fn project(record: &[String]) -> Option<Vec<&str>> {
    PIVOT_COLUMNS
        .iter()
        .map(|&index| record.get(index).map(String::as_str))
        .collect()
}
