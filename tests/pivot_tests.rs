// Harmonic pivot tests
//
// These tests focus on the pivot from per-harmonic rows to one decibel row per
// note. They cover the dB conversions and their sentinels, routing of
// harmonics into slots, set boundaries, and the failure modes of ingest.

use overtone_tools::pivot::{
    self, ampratio_to_db, header, max_track, pivot_rows, read_rows, rms_to_db, HarmonicSet,
    PivotError, REFERENCE_DB, SILENT_DB, UNBOUNDED_DB,
};
use std::fs::File;

use test_utils::{assert_db_eq, row, PIVOT_HEADER_ONLY, PIVOT_MALFORMED, PIVOT_SAMPLE};

/// Test the amplitude ratio conversion and its sentinels.
#[test]
fn test_ampratio_to_db() {
    assert_eq!(ampratio_to_db(0.7, 0.7), 0.0);
    assert_eq!(ampratio_to_db(3.0, 3.0), 0.0);
    assert_eq!(ampratio_to_db(0.0, 5.0), SILENT_DB);
    assert_eq!(ampratio_to_db(-1.0, 5.0), -1500.0);
    assert_eq!(ampratio_to_db(5.0, 0.0), UNBOUNDED_DB);
    assert_eq!(ampratio_to_db(5.0, 0.0), 1500.0);

    // A silent numerator wins over a silent reference
    assert_eq!(ampratio_to_db(0.0, 0.0), SILENT_DB);

    assert_db_eq(ampratio_to_db(10.0, 1.0), 20.0);
    assert_db_eq(ampratio_to_db(1.0, 10.0), -20.0);
}

/// Test the absolute level conversion.
#[test]
fn test_rms_to_db() {
    assert_eq!(rms_to_db(1.0), REFERENCE_DB);
    assert_eq!(rms_to_db(0.0), SILENT_DB);
    assert_eq!(rms_to_db(-2.0), SILENT_DB);
    assert_db_eq(rms_to_db(10.0), 120.0);
    assert_db_eq(rms_to_db(0.1), 80.0);

    for amp in [1e-300, 1e-12, 0.5, 7.0] {
        assert!(rms_to_db(amp) > SILENT_DB, "{} should not be silent", amp);
    }
}

/// Test the header layout.
#[test]
fn test_header() {
    assert_eq!(
        header(2),
        vec!["pitch", "dB", "1", "2", "tweeters", "outliers"]
    );
    assert_eq!(header(20).len(), 24);
    assert_eq!(header(20)[21], "20");
}

/// Test harmonic routing into dedicated, tweeter and outlier slots.
#[test]
fn test_slot_routing() {
    let set = HarmonicSet::new(3);
    assert_eq!(set.slot_index(1), 0);
    assert_eq!(set.slot_index(3), 2);
    assert_eq!(set.slot_index(4), 3);
    assert_eq!(set.slot_index(400), 3);
    assert_eq!(set.slot_index(0), 4);
    assert_eq!(set.slot_index(-2), 4);
}

/// Test a single set where the fundamental appears twice.
///
/// The later fundamental row overwrites the frequency, the first slot sums
/// both amplitudes, and empty slots come out 1400 dB below the fundamental.
#[test]
fn test_single_set_last_fundamental_wins() {
    let rows = vec![
        row(1, 1, 440.0, 2.0, 0),
        row(2, 1, 0.0, 1.0, 0),
        row(1, 2, 0.0, 3.0, 0),
    ];

    let mut set = HarmonicSet::new(3);
    for r in &rows {
        set.add(r);
    }
    assert_eq!(set.slots(), &[5.0, 1.0, 0.0, 0.0, 0.0]);
    assert_eq!(set.fundamental(), Some(0.0));

    let output = pivot_rows(&rows, 3).expect("Failed to pivot rows");
    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.dropped_rows, 0);

    let pivoted = &output.rows[0];
    assert_eq!(pivoted.fundamental, Some(0.0));
    assert_db_eq(pivoted.total_db, rms_to_db(6.0));
    assert_eq!(pivoted.slot_db.len(), 5);
    assert_eq!(pivoted.slot_db[0], 100.0);
    assert_db_eq(pivoted.slot_db[1], 100.0 + ampratio_to_db(1.0, 5.0));
    assert_eq!(pivoted.slot_db[2], -1400.0);
    assert_eq!(pivoted.slot_db[3], -1400.0);
    assert_eq!(pivoted.slot_db[4], -1400.0);
}

/// Test that a set without a fundamental row has no pitch and an unbounded
/// level for every non-silent slot.
#[test]
fn test_set_without_fundamental() {
    let rows = vec![row(2, 1, 220.0, 0.5, 0), row(3, 2, 330.0, 0.25, 0)];
    let output = pivot_rows(&rows, 2).expect("Failed to pivot rows");

    let pivoted = &output.rows[0];
    assert_eq!(pivoted.fundamental, None);
    assert_eq!(pivoted.slot_db[0], 100.0);
    assert_eq!(pivoted.slot_db[1], 100.0 + UNBOUNDED_DB);
    assert_eq!(pivoted.slot_db[2], 100.0 + UNBOUNDED_DB);
    assert_eq!(pivoted.slot_db[3], 100.0 + SILENT_DB);
}

/// Test that consecutive sets are independent.
#[test]
fn test_consecutive_sets_reset() {
    let rows = vec![
        row(1, 1, 100.0, 1.0, 0),
        row(2, 2, 200.0, 1.0, 0),
        row(2, 1, 400.0, 0.5, 0),
        row(1, 2, 201.0, 2.0, 0),
    ];
    let output = pivot_rows(&rows, 2).expect("Failed to pivot rows");
    assert_eq!(output.rows.len(), 2);

    let first = &output.rows[0];
    assert_eq!(first.fundamental, Some(100.0));
    assert_db_eq(first.total_db, rms_to_db(2.0));
    assert_db_eq(first.slot_db[1], 100.0);

    let second = &output.rows[1];
    assert_eq!(second.fundamental, Some(201.0));
    assert_db_eq(second.total_db, rms_to_db(2.5));
    assert_db_eq(second.slot_db[1], 100.0 + ampratio_to_db(0.5, 2.0));
}

/// Test that a set closes on the global maximum track, even when the set
/// skips intermediate track numbers, and that unfinished rows are counted.
#[test]
fn test_set_boundaries_and_trailing_rows() {
    let rows = vec![
        row(1, 1, 100.0, 1.0, 0),
        row(1, 5, 100.0, 1.0, 0),
        row(1, 5, 110.0, 1.0, 0),
        row(1, 2, 120.0, 1.0, 0),
        row(2, 3, 240.0, 1.0, 0),
    ];
    assert_eq!(max_track(&rows).unwrap(), 5);

    let output = pivot_rows(&rows, 4).expect("Failed to pivot rows");
    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.rows[1].fundamental, Some(110.0));
    assert_eq!(output.dropped_rows, 2);
}

/// Test ingest of a file with a header line and two complete sets.
#[test]
fn test_read_sample_file() {
    let file = File::open(PIVOT_SAMPLE).expect("Failed to open sample");
    let rows = read_rows(file).expect("Failed to read rows");

    // The 11-column header is not a five-field row
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], row(1, 1, 110.0, 0.5, 0));
    assert_eq!(rows[3].new_flag, 1);
    assert_eq!(max_track(&rows).unwrap(), 3);

    let output = pivot_rows(&rows, 20).expect("Failed to pivot rows");
    assert_eq!(output.rows.len(), 2);

    let first = &output.rows[0];
    assert_eq!(first.fundamental, Some(111.0));
    assert_db_eq(first.total_db, rms_to_db(1.905));
    assert_db_eq(first.slot_db[1], 100.0 + ampratio_to_db(0.25, 1.5));
    assert_db_eq(first.slot_db[2], 100.0 + ampratio_to_db(0.125, 1.5));
    assert_db_eq(first.slot_db[20], 100.0 + ampratio_to_db(0.01, 1.5));
    assert_db_eq(first.slot_db[21], 100.0 + ampratio_to_db(0.02, 1.5));

    let second = &output.rows[1];
    assert_eq!(second.fundamental, Some(221.0));
    assert_db_eq(second.total_db, rms_to_db(2.5));
    assert_db_eq(second.slot_db[1], 100.0 + ampratio_to_db(0.5, 2.0));
}

/// Test that rows with the wrong field count never reach the accumulator,
/// including their track numbers.
#[test]
fn test_wrong_field_counts_ignored() {
    let data = "1,1,100.0,1.0,0\n9,99,1.0,1.0\n1,2,100.0,1.0,0\n7,50,1.0,1.0,0,0\n";
    let rows = read_rows(data.as_bytes()).expect("Failed to read rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(max_track(&rows).unwrap(), 2);

    let output = pivot_rows(&rows, 10).expect("Failed to pivot rows");
    assert_eq!(output.rows.len(), 1);
    assert_db_eq(output.rows[0].total_db, rms_to_db(2.0));
}

/// Test that fields are trimmed before parsing.
#[test]
fn test_padded_fields() {
    let rows = read_rows(" 1, 3 , 82.4,0.25 ,1\n".as_bytes()).expect("Failed to read rows");
    assert_eq!(rows, vec![row(1, 3, 82.4, 0.25, 1)]);
}

/// Test ingest and pivot error cases.
#[test]
fn test_pivot_error_cases() {
    let file = File::open(PIVOT_MALFORMED).expect("Failed to open sample");
    match read_rows(file) {
        Err(PivotError::MalformedField {
            line,
            column,
            value,
        }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "amp");
            assert_eq!(value, "loud");
        }
        other => panic!("Expected malformed field error, got {:?}", other),
    }

    // Integer columns reject fractional values
    assert!(matches!(
        read_rows("1.5,1,100.0,1.0,0\n".as_bytes()),
        Err(PivotError::MalformedField {
            column: "harmonic",
            ..
        })
    ));

    let file = File::open(PIVOT_HEADER_ONLY).expect("Failed to open sample");
    let rows = read_rows(file).expect("Failed to read rows");
    assert!(rows.is_empty());
    assert!(matches!(max_track(&rows), Err(PivotError::EmptyInput)));
    assert!(matches!(pivot_rows(&rows, 20), Err(PivotError::EmptyInput)));

    let rows = vec![row(1, 1, 100.0, 1.0, 0)];
    assert!(matches!(
        pivot_rows(&rows, 0),
        Err(PivotError::InvalidParams(_))
    ));
}

/// Test output path derivation.
#[test]
fn test_output_path() {
    let derived = pivot::output_path(std::path::Path::new("data/bassnote.wav-oout.csv"))
        .expect("Failed to derive output path");
    assert_eq!(derived, std::path::Path::new("data/bassnote.wav-hpivot.csv"));

    // Only the file name is rewritten
    let derived = pivot::output_path(std::path::Path::new("oout/take.wav-oout.csv"))
        .expect("Failed to derive output path");
    assert_eq!(derived, std::path::Path::new("oout/take.wav-hpivot.csv"));

    assert!(matches!(
        pivot::output_path(std::path::Path::new("data/bassnote.csv")),
        Err(PivotError::OutputCollision(_))
    ));
}
