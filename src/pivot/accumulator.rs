use super::decibel::{ampratio_to_db, rms_to_db, REFERENCE_DB};
use super::ingest::max_track;
use super::types::{HarmonicRow, PivotError, PivotOutput, PivotRow};

/// Amplitude collected for one note, between two closing tracks.
///
/// Slots `0..max_harmonic` hold harmonics `1..=max_harmonic`, followed by the
/// tweeters slot (harmonics above the maximum) and the outliers slot
/// (harmonics below 1).
#[derive(Debug, Clone)]
pub struct HarmonicSet {
    slots: Vec<f64>,
    fundamental: Option<f64>,
    total_amp: f64,
    rows: usize,
}

impl HarmonicSet {
    pub fn new(max_harmonic: usize) -> Self {
        HarmonicSet {
            slots: vec![0.0; max_harmonic + 2],
            fundamental: None,
            total_amp: 0.0,
            rows: 0,
        }
    }

    /// Number of dedicated harmonic slots
    pub fn max_harmonic(&self) -> usize {
        self.slots.len() - 2
    }

    /// Slot that receives amplitude for `harmonic`
    pub fn slot_index(&self, harmonic: i64) -> usize {
        let max_harmonic = self.max_harmonic();
        match usize::try_from(harmonic) {
            Ok(h) if (1..=max_harmonic).contains(&h) => h - 1,
            Ok(h) if h > max_harmonic => max_harmonic,
            _ => max_harmonic + 1,
        }
    }

    /// Adds one row. A fundamental row replaces any earlier fundamental.
    pub fn add(&mut self, row: &HarmonicRow) {
        let index = self.slot_index(row.harmonic);
        self.slots[index] += row.amp;
        if row.harmonic == 1 {
            self.fundamental = Some(row.freq);
        }
        self.total_amp += row.amp;
        self.rows += 1;
    }

    /// Linear amplitude per slot
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    pub fn fundamental(&self) -> Option<f64> {
        self.fundamental
    }

    /// Rows added since the set was created
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Converts the collected amplitudes to a pivot row.
    ///
    /// The fundamental slot is pinned at [`REFERENCE_DB`] and every other slot
    /// is measured against its amplitude. The overall level comes from the
    /// raw per-row amplitudes, not from the slots.
    pub fn close(&self) -> PivotRow {
        let reference = self.slots[0];
        let slot_db = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, &amp)| {
                if index == 0 {
                    REFERENCE_DB
                } else {
                    REFERENCE_DB + ampratio_to_db(amp, reference)
                }
            })
            .collect();

        PivotRow {
            fundamental: self.fundamental,
            total_db: rms_to_db(self.total_amp),
            slot_db,
        }
    }
}

/// Folds `rows` into one pivot row per set.
///
/// A set closes on every row whose track number equals the largest track
/// number in the whole input. Trailing rows that never reach it are dropped
/// and counted in [`PivotOutput::dropped_rows`].
///
/// # Errors
/// * `EmptyInput` if `rows` is empty
/// * `InvalidParams` if `max_harmonic` is zero
pub fn pivot_rows(rows: &[HarmonicRow], max_harmonic: usize) -> Result<PivotOutput, PivotError> {
    if max_harmonic == 0 {
        return Err(PivotError::InvalidParams(
            "maxHarmonic must be at least 1".to_string(),
        ));
    }
    let closing_track = max_track(rows)?;

    let mut output = PivotOutput::default();
    let mut set = HarmonicSet::new(max_harmonic);
    for row in rows {
        set.add(row);
        if row.track_number == closing_track {
            let closed = set.close();
            tracing::debug!(
                "Closed set {} ({} rows, fundamental {:?}, {:.2} dB)",
                output.rows.len() + 1,
                set.len(),
                closed.fundamental,
                closed.total_db
            );
            output.rows.push(closed);
            set = HarmonicSet::new(max_harmonic);
        }
    }

    if !set.is_empty() {
        tracing::warn!(
            "Dropping {} trailing rows that never reached track {}",
            set.len(),
            closing_track
        );
        output.dropped_rows = set.len();
    }
    Ok(output)
}
