use std::f64::consts::LN_10;

/// Level reported for a silent (or missing) amplitude
pub const SILENT_DB: f64 = -1500.0;

/// Level reported when the reference amplitude is silent
pub const UNBOUNDED_DB: f64 = 1500.0;

/// Offset that places unity amplitude (and the fundamental) at 100 dB
pub const REFERENCE_DB: f64 = 100.0;

const DB_PER_NEPER: f64 = 20.0 / LN_10;

/// Ratio of two linear amplitudes in dB.
///
/// `a <= 0` gives [`SILENT_DB`]; otherwise `b <= 0` gives [`UNBOUNDED_DB`].
pub fn ampratio_to_db(a: f64, b: f64) -> f64 {
    if a <= 0.0 {
        return SILENT_DB;
    }
    if b <= 0.0 {
        return UNBOUNDED_DB;
    }
    DB_PER_NEPER * (a / b).ln()
}

/// Linear amplitude to dB, with unity at [`REFERENCE_DB`].
pub fn rms_to_db(a: f64) -> f64 {
    if a <= 0.0 {
        return SILENT_DB;
    }
    REFERENCE_DB + DB_PER_NEPER * a.ln()
}
