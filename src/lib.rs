//! Batch converters for overtone tracker output.
//!
//! - [`convert`] turns the tracker's semicolon-terminated text dump into CSV.
//! - [`pivot`] folds per-harmonic CSV rows into one decibel row per note.
pub mod config;
pub mod convert;
pub mod pivot;
