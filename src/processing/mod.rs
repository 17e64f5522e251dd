// src/processing/mod.rs
//! Amplitude calculations for M-wave and H-reflex analysis
//!
//! Pure, stateless numeric operations:
//! - Rectification and windowed mean rectified amplitude
//! - Stimulus voltage binning on a uniform grid
//! - Population mean / standard deviation across the recordings of one bin

pub mod amplitude;
pub mod binning;
pub mod statistics;

pub use amplitude::{peak_to_peak, rectify, windowed_average_amplitude, AmplitudeWindow};
pub use binning::{bin_stimulus_voltage, BinGrid, VoltageBin};
pub use statistics::{aggregate_statistics, AmplitudeStatistics, AmplitudeSummary};
