//! Time/sample conversions
//!
//! Millisecond offsets become sample indices by truncation,
//! `floor(time_ms * scan_rate / 1000)`, matching how response windows are
//! sliced everywhere in the crate.

use crate::config::constants::units::MILLISECONDS_PER_SECOND;

/// Convert a millisecond offset to a sample index (truncating).
///
/// Negative offsets clamp to index 0.
pub fn ms_to_sample_index(time_ms: f64, scan_rate: f64) -> usize {
    let index = (time_ms * scan_rate / MILLISECONDS_PER_SECOND).floor();
    if index <= 0.0 || index.is_nan() {
        0
    } else {
        index as usize
    }
}

/// Time of a sample index in milliseconds
pub fn sample_index_to_ms(index: usize, scan_rate: f64) -> f64 {
    index as f64 * MILLISECONDS_PER_SECOND / scan_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_sample_index_truncates() {
        assert_eq!(ms_to_sample_index(2.0, 10_000.0), 20);
        assert_eq!(ms_to_sample_index(4.0, 10_000.0), 40);
        // 2.09 ms at 1 kHz is 2.09 samples
        assert_eq!(ms_to_sample_index(2.09, 1000.0), 2);
        assert_eq!(ms_to_sample_index(2.99, 1000.0), 2);
    }

    #[test]
    fn test_negative_offset_clamps() {
        assert_eq!(ms_to_sample_index(-3.0, 1000.0), 0);
    }

    #[test]
    fn test_sample_index_to_ms() {
        assert_eq!(sample_index_to_ms(0, 10_000.0), 0.0);
        assert!((sample_index_to_ms(25, 10_000.0) - 2.5).abs() < 1e-12);
    }
}
