//! Rectification and windowed amplitude measures

use crate::config::ConfigError;
use crate::error::{EmgError, EmgResult};
use crate::utils::conversion::ms_to_sample_index;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A response window in milliseconds after stimulus onset (M-wave or H-reflex)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl AmplitudeWindow {
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    /// A window that is finite, starts at or after onset, and ends after it starts
    pub fn checked(start_ms: f64, end_ms: f64) -> EmgResult<Self> {
        if !(start_ms.is_finite() && end_ms.is_finite() && start_ms >= 0.0) {
            return Err(ConfigError::ValidationError(vec![format!(
                "window must be finite and non-negative, got {start_ms}..{end_ms} ms"
            )])
            .into());
        }
        if start_ms >= end_ms {
            return Err(ConfigError::ValidationError(vec![format!(
                "window start ({start_ms} ms) must be before its end ({end_ms} ms)"
            )])
            .into());
        }
        Ok(Self::new(start_ms, end_ms))
    }

    /// Half-open sample range `[floor(start), floor(end))`, not clamped
    pub fn sample_range(&self, scan_rate: f64) -> Range<usize> {
        ms_to_sample_index(self.start_ms, scan_rate)..ms_to_sample_index(self.end_ms, scan_rate)
    }

    /// Slice `samples` to this window.
    ///
    /// The range is clamped to the available samples; an empty result is an
    /// [`EmgError::EmptyAggregationWindow`].
    pub fn slice<'a>(&self, samples: &'a [f64], scan_rate: f64) -> EmgResult<&'a [f64]> {
        let range = self.sample_range(scan_rate);
        let end = range.end.min(samples.len());
        let start = range.start.min(end);
        if start == end {
            return Err(EmgError::empty_window(format!(
                "{}-{} ms selects samples {}..{} of {}",
                self.start_ms,
                self.end_ms,
                range.start,
                range.end,
                samples.len()
            )));
        }
        Ok(&samples[start..end])
    }
}

/// Full-wave rectification (elementwise absolute value)
pub fn rectify(samples: &[f64]) -> Vec<f64> {
    samples.iter().map(|x| x.abs()).collect()
}

/// Mean rectified amplitude between `start_ms` and `end_ms`
pub fn windowed_average_amplitude(
    channel_samples: &[f64],
    start_ms: f64,
    end_ms: f64,
    scan_rate: f64,
) -> EmgResult<f64> {
    let window = AmplitudeWindow::new(start_ms, end_ms).slice(channel_samples, scan_rate)?;
    Ok(mean_absolute_value(window))
}

/// `max - min` of the raw samples, `None` for an empty slice
pub fn peak_to_peak(samples: &[f64]) -> Option<f64> {
    let (min, max) = samples.iter().fold(None, |acc: Option<(f64, f64)>, &x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })?;
    Some(max - min)
}

fn mean_absolute_value(data: &[f64]) -> f64 {
    data.iter().map(|x| x.abs()).sum::<f64>() / data.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_window() {
        assert_eq!(
            AmplitudeWindow::checked(2.0, 4.0).unwrap(),
            AmplitudeWindow::new(2.0, 4.0)
        );
        let rejected = [
            (f64::NAN, 4.0),
            (2.0, f64::INFINITY),
            (-1.0, 4.0),
            (4.0, 2.0),
            (3.0, 3.0),
        ];
        for (start, end) in rejected {
            assert!(
                matches!(
                    AmplitudeWindow::checked(start, end),
                    Err(EmgError::Configuration(ConfigError::ValidationError(_)))
                ),
                "{start}..{end} should be rejected"
            );
        }
    }

    #[test]
    fn test_rectify() {
        assert_eq!(rectify(&[0.0, -1.5, 2.0, -0.0]), vec![0.0, 1.5, 2.0, 0.0]);
        assert!(rectify(&[]).is_empty());
    }

    #[test]
    fn test_windowed_average_amplitude_exact_slice() {
        // 1 kHz: 2 ms -> index 2, 4 ms -> index 4
        let samples = [9.0, 9.0, -1.0, 3.0, 9.0, 9.0];
        let amplitude = windowed_average_amplitude(&samples, 2.0, 4.0, 1000.0).unwrap();
        assert_eq!(amplitude, 2.0);
    }

    #[test]
    fn test_window_clamps_to_sample_length() {
        let samples = [1.0, -2.0, 3.0, -4.0];
        let amplitude = windowed_average_amplitude(&samples, 2.0, 50.0, 1000.0).unwrap();
        assert_eq!(amplitude, 3.5);
    }

    #[test]
    fn test_empty_window_is_explicit() {
        let samples = [1.0; 10];
        // start == end
        assert!(matches!(
            windowed_average_amplitude(&samples, 3.0, 3.0, 1000.0),
            Err(EmgError::EmptyAggregationWindow { .. })
        ));
        // inverted
        assert!(windowed_average_amplitude(&samples, 5.0, 2.0, 1000.0).is_err());
        // beyond the recording
        assert!(windowed_average_amplitude(&samples, 20.0, 30.0, 1000.0).is_err());
    }

    #[test]
    fn test_peak_to_peak() {
        assert_eq!(peak_to_peak(&[0.1, -0.2, 0.3]), Some(0.5));
        assert_eq!(peak_to_peak(&[2.0]), Some(0.0));
        assert_eq!(peak_to_peak(&[]), None);
    }

    #[test]
    fn test_sample_range() {
        let window = AmplitudeWindow::new(4.0, 7.0);
        assert_eq!(window.sample_range(10_000.0), 40..70);
    }
}
