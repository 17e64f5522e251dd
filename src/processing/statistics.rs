//! Cross-recording amplitude statistics for one stimulus bin

use crate::error::{EmgError, EmgResult};
use crate::processing::amplitude::{windowed_average_amplitude, AmplitudeWindow};
use crate::processing::binning::{BinGrid, VoltageBin};
use crate::session::Recording;
use serde::Serialize;

/// Population mean and standard deviation (divisor N) of a set of amplitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmplitudeSummary {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

impl AmplitudeSummary {
    /// `None` for an empty set
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
            count: values.len(),
        })
    }
}

/// M-wave and H-reflex summaries over the recordings of one bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmplitudeStatistics {
    pub m_wave: AmplitudeSummary,
    pub h_reflex: AmplitudeSummary,
}

impl AmplitudeStatistics {
    /// `(m_mean, m_std, h_mean, h_std)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.m_wave.mean,
            self.m_wave.std,
            self.h_reflex.mean,
            self.h_reflex.std,
        )
    }
}

/// Pool the recordings whose stimulus voltage falls in `target` and summarize
/// their M-wave and H-reflex amplitudes on `channel_index`.
///
/// No matching recordings is an [`EmgError::EmptyAggregationWindow`], as is a
/// response window that selects no samples.
pub fn aggregate_statistics<'a, I>(
    recordings: I,
    target: VoltageBin,
    channel_index: usize,
    m_window: AmplitudeWindow,
    h_window: AmplitudeWindow,
    grid: BinGrid,
    scan_rate: f64,
) -> EmgResult<AmplitudeStatistics>
where
    I: IntoIterator<Item = &'a Recording>,
{
    let mut m_wave_amplitudes = Vec::new();
    let mut h_reflex_amplitudes = Vec::new();

    for recording in recordings {
        if grid.bin(recording.stimulus_v)? != target {
            continue;
        }
        let channel_data = recording.channel(channel_index)?;
        m_wave_amplitudes.push(windowed_average_amplitude(
            channel_data,
            m_window.start_ms,
            m_window.end_ms,
            scan_rate,
        )?);
        h_reflex_amplitudes.push(windowed_average_amplitude(
            channel_data,
            h_window.start_ms,
            h_window.end_ms,
            scan_rate,
        )?);
    }

    match (
        AmplitudeSummary::from_values(&m_wave_amplitudes),
        AmplitudeSummary::from_values(&h_reflex_amplitudes),
    ) {
        (Some(m_wave), Some(h_reflex)) => Ok(AmplitudeStatistics { m_wave, h_reflex }),
        _ => Err(EmgError::empty_window(format!(
            "no recordings in the {} V bin",
            grid.voltage(target)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(stimulus_v: f64, level: f64) -> Recording {
        // 1 kHz, 10 samples: M window 2..4, H window 4..7
        let mut samples = vec![0.0; 10];
        for s in &mut samples[2..4] {
            *s = -level;
        }
        for s in &mut samples[4..7] {
            *s = level / 2.0;
        }
        Recording {
            stimulus_v,
            channel_data: vec![samples],
        }
    }

    fn windows() -> (AmplitudeWindow, AmplitudeWindow) {
        (AmplitudeWindow::new(2.0, 4.0), AmplitudeWindow::new(4.0, 7.0))
    }

    #[test]
    fn test_summary_population_std() {
        let summary = AmplitudeSummary::from_values(&[1.0, 3.0]).unwrap();
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.std, 1.0);
        assert_eq!(summary.count, 2);

        let single = AmplitudeSummary::from_values(&[4.0]).unwrap();
        assert_eq!(single.std, 0.0);

        assert!(AmplitudeSummary::from_values(&[]).is_none());
    }

    #[test]
    fn test_pools_only_matching_bin() {
        let recordings = vec![
            recording(1.01, 1.0),
            recording(1.04, 2.0),
            recording(1.06, 4.0),
        ];
        let grid = BinGrid::new(0.05).unwrap();
        let (m, h) = windows();

        let target = grid.bin(1.05).unwrap();

        let stats = aggregate_statistics(&recordings, target, 0, m, h, grid, 1000.0).unwrap();

        assert_eq!(stats.m_wave.count, 2);
        assert_eq!(stats.m_wave.mean, 3.0);
        assert_eq!(stats.m_wave.std, 1.0);
        assert_eq!(stats.h_reflex.mean, 1.5);
        assert_eq!(stats.h_reflex.std, 0.5);

        let (m_mean, m_std, h_mean, h_std) = stats.as_tuple();
        assert_eq!((m_mean, m_std, h_mean, h_std), (3.0, 1.0, 1.5, 0.5));
    }

    #[test]
    fn test_no_matching_recordings() {
        let recordings = vec![recording(1.0, 1.0)];
        let grid = BinGrid::new(0.05).unwrap();
        let (m, h) = windows();

        let target = grid.bin(2.0).unwrap();

        let result = aggregate_statistics(&recordings, target, 0, m, h, grid, 1000.0);
        assert!(matches!(result, Err(EmgError::EmptyAggregationWindow { .. })));
    }

    #[test]
    fn test_channel_out_of_range() {
        let recordings = vec![recording(1.0, 1.0)];
        let grid = BinGrid::new(0.05).unwrap();
        let (m, h) = windows();

        let target = grid.bin(1.0).unwrap();

        let result = aggregate_statistics(&recordings, target, 3, m, h, grid, 1000.0);
        assert!(matches!(
            result,
            Err(EmgError::ChannelOutOfRange { channel: 3, num_channels: 1 })
        ));
    }
}
