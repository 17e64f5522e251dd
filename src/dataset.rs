//! Multi-session dataset
//!
//! A [`Dataset`] pools the recordings of several loaded sessions and bins
//! them by stimulus voltage so that trials of slightly different intensity
//! can be averaged into one reflex curve. Sessions must share `scan_rate`
//! and `num_channels`; this is checked at construction.

use crate::config::AnalysisConfig;
use crate::error::{EmgError, EmgResult};
use crate::processing::{
    aggregate_statistics, AmplitudeStatistics, AmplitudeWindow, BinGrid, VoltageBin,
};
use crate::session::{ChannelLabels, Recording, Session};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// One bin of a reflex curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflexCurvePoint {
    /// Binned stimulus voltage (V)
    pub voltage: f64,
    pub bin: VoltageBin,
    pub stats: AmplitudeStatistics,
}

impl ReflexCurvePoint {
    /// `(voltage, m_mean, m_std, h_mean, h_std)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64) {
        let (m_mean, m_std, h_mean, h_std) = self.stats.as_tuple();
        (self.voltage, m_mean, m_std, h_mean, h_std)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReflexCurve {
    pub label: String,
    pub points: Vec<ReflexCurvePoint>,
}

/// Reflex curves for every channel of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflexCurveSet {
    pub bin_size: f64,
    pub curves: Vec<ChannelReflexCurve>,
    #[serde(skip)]
    pub label_warning: Option<crate::error::ChannelNameMismatch>,
}

/// Pooled view over sessions with identical recording parameters
#[derive(Debug, Clone)]
pub struct Dataset {
    sessions: Vec<Session>,
    scan_rate: f64,
    num_channels: usize,
    m_window: AmplitudeWindow,
    h_window: AmplitudeWindow,
    bin_size: f64,
}

impl Dataset {
    /// Build a dataset from loaded sessions.
    ///
    /// Fails with [`EmgError::EmptyDataset`] for an empty list,
    /// [`EmgError::NotLoaded`] if any session is unloaded, and
    /// [`EmgError::InhomogeneousDataset`] when a session's `scan_rate` or
    /// `num_channels` differs from the first session's.
    pub fn new(sessions: Vec<Session>, config: &AnalysisConfig) -> EmgResult<Self> {
        let first = sessions.first().ok_or(EmgError::EmptyDataset)?;
        let scan_rate = first.scan_rate()?;
        let num_channels = first.num_channels()?;

        for session in &sessions[1..] {
            let info = session.info()?;
            if info.scan_rate != scan_rate {
                return Err(EmgError::InhomogeneousDataset {
                    field: "scan_rate",
                    session: info.session_name.clone(),
                    expected: scan_rate.to_string(),
                    actual: info.scan_rate.to_string(),
                });
            }
            if info.num_channels != num_channels {
                return Err(EmgError::InhomogeneousDataset {
                    field: "num_channels",
                    session: info.session_name.clone(),
                    expected: num_channels.to_string(),
                    actual: info.num_channels.to_string(),
                });
            }
        }

        debug!(
            sessions = sessions.len(),
            scan_rate, num_channels, "dataset constructed"
        );

        Ok(Self {
            sessions,
            scan_rate,
            num_channels,
            m_window: config.m_window(),
            h_window: config.h_window(),
            bin_size: config.bin_size,
        })
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn scan_rate(&self) -> f64 {
        self.scan_rate
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn m_window(&self) -> AmplitudeWindow {
        self.m_window
    }

    pub fn h_window(&self) -> AmplitudeWindow {
        self.h_window
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    pub fn set_m_window(&mut self, start_ms: f64, end_ms: f64) -> EmgResult<()> {
        self.m_window = AmplitudeWindow::checked(start_ms, end_ms)?;
        Ok(())
    }

    pub fn set_h_window(&mut self, start_ms: f64, end_ms: f64) -> EmgResult<()> {
        self.h_window = AmplitudeWindow::checked(start_ms, end_ms)?;
        Ok(())
    }

    pub fn set_bin_size(&mut self, bin_size: f64) -> EmgResult<()> {
        self.bin_size = BinGrid::new(bin_size)?.bin_size();
        Ok(())
    }

    /// Every member recording, ascending by stimulus voltage (stable).
    ///
    /// Rebuilt on each call.
    pub fn pooled_recordings(&self) -> Vec<&Recording> {
        let mut pooled: Vec<&Recording> = self
            .sessions
            .iter()
            // sessions are validated as loaded in `new`
            .filter_map(|s| s.recordings().ok())
            .flatten()
            .collect();
        pooled.sort_by(|a, b| a.cmp_stimulus(b));
        pooled
    }

    /// Distinct occupied bins, ascending
    pub fn voltage_bins(&self, grid: BinGrid) -> EmgResult<Vec<VoltageBin>> {
        let bins = self
            .pooled_recordings()
            .iter()
            .map(|r| grid.bin(r.stimulus_v))
            .collect::<EmgResult<BTreeSet<_>>>()?;
        Ok(bins.into_iter().collect())
    }

    /// Distinct binned stimulus voltages, ascending
    pub fn binned_voltage_levels(&self, bin_size: f64) -> EmgResult<Vec<f64>> {
        let grid = BinGrid::new(bin_size)?;
        Ok(self
            .voltage_bins(grid)?
            .into_iter()
            .map(|bin| grid.voltage(bin))
            .collect())
    }

    /// Mean and standard deviation of M-wave and H-reflex amplitude per
    /// occupied voltage bin on one channel
    pub fn reflex_curve(
        &self,
        channel_index: usize,
        m_window: AmplitudeWindow,
        h_window: AmplitudeWindow,
        bin_size: f64,
    ) -> EmgResult<Vec<ReflexCurvePoint>> {
        if channel_index >= self.num_channels {
            return Err(EmgError::ChannelOutOfRange {
                channel: channel_index,
                num_channels: self.num_channels,
            });
        }
        let grid = BinGrid::new(bin_size)?;
        let pooled = self.pooled_recordings();

        self.voltage_bins(grid)?
            .into_iter()
            .map(|bin| {
                let stats = aggregate_statistics(
                    pooled.iter().copied(),
                    bin,
                    channel_index,
                    m_window,
                    h_window,
                    grid,
                    self.scan_rate,
                )?;
                Ok(ReflexCurvePoint {
                    voltage: grid.voltage(bin),
                    bin,
                    stats,
                })
            })
            .collect()
    }

    pub fn channel_labels(&self, custom: Option<&[String]>) -> ChannelLabels {
        ChannelLabels::resolve(custom, self.num_channels)
    }

    /// [`Dataset::reflex_curve`] for every channel using the dataset's windows
    /// and bin size
    pub fn reflex_curves(&self, custom: Option<&[String]>) -> EmgResult<ReflexCurveSet> {
        let labels = self.channel_labels(custom);
        let curves = labels
            .names()
            .iter()
            .enumerate()
            .map(|(channel_index, label)| {
                Ok(ChannelReflexCurve {
                    label: label.clone(),
                    points: self.reflex_curve(
                        channel_index,
                        self.m_window,
                        self.h_window,
                        self.bin_size,
                    )?,
                })
            })
            .collect::<EmgResult<Vec<_>>>()?;

        Ok(ReflexCurveSet {
            bin_size: self.bin_size,
            curves,
            label_warning: labels.mismatch().cloned(),
        })
    }
}
