//! Raw waveform exports for display
//!
//! These carry samples and a time axis only; amplitude measures stay in
//! [`crate::processing`].

use crate::error::ChannelNameMismatch;
use crate::processing::AmplitudeWindow;
use serde::Serialize;

/// One recording's samples on one channel, truncated to the display window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub stimulus_v: f64,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelWaveforms {
    pub label: String,
    pub traces: Vec<Trace>,
}

/// Overlaid traces for every channel of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformSet {
    pub time_axis_ms: Vec<f64>,
    pub channels: Vec<ChannelWaveforms>,
    pub rectified: bool,
    /// Window markers for flagging the M-wave and H-reflex regions
    pub m_window: AmplitudeWindow,
    pub h_window: AmplitudeWindow,
    #[serde(skip)]
    pub label_warning: Option<ChannelNameMismatch>,
}

impl WaveformSet {
    pub fn trace_count(&self) -> usize {
        self.channels.iter().map(|c| c.traces.len()).sum()
    }
}

/// Amplitudes of a single recording, for the unbinned per-session curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflexPoint {
    pub stimulus_v: f64,
    pub m_amplitude: f64,
    pub h_amplitude: f64,
}
