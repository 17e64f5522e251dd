// src/session/mod.rs
//! Single recording session
//!
//! A [`Session`] starts `Unloaded`, becomes `Loaded` exactly once by reading a
//! persisted [`SessionRecord`], and stays loaded. Recordings are sorted by
//! stimulus voltage (stable) at load time and never re-sorted; every query
//! relies on that order.
//!
//! Analysis windows are copied from [`AnalysisConfig`] at construction and
//! may be overridden per session.

pub mod labels;
pub mod record;
pub mod waveform;

pub use labels::ChannelLabels;
pub use record::{Recording, SessionInfo, SessionRecord};
pub use waveform::{ChannelWaveforms, ReflexPoint, Trace, WaveformSet};

use crate::config::{AnalysisConfig, ConfigError};
use crate::error::{EmgError, EmgResult};
use crate::processing::{peak_to_peak, rectify, windowed_average_amplitude, AmplitudeWindow};
use crate::utils::conversion::{ms_to_sample_index, sample_index_to_ms};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
enum SessionState {
    Unloaded,
    Loaded(LoadedSession),
}

#[derive(Debug, Clone)]
struct LoadedSession {
    info: SessionInfo,
    recordings: Vec<Recording>,
}

/// One acquisition run
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    m_window: AmplitudeWindow,
    h_window: AmplitudeWindow,
    time_window_ms: f64,
    h_threshold: f64,
}

impl Session {
    /// An unloaded session carrying the analysis defaults from `config`
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            state: SessionState::Unloaded,
            m_window: config.m_window(),
            h_window: config.h_window(),
            time_window_ms: config.time_window,
            h_threshold: config.h_threshold,
        }
    }

    /// Construct and load from a JSON session file
    pub fn open<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> EmgResult<Self> {
        let mut session = Self::new(config);
        session.load_from_path(path)?;
        Ok(session)
    }

    /// Construct and load from an already-parsed record
    pub fn from_record(record: SessionRecord, config: &AnalysisConfig) -> EmgResult<Self> {
        let mut session = Self::new(config);
        session.load(record)?;
        Ok(session)
    }

    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> EmgResult<()> {
        self.ensure_unloaded()?;
        let file = File::open(path.as_ref())?;
        self.load_from_reader(BufReader::new(file))
    }

    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> EmgResult<()> {
        self.ensure_unloaded()?;
        // parsing already validated the record
        let record = SessionRecord::from_reader(reader)?;
        self.install(record);
        Ok(())
    }

    /// Transition `Unloaded -> Loaded`.
    ///
    /// Validates the record and sorts its recordings ascending by stimulus
    /// voltage, keeping the file order of equal voltages.
    pub fn load(&mut self, record: SessionRecord) -> EmgResult<()> {
        self.ensure_unloaded()?;
        record.validate()?;
        self.install(record);
        Ok(())
    }

    fn install(&mut self, record: SessionRecord) {
        let SessionRecord {
            session_info,
            mut recordings,
        } = record;
        recordings.sort_by(Recording::cmp_stimulus);

        debug!(
            session = %session_info.session_name,
            channels = session_info.num_channels,
            recordings = recordings.len(),
            "session loaded"
        );

        self.state = SessionState::Loaded(LoadedSession {
            info: session_info,
            recordings,
        });
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    fn ensure_unloaded(&self) -> EmgResult<()> {
        match &self.state {
            SessionState::Unloaded => Ok(()),
            SessionState::Loaded(loaded) => Err(EmgError::AlreadyLoaded {
                session_name: loaded.info.session_name.clone(),
            }),
        }
    }

    fn loaded(&self) -> EmgResult<&LoadedSession> {
        match &self.state {
            SessionState::Loaded(loaded) => Ok(loaded),
            SessionState::Unloaded => Err(EmgError::NotLoaded),
        }
    }

    pub fn info(&self) -> EmgResult<&SessionInfo> {
        Ok(&self.loaded()?.info)
    }

    pub fn session_name(&self) -> EmgResult<&str> {
        Ok(&self.loaded()?.info.session_name)
    }

    pub fn num_channels(&self) -> EmgResult<usize> {
        Ok(self.loaded()?.info.num_channels)
    }

    pub fn scan_rate(&self) -> EmgResult<f64> {
        Ok(self.loaded()?.info.scan_rate)
    }

    /// Recordings in ascending stimulus voltage order
    pub fn recordings(&self) -> EmgResult<&[Recording]> {
        Ok(&self.loaded()?.recordings)
    }

    /// Session metadata exactly as read from the record
    pub fn parameters_summary(&self) -> EmgResult<SessionInfo> {
        Ok(self.loaded()?.info.clone())
    }

    // --- per-session analysis parameters ---

    pub fn m_window(&self) -> AmplitudeWindow {
        self.m_window
    }

    pub fn h_window(&self) -> AmplitudeWindow {
        self.h_window
    }

    pub fn time_window_ms(&self) -> f64 {
        self.time_window_ms
    }

    pub fn h_threshold(&self) -> f64 {
        self.h_threshold
    }

    pub fn set_m_window(&mut self, start_ms: f64, end_ms: f64) -> EmgResult<()> {
        self.m_window = AmplitudeWindow::checked(start_ms, end_ms)?;
        Ok(())
    }

    pub fn set_h_window(&mut self, start_ms: f64, end_ms: f64) -> EmgResult<()> {
        self.h_window = AmplitudeWindow::checked(start_ms, end_ms)?;
        Ok(())
    }

    pub fn set_time_window_ms(&mut self, time_window_ms: f64) -> EmgResult<()> {
        if !(time_window_ms.is_finite() && time_window_ms > 0.0) {
            return Err(ConfigError::ValidationError(vec![format!(
                "time_window must be positive, got {time_window_ms}"
            )])
            .into());
        }
        self.time_window_ms = time_window_ms;
        Ok(())
    }

    // --- queries ---

    /// Sample times in ms for the first `window_ms` of a trial, capped at
    /// `num_samples` entries
    pub fn time_axis_ms(&self, window_ms: f64) -> EmgResult<Vec<f64>> {
        let info = &self.loaded()?.info;
        let count = ms_to_sample_index(window_ms, info.scan_rate).min(info.num_samples);
        Ok((0..count)
            .map(|i| sample_index_to_ms(i, info.scan_rate))
            .collect())
    }

    /// Whether the raw peak-to-peak amplitude in `h_window` exceeds `threshold`.
    ///
    /// A window that selects no samples is an error, never a silent `false`.
    pub fn detect_candidate_h_reflex(
        &self,
        recording: &Recording,
        channel_index: usize,
        h_window: AmplitudeWindow,
        threshold: f64,
    ) -> EmgResult<bool> {
        let scan_rate = self.scan_rate()?;
        let samples = h_window.slice(recording.channel(channel_index)?, scan_rate)?;
        let spread = peak_to_peak(samples)
            .ok_or_else(|| EmgError::empty_window("H-reflex window has no samples"))?;
        Ok(spread > threshold)
    }

    pub fn channel_labels(&self, custom: Option<&[String]>) -> EmgResult<ChannelLabels> {
        Ok(ChannelLabels::resolve(custom, self.num_channels()?))
    }

    /// All recordings overlaid per channel over the display window
    pub fn waveforms(&self, custom: Option<&[String]>, rectified: bool) -> EmgResult<WaveformSet> {
        self.collect_waveforms(custom, rectified, |_, _| Ok(true))
    }

    /// Only traces whose H window shows a candidate reflex.
    ///
    /// `threshold` defaults to the session's configured `h_threshold`.
    pub fn suspected_h_reflexes(
        &self,
        custom: Option<&[String]>,
        threshold: Option<f64>,
    ) -> EmgResult<WaveformSet> {
        let threshold = threshold.unwrap_or(self.h_threshold);
        let h_window = self.h_window;
        let set = self.collect_waveforms(custom, false, |recording, channel| {
            self.detect_candidate_h_reflex(recording, channel, h_window, threshold)
        })?;
        debug!(threshold, traces = set.trace_count(), "suspected H-reflex traces");
        Ok(set)
    }

    /// M-wave and H-reflex amplitude of every recording on one channel
    pub fn reflex_points(&self, channel_index: usize) -> EmgResult<Vec<ReflexPoint>> {
        let loaded = self.loaded()?;
        let scan_rate = loaded.info.scan_rate;
        self.check_channel(channel_index)?;

        loaded
            .recordings
            .iter()
            .map(|recording| {
                let samples = recording.channel(channel_index)?;
                Ok(ReflexPoint {
                    stimulus_v: recording.stimulus_v,
                    m_amplitude: windowed_average_amplitude(
                        samples,
                        self.m_window.start_ms,
                        self.m_window.end_ms,
                        scan_rate,
                    )?,
                    h_amplitude: windowed_average_amplitude(
                        samples,
                        self.h_window.start_ms,
                        self.h_window.end_ms,
                        scan_rate,
                    )?,
                })
            })
            .collect()
    }

    fn check_channel(&self, channel_index: usize) -> EmgResult<()> {
        let num_channels = self.num_channels()?;
        if channel_index >= num_channels {
            return Err(EmgError::ChannelOutOfRange {
                channel: channel_index,
                num_channels,
            });
        }
        Ok(())
    }

    fn collect_waveforms<F>(
        &self,
        custom: Option<&[String]>,
        rectified: bool,
        mut keep: F,
    ) -> EmgResult<WaveformSet>
    where
        F: FnMut(&Recording, usize) -> EmgResult<bool>,
    {
        let loaded = self.loaded()?;
        let time_axis_ms = self.time_axis_ms(self.time_window_ms)?;
        let visible = time_axis_ms.len();
        let labels = self.channel_labels(custom)?;

        let mut channels = Vec::with_capacity(loaded.info.num_channels);
        for (channel_index, label) in labels.names().iter().enumerate() {
            let mut traces = Vec::new();
            for recording in &loaded.recordings {
                if !keep(recording, channel_index)? {
                    continue;
                }
                let window = &recording.channel(channel_index)?[..visible];
                traces.push(Trace {
                    stimulus_v: recording.stimulus_v,
                    samples: if rectified {
                        rectify(window)
                    } else {
                        window.to_vec()
                    },
                });
            }
            channels.push(ChannelWaveforms {
                label: label.clone(),
                traces,
            });
        }

        Ok(WaveformSet {
            time_axis_ms,
            channels,
            rectified,
            m_window: self.m_window,
            h_window: self.h_window,
            label_warning: labels.mismatch().cloned(),
        })
    }
}
