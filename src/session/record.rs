//! Persisted session record schema
//!
//! ```json
//! {
//!   "session_info": {
//!     "session_name": "rat12_day3", "num_channels": 2, "scan_rate": 10000.0,
//!     "num_samples": 200, "stim_duration": 0.5, "stim_interval": 5.0,
//!     "emg_amp_gains": [1000, 1000]
//!   },
//!   "recordings": [ { "stimulus_v": 1.2, "channel_data": [[...], [...]] } ]
//! }
//! ```

use crate::error::{EmgError, EmgResult};
use crate::utils::validation::{
    validate_array_size, validate_count, validate_finite, validate_positive,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Read;

/// Session-wide acquisition metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_name: String,
    pub num_channels: usize,
    /// Samples per second
    pub scan_rate: f64,
    /// Samples per channel per trial
    pub num_samples: usize,
    /// Stimulus duration (ms)
    pub stim_duration: f64,
    /// Interval between stimuli (s)
    pub stim_interval: f64,
    pub emg_amp_gains: Vec<f64>,
}

impl std::fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Session Name: {}", self.session_name)?;
        writeln!(f, "# of Channels: {}", self.num_channels)?;
        writeln!(f, "Scan rate (Hz): {}", self.scan_rate)?;
        writeln!(f, "Samples/Channel: {}", self.num_samples)?;
        writeln!(f, "Stimulus duration (ms): {}", self.stim_duration)?;
        writeln!(f, "Stimulus interval (s): {}", self.stim_interval)?;
        write!(f, "EMG amp gains: {:?}", self.emg_amp_gains)
    }
}

/// One stimulus trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Stimulus intensity (V)
    pub stimulus_v: f64,
    /// One sample sequence per recorded channel
    pub channel_data: Vec<Vec<f64>>,
}

impl Recording {
    pub fn channel(&self, channel_index: usize) -> EmgResult<&[f64]> {
        self.channel_data
            .get(channel_index)
            .map(Vec::as_slice)
            .ok_or(EmgError::ChannelOutOfRange {
                channel: channel_index,
                num_channels: self.channel_data.len(),
            })
    }

    /// Numeric order of stimulus voltage; `-0.0` and `0.0` are equal.
    ///
    /// Voltages are finite once a record is validated, so every pair compares.
    pub fn cmp_stimulus(&self, other: &Self) -> Ordering {
        self.stimulus_v
            .partial_cmp(&other.stimulus_v)
            .unwrap_or(Ordering::Equal)
    }
}

/// The serialized form of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_info: SessionInfo,
    pub recordings: Vec<Recording>,
}

impl SessionRecord {
    /// Parse and validate one record; anything after the JSON object is rejected
    pub fn from_json_str(json: &str) -> EmgResult<Self> {
        let mut de = serde_json::Deserializer::from_str(json);
        Self::deserialize_tracked(&mut de)
    }

    pub fn from_reader<R: Read>(reader: R) -> EmgResult<Self> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        Self::deserialize_tracked(&mut de)
    }

    pub fn to_json_string(&self) -> EmgResult<String> {
        serde_json::to_string(self).map_err(|e| EmgError::malformed(e.to_string()))
    }

    fn deserialize_tracked<'de, R>(de: &mut serde_json::Deserializer<R>) -> EmgResult<Self>
    where
        R: serde_json::de::Read<'de>,
    {
        let record: SessionRecord = serde_path_to_error::deserialize(&mut *de).map_err(|e| {
            let path = e.path().to_string();
            EmgError::MalformedSessionData {
                path: (path != ".").then_some(path),
                reason: e.into_inner().to_string(),
            }
        })?;
        de.end().map_err(|e| {
            EmgError::malformed(format!("trailing data after session record: {e}"))
        })?;
        record.validate()?;
        Ok(record)
    }

    /// Check the structural invariants the analysis relies on
    pub fn validate(&self) -> EmgResult<()> {
        let info = &self.session_info;
        validate_count(info.num_channels, "session_info.num_channels")?;
        validate_count(info.num_samples, "session_info.num_samples")?;
        validate_positive(info.scan_rate, "session_info.scan_rate")?;

        for (i, recording) in self.recordings.iter().enumerate() {
            validate_finite(recording.stimulus_v, &format!("recordings[{i}].stimulus_v"))?;
            validate_array_size(
                &recording.channel_data,
                info.num_channels,
                &format!("recordings[{i}].channel_data"),
            )?;
            for (ch, samples) in recording.channel_data.iter().enumerate() {
                validate_array_size(
                    samples,
                    info.num_samples,
                    &format!("recordings[{i}].channel_data[{ch}]"),
                )?;
            }
        }
        Ok(())
    }
}
