//! Shared fixtures for integration tests
#![allow(dead_code)]

use emg_reflex::session::{Recording, SessionInfo, SessionRecord};
use emg_reflex::{AnalysisConfig, Session};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn session_info(
    name: &str,
    num_channels: usize,
    scan_rate: f64,
    num_samples: usize,
) -> SessionInfo {
    SessionInfo {
        session_name: name.to_string(),
        num_channels,
        scan_rate,
        num_samples,
        stim_duration: 0.5,
        stim_interval: 5.0,
        emg_amp_gains: vec![1000.0; num_channels],
    }
}

/// A recording whose every channel holds the ramp `offset + i * step`
pub fn ramp_recording(
    stimulus_v: f64,
    num_channels: usize,
    num_samples: usize,
    offset: f64,
    step: f64,
) -> Recording {
    Recording {
        stimulus_v,
        channel_data: (0..num_channels)
            .map(|_| (0..num_samples).map(|i| offset + i as f64 * step).collect())
            .collect(),
    }
}

/// A recording whose every sample equals `level` on every channel
pub fn flat_recording(
    stimulus_v: f64,
    num_channels: usize,
    num_samples: usize,
    level: f64,
) -> Recording {
    ramp_recording(stimulus_v, num_channels, num_samples, level, 0.0)
}

pub fn flat_record(name: &str, scan_rate: f64, stimuli: &[f64]) -> SessionRecord {
    SessionRecord {
        session_info: session_info(name, 1, scan_rate, 100),
        recordings: stimuli
            .iter()
            .map(|&v| flat_recording(v, 1, 100, v))
            .collect(),
    }
}

pub fn flat_session(name: &str, scan_rate: f64, stimuli: &[f64]) -> Session {
    Session::from_record(
        flat_record(name, scan_rate, stimuli),
        &AnalysisConfig::default(),
    )
    .expect("fixture session loads")
}

/// Write `json` to a temporary session file
pub fn session_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write session json");
    file.flush().expect("flush session json");
    file
}
