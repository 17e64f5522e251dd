// src/config/mod.rs
//! Analysis configuration
//!
//! [`AnalysisConfig`] carries the default response windows, display window,
//! voltage bin size and H-reflex detection threshold. It is read once at
//! process start (see [`ConfigLoader`]) and handed to each `Session` or
//! `Dataset` constructor, which copies the values it needs.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Default analysis parameters copied into sessions and datasets
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// M-wave window start (ms)
    #[serde(default = "defaults::m_start")]
    pub m_start: f64,

    /// M-wave window end (ms)
    #[serde(default = "defaults::m_end")]
    pub m_end: f64,

    /// H-reflex window start (ms)
    #[serde(default = "defaults::h_start")]
    pub h_start: f64,

    /// H-reflex window end (ms)
    #[serde(default = "defaults::h_end")]
    pub h_end: f64,

    /// Display window for waveform exports (ms)
    #[serde(default = "defaults::time_window")]
    pub time_window: f64,

    /// Stimulus voltage bin width (V)
    #[serde(default = "defaults::bin_size")]
    pub bin_size: f64,

    /// Peak-to-peak threshold for flagging H-reflex candidates (mV)
    #[serde(default = "defaults::h_threshold")]
    pub h_threshold: f64,
}

mod defaults {
    use crate::config::constants::*;

    pub fn m_start() -> f64 { windows::DEFAULT_M_START_MS }
    pub fn m_end() -> f64 { windows::DEFAULT_M_END_MS }
    pub fn h_start() -> f64 { windows::DEFAULT_H_START_MS }
    pub fn h_end() -> f64 { windows::DEFAULT_H_END_MS }
    pub fn time_window() -> f64 { windows::DEFAULT_TIME_WINDOW_MS }
    pub fn bin_size() -> f64 { binning::DEFAULT_BIN_SIZE_V }
    pub fn h_threshold() -> f64 { detection::DEFAULT_H_THRESHOLD_MV }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            m_start: defaults::m_start(),
            m_end: defaults::m_end(),
            h_start: defaults::h_start(),
            h_end: defaults::h_end(),
            time_window: defaults::time_window(),
            bin_size: defaults::bin_size(),
            h_threshold: defaults::h_threshold(),
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration consistency, collecting every violation
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let windows = [
            ("m", self.m_start, self.m_end),
            ("h", self.h_start, self.h_end),
        ];
        for (name, start, end) in windows {
            if !start.is_finite() || !end.is_finite() || start < 0.0 {
                errors.push(format!(
                    "{name}_start/{name}_end must be finite and non-negative, got {start}..{end}"
                ));
            } else if start >= end {
                errors.push(format!(
                    "{name}_start ({start} ms) must be before {name}_end ({end} ms)"
                ));
            }
        }

        if !(self.time_window.is_finite() && self.time_window > 0.0) {
            errors.push(format!("time_window must be positive, got {}", self.time_window));
        }
        if !(self.bin_size.is_finite() && self.bin_size > 0.0) {
            errors.push(format!("bin_size must be positive, got {}", self.bin_size));
        }
        if !(self.h_threshold.is_finite() && self.h_threshold >= 0.0) {
            errors.push(format!(
                "h_threshold must be non-negative, got {}",
                self.h_threshold
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn m_window(&self) -> crate::processing::AmplitudeWindow {
        crate::processing::AmplitudeWindow::new(self.m_start, self.m_end)
    }

    pub fn h_window(&self) -> crate::processing::AmplitudeWindow {
        crate::processing::AmplitudeWindow::new(self.h_start, self.h_end)
    }
}
