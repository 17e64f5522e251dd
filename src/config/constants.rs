// src/config/constants.rs
//! Analysis defaults and limits

/// Response windows, in milliseconds after stimulus onset
pub mod windows {
    pub const DEFAULT_M_START_MS: f64 = 2.0;
    pub const DEFAULT_M_END_MS: f64 = 4.0;
    pub const DEFAULT_H_START_MS: f64 = 4.0;
    pub const DEFAULT_H_END_MS: f64 = 7.0;

    /// Span of each trial shown in waveform exports
    pub const DEFAULT_TIME_WINDOW_MS: f64 = 10.0;
}

/// Stimulus voltage binning
pub mod binning {
    pub const DEFAULT_BIN_SIZE_V: f64 = 0.05;
}

/// H-reflex candidate detection
pub mod detection {
    /// Peak-to-peak amplitude in the H window, in millivolts
    pub const DEFAULT_H_THRESHOLD_MV: f64 = 0.3;
}

pub mod units {
    pub const MILLISECONDS_PER_SECOND: f64 = 1000.0;
}

pub mod paths {
    pub const LOCAL_CONFIG_FILE: &str = "config.toml";
    pub const LOCAL_OVERRIDE_FILE: &str = "config/local.toml";

    /// Prefix for environment overrides, e.g. `EMG_BIN_SIZE=0.1`
    pub const ENV_PREFIX: &str = "EMG_";
}
