//! EMG-Reflex: M-wave and H-reflex analysis for nerve-stimulation EMG recordings
//!
//! This library loads recorded stimulation sessions and extracts response
//! amplitudes from them, per session or pooled across a dataset:
//!
//! - Session loading with stimulus-ordered recordings
//! - Windowed mean rectified amplitude for the M-wave and H-reflex windows
//! - Stimulus voltage binning and cross-session mean / standard deviation
//! - Waveform and reflex-curve exports for an external plotting layer
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_reflex::{ConfigLoader, Dataset, Session};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load()?;
//!
//!     let sessions = ["day1.json", "day2.json"]
//!         .iter()
//!         .map(|path| Session::open(path, &config))
//!         .collect::<Result<Vec<_>, _>>()?;
//!
//!     let dataset = Dataset::new(sessions, &config)?;
//!     let curve = dataset.reflex_curve(0, config.m_window(), config.h_window(), config.bin_size)?;
//!     for point in curve {
//!         let (v, m_mean, m_std, h_mean, h_std) = point.as_tuple();
//!         println!("{v:.2} V  M {m_mean:.3}±{m_std:.3}  H {h_mean:.3}±{h_std:.3}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod processing;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{AnalysisConfig, ConfigError, ConfigLoader};
pub use dataset::{ChannelReflexCurve, Dataset, ReflexCurvePoint, ReflexCurveSet};
pub use error::{ChannelNameMismatch, EmgError, EmgResult};
pub use processing::{
    aggregate_statistics, bin_stimulus_voltage, rectify, windowed_average_amplitude,
    AmplitudeStatistics, AmplitudeSummary, AmplitudeWindow, BinGrid, VoltageBin,
};
pub use session::{ChannelLabels, Recording, Session, SessionInfo, SessionRecord, WaveformSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "M-wave and H-reflex amplitude analysis for stimulation EMG sessions"
            .to_string(),
        features: vec![
            "Session loading".to_string(),
            "Windowed amplitude extraction".to_string(),
            "Stimulus voltage binning".to_string(),
            "Cross-session reflex curves".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub features: Vec<String>,
}
