//! Stimulus voltage binning
//!
//! Trials are pooled by integer bin index, `round(v / bin_size)`, so two
//! voltages land in the same bin exactly when their indices are equal. The
//! binned voltage (`index * bin_size`) is only produced for display.
//!
//! Rounding uses [`f64::round`]: ties go half away from zero, so with a
//! 0.5 V grid 0.25 V bins to 0.5 V and -0.25 V bins to -0.5 V.

use crate::config::ConfigError;
use crate::error::EmgResult;
use serde::{Deserialize, Serialize};

/// Integer index of a stimulus voltage bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoltageBin(i64);

impl VoltageBin {
    pub fn index(self) -> i64 {
        self.0
    }
}

/// A uniform voltage grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinGrid {
    bin_size: f64,
}

impl BinGrid {
    pub fn new(bin_size: f64) -> EmgResult<Self> {
        if !(bin_size.is_finite() && bin_size > 0.0) {
            return Err(ConfigError::ValidationError(vec![format!(
                "bin_size must be positive, got {bin_size}"
            )])
            .into());
        }
        Ok(Self { bin_size })
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Bin index of `stimulus_v`.
    ///
    /// Fails when the quotient does not fit an `i64`, which happens only for
    /// a bin size far finer than the stimulus resolution.
    pub fn bin(&self, stimulus_v: f64) -> EmgResult<VoltageBin> {
        let index = (stimulus_v / self.bin_size).round();
        // i64::MAX as f64 rounds up to 2^63, itself out of range
        if !(index >= i64::MIN as f64 && index < i64::MAX as f64) {
            return Err(ConfigError::ValidationError(vec![format!(
                "bin_size {} is too fine to bin a {stimulus_v} V stimulus",
                self.bin_size
            )])
            .into());
        }
        Ok(VoltageBin(index as i64))
    }

    /// Display voltage of a bin
    pub fn voltage(&self, bin: VoltageBin) -> f64 {
        bin.0 as f64 * self.bin_size
    }
}

/// Quantize a raw stimulus voltage onto the `bin_size` grid
pub fn bin_stimulus_voltage(raw_v: f64, bin_size: f64) -> f64 {
    (raw_v / bin_size).round() * bin_size
}
