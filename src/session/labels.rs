//! Channel label resolution

use crate::error::{ChannelNameMismatch, EmgResult};
use serde::Serialize;
use tracing::warn;

/// Display labels for each recorded channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelLabels {
    names: Vec<String>,
    /// Set when custom names were supplied but could not be used
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_mismatch")]
    mismatch: Option<ChannelNameMismatch>,
}

impl ChannelLabels {
    /// `"Channel {i}"` for every channel
    pub fn defaults(num_channels: usize) -> Self {
        Self {
            names: (0..num_channels).map(|i| format!("Channel {i}")).collect(),
            mismatch: None,
        }
    }

    /// Use `custom` when it names every channel; otherwise fall back to the
    /// defaults and record the mismatch. An absent or empty list is not a mismatch.
    pub fn resolve(custom: Option<&[String]>, num_channels: usize) -> Self {
        match custom {
            None => Self::defaults(num_channels),
            Some(names) if names.is_empty() => Self::defaults(num_channels),
            Some(names) if names.len() == num_channels => Self {
                names: names.to_vec(),
                mismatch: None,
            },
            Some(names) => {
                let mismatch = ChannelNameMismatch {
                    provided: names.len(),
                    expected: num_channels,
                };
                warn!(%mismatch, "falling back to default channel labels");
                Self {
                    mismatch: Some(mismatch),
                    ..Self::defaults(num_channels)
                }
            }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, channel_index: usize) -> Option<&str> {
        self.names.get(channel_index).map(String::as_str)
    }

    pub fn mismatch(&self) -> Option<&ChannelNameMismatch> {
        self.mismatch.as_ref()
    }

    /// Treat a label mismatch as an error
    pub fn into_strict(self) -> EmgResult<Vec<String>> {
        match self.mismatch {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(self.names),
        }
    }
}

fn serialize_mismatch<S>(mismatch: &Option<ChannelNameMismatch>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match mismatch {
        Some(m) => s.serialize_some(&m.to_string()),
        None => s.serialize_none(),
    }
}
