//! Registry persistence
//!
//! Serializes a registry to an ordered list of channel records and
//! rebuilds one from it. The derived statistics are always written; the
//! raw signal snapshot and the unwrap cycle count are written only when
//! verbose serialization is enabled on the channel. Loading always ends
//! with an `initialize()` so duplicate keys in a persisted file fail at
//! load time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::Result;
use crate::registry::ChannelRegistry;
use crate::stats::{ChannelStatistics, ChannelType};

/// Persisted form of one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub input_key: String,
    pub output_key: String,
    #[serde(rename = "WindowSizeInFrames")]
    pub window_size_in_frames: usize,
    #[serde(with = "nonfinite", default)]
    pub mean: f64,
    #[serde(with = "nonfinite", default)]
    pub stddev: f64,
    #[serde(with = "nonfinite", default)]
    pub snr_db: f64,
    /// Raw window contents, verbose mode only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signal: Option<Vec<f64>>,
    /// Unwrap cycle count, verbose mode and angle channels only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cycles: Option<i64>,
}

impl ChannelRecord {
    /// Capture a channel, honoring its verbose-serialization flag.
    pub fn from_channel(channel: &Channel) -> Self {
        let verbose = channel.verbose_serialization();
        let stats = channel.stats();
        Self {
            channel_type: channel.channel_type(),
            input_key: channel.input_key().to_owned(),
            output_key: channel.output_key().to_owned(),
            window_size_in_frames: channel.capacity(),
            mean: stats.mean,
            stddev: stats.stddev,
            snr_db: stats.snr_db,
            signal: verbose.then(|| channel.signal_snapshot()),
            cycles: if verbose { channel.cycles() } else { None },
        }
    }

    /// Rebuild the channel this record describes.
    pub fn into_channel(self) -> Channel {
        let mut channel = Channel::new(
            self.channel_type,
            self.input_key,
            self.output_key,
            self.window_size_in_frames,
        );
        let stats = ChannelStatistics {
            mean: self.mean,
            stddev: self.stddev,
            snr_db: self.snr_db,
        };
        channel.restore_state(stats, self.signal.as_deref().unwrap_or(&[]), self.cycles);
        channel
    }
}

/// Persisted form of a whole registry: channel records in registration
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub channels: Vec<ChannelRecord>,
}

impl RegistryRecord {
    pub fn from_registry(registry: &ChannelRegistry) -> Self {
        Self {
            channels: registry
                .channels()
                .iter()
                .map(ChannelRecord::from_channel)
                .collect(),
        }
    }

    /// Rebuild and index a registry. Duplicate keys across the persisted
    /// channels surface here as a fatal configuration error.
    pub fn into_registry(self) -> Result<ChannelRegistry> {
        let mut registry = ChannelRegistry::new();
        for record in self.channels {
            registry.add_channel(record.into_channel());
        }
        registry.initialize()?;
        Ok(registry)
    }
}

/// Serialize a registry snapshot to pretty JSON.
pub fn to_json(registry: &ChannelRegistry) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RegistryRecord::from_registry(registry))?)
}

/// Rebuild a registry from a JSON snapshot.
pub fn from_json(json: &str) -> Result<ChannelRegistry> {
    let record: RegistryRecord = serde_json::from_str(json)?;
    record.into_registry()
}

/// Write a registry snapshot to a file.
pub fn save_to_path(registry: &ChannelRegistry, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, to_json(registry)?)?;
    Ok(())
}

/// Load a registry from a snapshot file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ChannelRegistry> {
    from_json(&fs::read_to_string(path)?)
}

/// Non-finite floats round-tripped through JSON strings.
///
/// Statistics legitimately hold NaN and ±Infinity (constant or degenerate
/// windows) and serde_json rejects them as numbers, so they are written as
/// the strings "NaN", "Infinity", and "-Infinity" instead.
mod nonfinite {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::Serializer;

    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(untagged)]
    enum FloatRepr {
        Number(f64),
        Named(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match FloatRepr::deserialize(deserializer)? {
            FloatRepr::Number(value) => Ok(value),
            FloatRepr::Named(name) => match name.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::custom(format!("unknown float literal: {other}"))),
            },
        }
    }
}
