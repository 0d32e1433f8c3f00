//! phasorwatch: streaming quality monitoring for phasor measurement channels
//!
//! For each monitored channel the filter keeps a bounded window of recent
//! samples and recomputes a rolling signal-to-noise ratio on every ingest,
//! resolving multi-turn phase ambiguity first for angle channels. It is
//! meant to sit inside a larger measurement pipeline and is called once
//! per incoming sample per channel.
//!
//! The core is single-threaded and unsynchronized; callers that deliver
//! samples from multiple threads must serialize access per registry (the
//! bundled monitor binary wraps it in a `parking_lot::RwLock`).

pub mod channel;
pub mod config;
pub mod error;
pub mod persist;
pub mod registry;
pub mod replay;
pub mod stats;
pub mod unwrap;
pub mod window;

pub use channel::{Channel, Sample};
pub use error::{MonitorError, Result};
pub use registry::ChannelRegistry;
pub use stats::{ChannelStatistics, ChannelType};
pub use unwrap::PhaseUnwrapper;
pub use window::{FixedWindow, DEFAULT_WINDOW_CAPACITY};
