//! Channel registry and sample routing
//!
//! Owns the monitored channels and routes each incoming sample to its
//! channel by input key. Key indexes are built once by an explicit
//! initialize step; duplicate keys are a fatal configuration error.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::channel::{Channel, Sample};
use crate::error::{MonitorError, Result};

/// Registry of monitored channels, keyed by input and output key.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
    by_input_key: HashMap<String, usize>,
    by_output_key: HashMap<String, usize>,
    verbose_serialization: bool,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel. The key indexes are not updated until the next
    /// [`initialize`](Self::initialize) call.
    pub fn add_channel(&mut self, channel: Channel) {
        self.channels.push(channel);
    }

    /// Rebuild both key indexes from the channel list.
    ///
    /// Must be called after construction or deserialization and after any
    /// channel is added or removed. Fails if two channels share an input
    /// key or two channels share an output key.
    pub fn initialize(&mut self) -> Result<()> {
        self.by_input_key.clear();
        self.by_output_key.clear();

        for (index, channel) in self.channels.iter().enumerate() {
            if self
                .by_input_key
                .insert(channel.input_key().to_owned(), index)
                .is_some()
            {
                return Err(MonitorError::DuplicateInputKey(
                    channel.input_key().to_owned(),
                ));
            }
            if self
                .by_output_key
                .insert(channel.output_key().to_owned(), index)
                .is_some()
            {
                return Err(MonitorError::DuplicateOutputKey(
                    channel.output_key().to_owned(),
                ));
            }
        }

        debug!("registry initialized with {} channels", self.channels.len());
        Ok(())
    }

    /// Route a sample to the channel declaring its key as input key.
    ///
    /// A sample matching no channel is dropped silently; the host pipeline
    /// carries many measurements this filter does not monitor.
    pub fn route(&mut self, sample: &mut Sample) {
        match self.by_input_key.get(&sample.key).copied() {
            Some(index) => self.channels[index].ingest(sample),
            None => trace!(key = %sample.key, "unmonitored sample dropped"),
        }
    }

    /// Turn on verbose persistence for the registry and every channel.
    pub fn enable_verbose_serialization(&mut self) {
        self.set_verbose_serialization(true);
    }

    /// Turn off verbose persistence for the registry and every channel.
    pub fn disable_verbose_serialization(&mut self) {
        self.set_verbose_serialization(false);
    }

    fn set_verbose_serialization(&mut self, verbose: bool) {
        self.verbose_serialization = verbose;
        for channel in &mut self.channels {
            channel.set_verbose_serialization(verbose);
        }
    }

    pub fn verbose_serialization(&self) -> bool {
        self.verbose_serialization
    }

    /// All registered input keys, in registration order.
    pub fn input_keys(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.input_key())
    }

    /// Channels in registration order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Look up a channel by its input key.
    pub fn by_input_key(&self, key: &str) -> Option<&Channel> {
        self.by_input_key.get(key).map(|&i| &self.channels[i])
    }

    /// Look up a channel by its output key.
    pub fn by_output_key(&self, key: &str) -> Option<&Channel> {
        self.by_output_key.get(key).map(|&i| &self.channels[i])
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
