//! Per-channel monitoring state
//!
//! A channel couples one sliding signal window, an optional phase
//! unwrapper (angle channels only), and the statistics computed from the
//! most recent ingest.

use crate::stats::{ChannelStatistics, ChannelType};
use crate::unwrap::PhaseUnwrapper;
use crate::window::FixedWindow;

/// One measurement delivered by the host pipeline.
///
/// The value is mutated in place by angle channels during ingest; see
/// [`Channel::ingest`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Measurement key, matched against a channel's input key.
    pub key: String,
    pub value: f64,
}

impl Sample {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A monitored measurement channel.
#[derive(Debug, Clone)]
pub struct Channel {
    channel_type: ChannelType,
    input_key: String,
    output_key: String,
    window: FixedWindow<f64>,
    unwrapper: Option<PhaseUnwrapper>,
    stats: ChannelStatistics,
    verbose_serialization: bool,
}

impl Channel {
    /// Create a channel. An unwrapper is attached iff the type is `Angle`,
    /// with the same capacity as the signal window.
    pub fn new(
        channel_type: ChannelType,
        input_key: impl Into<String>,
        output_key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let unwrapper = match channel_type {
            ChannelType::Angle => Some(PhaseUnwrapper::new(capacity)),
            ChannelType::Magnitude => None,
        };
        Self {
            channel_type,
            input_key: input_key.into(),
            output_key: output_key.into(),
            window: FixedWindow::new(capacity),
            unwrapper,
            stats: ChannelStatistics::default(),
            verbose_serialization: false,
        }
    }

    /// Absorb one sample and recompute the channel statistics.
    ///
    /// For angle channels the sample's value is overwritten with the
    /// unwrapped angle before it goes into the window, so the caller (and
    /// anything downstream of it) sees the continuous value. Magnitude
    /// channels leave the sample untouched.
    pub fn ingest(&mut self, sample: &mut Sample) {
        match self.unwrapper {
            Some(ref mut unwrapper) => {
                let unwrapped = unwrapper.observe(sample.value);
                sample.value = unwrapped;
                self.window.push(unwrapped);
            }
            None => self.window.push(sample.value),
        }
        self.stats = ChannelStatistics::compute(&self.window.snapshot(), self.channel_type);
    }

    /// Clear the signal window only.
    ///
    /// The unwrapper's cycle count and raw history intentionally survive a
    /// window clear; the next ingested angle still gets the accumulated
    /// 360° correction applied. Only rebuilding the channel resets them.
    pub fn clear_window(&mut self) {
        self.window.clear();
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn input_key(&self) -> &str {
        &self.input_key
    }

    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Statistics from the most recent ingest.
    pub fn stats(&self) -> &ChannelStatistics {
        &self.stats
    }

    /// Number of samples currently windowed.
    pub fn fill(&self) -> usize {
        self.window.len()
    }

    /// Oldest-first copy of the current signal window.
    pub fn signal_snapshot(&self) -> Vec<f64> {
        self.window.snapshot()
    }

    /// Cycle count of the unwrapper, if this is an angle channel.
    pub fn cycles(&self) -> Option<i64> {
        self.unwrapper.as_ref().map(|u| u.cycles())
    }

    pub fn verbose_serialization(&self) -> bool {
        self.verbose_serialization
    }

    pub fn set_verbose_serialization(&mut self, verbose: bool) {
        self.verbose_serialization = verbose;
    }

    /// Restore persisted state: reinstate the recorded statistics, refill
    /// the window from a signal snapshot, and put back the unwrapper's
    /// cycle count. Statistics are taken from the record rather than
    /// recomputed; the next ingest recomputes them anyway.
    pub(crate) fn restore_state(
        &mut self,
        stats: ChannelStatistics,
        signal: &[f64],
        cycles: Option<i64>,
    ) {
        self.stats = stats;
        for &value in signal {
            self.window.push(value);
        }
        if let (Some(cycles), ChannelType::Angle) = (cycles, self.channel_type) {
            self.unwrapper = Some(PhaseUnwrapper::with_cycles(self.window.capacity(), cycles));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_ingest_leaves_sample_untouched() {
        let mut ch = Channel::new(ChannelType::Magnitude, "V1.mag", "V1.mag.snr", 30);
        let mut sample = Sample::new("V1.mag", 5.0);
        ch.ingest(&mut sample);
        assert_eq!(sample.value, 5.0);
        assert_eq!(ch.fill(), 1);
    }

    #[test]
    fn test_constant_magnitude_snr_is_infinite() {
        let mut ch = Channel::new(ChannelType::Magnitude, "V1.mag", "V1.mag.snr", 30);
        for _ in 0..30 {
            let mut sample = Sample::new("V1.mag", 5.0);
            ch.ingest(&mut sample);
        }
        assert!(ch.fill() == 30 && ch.stats().mean == 5.0);
        assert_eq!(ch.stats().stddev, 0.0);
        assert_eq!(ch.stats().snr_db, f64::INFINITY);
    }

    #[test]
    fn test_angle_ingest_rewrites_sample_value() {
        let mut ch = Channel::new(ChannelType::Angle, "V1.ang", "V1.ang.snr", 30);
        for raw in [10.0, 20.0, 170.0] {
            let mut sample = Sample::new("V1.ang", raw);
            ch.ingest(&mut sample);
        }
        let mut sample = Sample::new("V1.ang", -170.0);
        ch.ingest(&mut sample);
        // One positive wrap: the caller sees -170 + 360.
        assert_eq!(sample.value, 190.0);
        assert_eq!(ch.cycles(), Some(1));
    }

    #[test]
    fn test_first_angle_sample_produces_nan_stats() {
        let mut ch = Channel::new(ChannelType::Angle, "V1.ang", "V1.ang.snr", 30);
        let mut sample = Sample::new("V1.ang", 42.0);
        ch.ingest(&mut sample);
        // A one-element window has an empty difference series.
        assert!(ch.stats().mean.is_nan());
        assert!(ch.stats().snr_db.is_nan());
    }

    #[test]
    fn test_clear_window_preserves_unwrap_state() {
        let mut ch = Channel::new(ChannelType::Angle, "V1.ang", "V1.ang.snr", 30);
        // Two full positive turns: wraps at 170 -> -170 both times.
        let ramp = [
            10.0, 20.0, 170.0, -170.0, -100.0, 0.0, 100.0, 170.0, -170.0,
        ];
        for raw in ramp {
            let mut sample = Sample::new("V1.ang", raw);
            ch.ingest(&mut sample);
        }
        assert_eq!(ch.cycles(), Some(2));
        ch.clear_window();
        assert_eq!(ch.fill(), 0);
        // The accumulated correction still applies after the clear.
        let mut sample = Sample::new("V1.ang", 0.0);
        ch.ingest(&mut sample);
        assert_eq!(ch.cycles(), Some(2));
        assert_eq!(sample.value, 720.0);
    }

    #[test]
    fn test_window_eviction_caps_fill() {
        let mut ch = Channel::new(ChannelType::Magnitude, "in", "out", 5);
        for i in 0..20 {
            let mut sample = Sample::new("in", i as f64);
            ch.ingest(&mut sample);
        }
        assert_eq!(ch.fill(), 5);
        assert_eq!(ch.signal_snapshot(), vec![15.0, 16.0, 17.0, 18.0, 19.0]);
    }
}
