//! Windowed channel statistics
//!
//! Computes mean, standard deviation, and SNR in dB from a window
//! snapshot. Angle channels are measured on the first differences of the
//! unwrapped signal rather than on the raw values.

use serde::{Deserialize, Serialize};

/// Kind of phasor quantity a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    Magnitude,
    Angle,
}

/// Derived quality metrics for one channel window.
///
/// These are pure functions of the window snapshot; they are recomputed on
/// every ingest and hold NaN/±Infinity for degenerate windows (see
/// [`ChannelStatistics::compute`]). Persistence encodes them through the
/// snapshot records, which tolerate the non-finite values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelStatistics {
    pub mean: f64,
    pub stddev: f64,
    pub snr_db: f64,
}

impl ChannelStatistics {
    /// Compute statistics over a window snapshot (oldest-first).
    ///
    /// For `Angle` the signal is first replaced by its
    /// absolute-first-difference series, which is one element shorter; a
    /// single-sample angle window therefore yields an empty series and the
    /// statistics come out NaN. That mirrors the behavior this filter must
    /// stay compatible with and is deliberately not guarded.
    ///
    /// SNR is `10*log10(|mean|/stddev)`: +Infinity for a zero-variance
    /// window, NaN when mean and stddev are both zero. Callers get these
    /// IEEE-754 values as-is, never clamped.
    ///
    /// # Panics
    ///
    /// An empty snapshot for a `Magnitude` channel indicates a broken
    /// invariant upstream (ingest always pushes before computing) and
    /// panics rather than producing a silent NaN.
    pub fn compute(signal: &[f64], channel_type: ChannelType) -> Self {
        let signal: Vec<f64> = match channel_type {
            ChannelType::Magnitude => {
                assert!(
                    !signal.is_empty(),
                    "statistics requested for an empty magnitude window"
                );
                signal.to_vec()
            }
            ChannelType::Angle => signal
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).abs())
                .collect(),
        };

        let mean = signal.iter().sum::<f64>() / signal.len() as f64;
        let mean_residual = signal
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / signal.len() as f64;
        let stddev = mean_residual.sqrt();
        let snr_db = 10.0 * (mean.abs() / stddev).log10();

        Self {
            mean,
            stddev,
            snr_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal_has_infinite_snr() {
        let signal = vec![5.0; 30];
        let stats = ChannelStatistics::compute(&signal, ChannelType::Magnitude);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.snr_db, f64::INFINITY);
    }

    #[test]
    fn test_known_snr() {
        let signal = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = ChannelStatistics::compute(&signal, ChannelType::Magnitude);
        assert_eq!(stats.mean, 3.0);
        assert!((stats.stddev - 2.0f64.sqrt()).abs() < 1e-12);
        // 10*log10(3/sqrt(2)) = 3.26606...
        assert!((stats.snr_db - 3.2661).abs() < 1e-4);
    }

    #[test]
    fn test_angle_uses_first_differences() {
        // Differences of [0, 10, 30, 60] are [10, 20, 30]: mean 20.
        let signal = vec![0.0, 10.0, 30.0, 60.0];
        let stats = ChannelStatistics::compute(&signal, ChannelType::Angle);
        assert_eq!(stats.mean, 20.0);
    }

    #[test]
    fn test_angle_differences_are_absolute() {
        let signal = vec![10.0, 0.0, 10.0];
        let stats = ChannelStatistics::compute(&signal, ChannelType::Angle);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.stddev, 0.0);
    }

    #[test]
    fn test_single_angle_sample_yields_nan() {
        let stats = ChannelStatistics::compute(&[42.0], ChannelType::Angle);
        assert!(stats.mean.is_nan());
        assert!(stats.stddev.is_nan());
        assert!(stats.snr_db.is_nan());
    }

    #[test]
    fn test_zero_mean_zero_stddev_is_nan() {
        let stats = ChannelStatistics::compute(&[0.0, 0.0, 0.0], ChannelType::Magnitude);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.stddev, 0.0);
        assert!(stats.snr_db.is_nan());
    }

    #[test]
    #[should_panic(expected = "empty magnitude window")]
    fn test_empty_magnitude_window_panics() {
        ChannelStatistics::compute(&[], ChannelType::Magnitude);
    }
}
