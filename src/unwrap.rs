//! Phase-angle unwrapping
//!
//! Converts angles reported modulo 360° into a continuous series by
//! tracking how many full turns the signal has crossed. A jump of more
//! than 180° between the two most recent raw samples counts as one wrap.

use crate::window::FixedWindow;

/// Jump threshold (degrees) that counts as a wrap between consecutive samples.
const WRAP_THRESHOLD_DEGREES: f64 = 180.0;

/// Stateful unwrapper for one angle channel.
///
/// The cycle count is cumulative and signed. It is never reset by clearing
/// the owning channel's signal window; only rebuilding the unwrapper (e.g.
/// via deserialization) starts a fresh count.
#[derive(Debug, Clone)]
pub struct PhaseUnwrapper {
    /// Recent raw (wrapped) angles, same capacity as the channel's window.
    raw_history: FixedWindow<f64>,
    /// Net number of 360° corrections currently applied.
    cycles: i64,
}

impl PhaseUnwrapper {
    pub fn new(capacity: usize) -> Self {
        Self {
            raw_history: FixedWindow::new(capacity),
            cycles: 0,
        }
    }

    /// Rebuild an unwrapper with a previously persisted cycle count.
    pub fn with_cycles(capacity: usize, cycles: i64) -> Self {
        Self {
            raw_history: FixedWindow::new(capacity),
            cycles,
        }
    }

    /// Record a raw angle sample and return its unwrapped value.
    ///
    /// Only the two most recent raw samples are compared, and at most one
    /// ±1 cycle adjustment is made per call, so a genuine multi-cycle jump
    /// between consecutive samples is under-corrected. The first two
    /// samples never adjust the count.
    pub fn observe(&mut self, raw_degrees: f64) -> f64 {
        self.raw_history.push(raw_degrees);

        if self.raw_history.len() > 2 {
            let history = self.raw_history.snapshot();
            let last = history[history.len() - 1];
            let prev = history[history.len() - 2];
            if (last - prev).abs() > WRAP_THRESHOLD_DEGREES {
                if last < prev {
                    self.cycles += 1;
                } else {
                    self.cycles -= 1;
                }
            }
        }

        raw_degrees + 360.0 * self.cycles as f64
    }

    /// Current signed cycle count.
    pub fn cycles(&self) -> i64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_adjustment_for_first_two_samples() {
        let mut pu = PhaseUnwrapper::new(30);
        // A 350° jump on the second sample must not register as a wrap:
        // the guard requires more than two samples of history.
        assert_eq!(pu.observe(175.0), 175.0);
        assert_eq!(pu.observe(-175.0), -175.0);
        assert_eq!(pu.cycles(), 0);
    }

    #[test]
    fn test_positive_wrap_adds_a_cycle() {
        let mut pu = PhaseUnwrapper::new(30);
        pu.observe(10.0);
        pu.observe(20.0);
        pu.observe(170.0);
        let unwrapped = pu.observe(-170.0);
        assert_eq!(pu.cycles(), 1);
        assert_eq!(unwrapped, 190.0);
    }

    #[test]
    fn test_negative_wrap_subtracts_a_cycle() {
        let mut pu = PhaseUnwrapper::new(30);
        pu.observe(-10.0);
        pu.observe(-20.0);
        pu.observe(-170.0);
        let unwrapped = pu.observe(170.0);
        assert_eq!(pu.cycles(), -1);
        assert_eq!(unwrapped, 170.0 - 360.0);
    }

    #[test]
    fn test_cycles_accumulate_across_wraps() {
        let mut pu = PhaseUnwrapper::new(30);
        for raw in [0.0, 90.0, 170.0, -170.0, 170.0, -170.0] {
            pu.observe(raw);
        }
        // Wraps at -170 (up), 170 (down), -170 (up): net +1.
        assert_eq!(pu.cycles(), 1);
    }

    #[test]
    fn test_multi_cycle_jump_is_single_stepped() {
        let mut pu = PhaseUnwrapper::new(30);
        pu.observe(0.0);
        pu.observe(0.0);
        pu.observe(179.0);
        // Jump of 358°: still only one cycle of correction.
        pu.observe(-179.0);
        assert_eq!(pu.cycles(), 1);
    }

    #[test]
    fn test_small_steps_never_wrap() {
        let mut pu = PhaseUnwrapper::new(30);
        for i in 0..100 {
            let raw = (i as f64 * 3.0) % 180.0;
            pu.observe(raw);
        }
        assert_eq!(pu.cycles(), 0);
    }

    #[test]
    fn test_history_bounded_by_capacity() {
        let mut pu = PhaseUnwrapper::new(4);
        for i in 0..20 {
            pu.observe(i as f64);
        }
        assert_eq!(pu.raw_history.len(), 4);
    }
}
