//! Control-signal to frequency conversion.
//!
//! Pitch inputs use an exponential scale of 0.1 per octave centred on
//! [`REFERENCE_HZ`]: a control value of 0.0 is 440 Hz, 0.1 is 880 Hz, −0.1 is
//! 220 Hz. Adding a constant to the control signal therefore transposes by a
//! fixed musical interval.

use crate::Sample;
use crate::fast_math::fast_exp2;

/// Frequency produced by a control value of 0.0.
pub const REFERENCE_HZ: f64 = 440.0;

/// Control-signal units per octave.
pub const UNITS_PER_OCTAVE: f64 = 0.1;

/// Converts a pitch control sample to a frequency in Hz.
///
/// Computes `440 · 2^(10·value)`.
///
/// # Examples
///
/// ```
/// use voltage_core::sample_to_hz;
///
/// assert_eq!(sample_to_hz(0.0), 440.0);
/// assert!((sample_to_hz(0.1) - 880.0).abs() < 0.88);
/// ```
#[inline]
pub fn sample_to_hz(value: Sample) -> f64 {
    REFERENCE_HZ * fast_exp2(f64::from(value) / UNITS_PER_OCTAVE)
}

/// Converts a frequency in Hz to the pitch control value that produces it.
///
/// Inverse of [`sample_to_hz`], using `libm::log2`. Non-positive frequencies
/// map to negative infinity.
///
/// # Examples
///
/// ```
/// use voltage_core::{hz_to_sample, sample_to_hz};
///
/// assert!((hz_to_sample(220.0) + 0.1).abs() < 1e-6);
/// assert!((sample_to_hz(hz_to_sample(261.63)) - 261.63).abs() < 0.01);
/// ```
#[inline]
pub fn hz_to_sample(hz: f64) -> Sample {
    (libm::log2(hz / REFERENCE_HZ) * UNITS_PER_OCTAVE) as Sample
}

/// Caches the frequency for the last seen pitch control value.
///
/// Oscillators see mostly constant pitch input, so the exponential is only
/// re-evaluated when the control value actually changes.
#[derive(Debug, Clone, Copy)]
pub struct PitchTracker {
    last: Sample,
    hz: f64,
}

impl Default for PitchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchTracker {
    /// Creates a tracker that computes on the first sample it sees.
    pub fn new() -> Self {
        Self {
            last: Sample::NAN,
            hz: 0.0,
        }
    }

    /// Returns the frequency for `value`, recomputing only on change.
    #[inline]
    pub fn hz(&mut self, value: Sample) -> f64 {
        // NaN never compares equal, so the first call always computes.
        if value != self.last {
            self.last = value;
            self.hz = sample_to_hz(value);
        }
        self.hz
    }

    /// Returns the most recently computed frequency (0.0 before first use).
    pub fn current_hz(&self) -> f64 {
        self.hz
    }
}
