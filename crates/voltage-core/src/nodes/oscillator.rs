//! Pitch-controlled oscillators with hard sync.
//!
//! Both oscillators read a per-sample pitch control (0.1 per octave, 0.0 =
//! 440 Hz, see [`sample_to_hz`](crate::sample_to_hz)) on their primary input
//! and a trigger on `syn`. A trigger resets the phase to zero on the sample it
//! fires, which is how one oscillator is hard-synced to another or to a clock.
//!
//! Phase is accumulated in `f64` and carried across ticks.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::Sample;
use crate::error::PatchError;
use crate::fast_math::fast_sin_turns;
use crate::patch::Patchable;
use crate::pitch::PitchTracker;
use crate::processor::{ProcessContext, Processor, Trigger};

/// Sine phase is kept below this many turns to bound its magnitude.
const SIN_PHASE_WRAP: f64 = 100.0;

/// Square wave oscillator.
///
/// The phase advances by the frequency in Hz each sample and wraps at the
/// sample rate, so one period lasts `sample_rate / hz` samples. Output is +1
/// while the phase is at most half the sample rate and −1 above it.
///
/// # Example
///
/// ```rust
/// use voltage_core::{ProcessContext, Processor, Square, Value};
///
/// let mut ctx = ProcessContext::new(44000.0, 100).unwrap();
/// let mut osc = Square::new(Value::new(0.0)); // 440 Hz: 100-sample period
/// let mut block = vec![0.0; 100];
/// ctx.tick();
/// osc.process(&mut ctx, &mut block);
/// assert!(block[..50].iter().all(|&s| s == 1.0));
/// assert!(block[50..].iter().all(|&s| s == -1.0));
/// ```
pub struct Square {
    pitch: Box<dyn Processor>,
    syn: Trigger,
    pos: f64,
    tracker: PitchTracker,
}

impl Square {
    /// Node type name.
    pub const KIND: &'static str = "square";
    /// Input roles: `pitch` drives the buffer, `syn` resets phase.
    pub const INPUTS: &'static [&'static str] = &["pitch", "syn"];

    /// Creates a square oscillator following `pitch`, with no sync input.
    pub fn new(pitch: impl Processor + 'static) -> Self {
        Self {
            pitch: Box::new(pitch),
            syn: Trigger::default(),
            pos: 0.0,
            tracker: PitchTracker::new(),
        }
    }

    /// Sets the sync trigger.
    pub fn with_sync(mut self, syn: impl Processor + 'static) -> Self {
        self.syn = Trigger::new(syn);
        self
    }

    /// Current phase, in Hz-scaled units within `[0, sample_rate]`.
    pub fn phase(&self) -> f64 {
        self.pos
    }
}

impl Processor for Square {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        self.pitch.process(ctx, out);
        let mut syn = self.syn.process(ctx, out.len());
        let wave_hz = ctx.sample_rate();
        // Compared against the full-rate phase, not a normalised period.
        let half = wave_hz / 2.0;

        let mut p = self.pos;
        for (i, s) in out.iter_mut().enumerate() {
            if syn.fired(i) {
                p = 0.0;
            }
            p += self.tracker.hz(*s);
            if p > wave_hz {
                p -= wave_hz;
            }
            *s = if p > half { -1.0 } else { 1.0 };
        }
        self.pos = p;
    }
}

impl Patchable for Square {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "pitch" => self.pitch = node,
            "syn" => self.syn.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Sine oscillator.
///
/// Each sample outputs `sin(2π · phase)` and then advances the phase by
/// `hz / sample_rate` turns. The phase wraps at 100 turns rather than one;
/// the sine is periodic, so the wrap only keeps the accumulator small.
pub struct Sin {
    pitch: Box<dyn Processor>,
    syn: Trigger,
    pos: f64,
    tracker: PitchTracker,
}

impl Sin {
    /// Node type name.
    pub const KIND: &'static str = "sin";
    /// Input roles: `pitch` drives the buffer, `syn` resets phase.
    pub const INPUTS: &'static [&'static str] = &["pitch", "syn"];

    /// Creates a sine oscillator following `pitch`, with no sync input.
    pub fn new(pitch: impl Processor + 'static) -> Self {
        Self {
            pitch: Box::new(pitch),
            syn: Trigger::default(),
            pos: 0.0,
            tracker: PitchTracker::new(),
        }
    }

    /// Sets the sync trigger.
    pub fn with_sync(mut self, syn: impl Processor + 'static) -> Self {
        self.syn = Trigger::new(syn);
        self
    }

    /// Current phase in turns, within `[0, 100]`.
    pub fn phase(&self) -> f64 {
        self.pos
    }
}

impl Processor for Sin {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        self.pitch.process(ctx, out);
        let mut syn = self.syn.process(ctx, out.len());
        let wave_hz = ctx.sample_rate();

        let mut p = self.pos;
        for (i, s) in out.iter_mut().enumerate() {
            if syn.fired(i) {
                p = 0.0;
            }
            let hz = self.tracker.hz(*s);
            *s = fast_sin_turns(p) as Sample;
            p += hz / wave_hz;
            if p > SIN_PHASE_WRAP {
                p -= SIN_PHASE_WRAP;
            }
        }
        self.pos = p;
    }
}

impl Patchable for Sin {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "pitch" => self.pitch = node,
            "syn" => self.syn.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}
