//! Sample-and-hold randomizer.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Sample;
use crate::error::PatchError;
use crate::patch::Patchable;
use crate::processor::{ProcessContext, Processor, Source, Trigger};

/// Draws a uniform random value on each trigger and holds it until the next.
///
/// Inputs: `min` drives the output buffer, `max` and `trig` are secondary. On
/// a trigger at sample `i` a new value is drawn from `[min[i], max[i])`; every
/// other sample repeats the held value. The held value starts at 0.0.
///
/// When `max < min` the draw falls in `(max, min]`, and when they are equal
/// the draw is exactly `min`. Bounds whose distance overflows `f32` are still
/// honored; an infinite bound yields an infinite (or NaN) held value.
///
/// # Example
///
/// ```rust
/// use voltage_core::{ProcessContext, Processor, Rand, Value};
///
/// let mut ctx = ProcessContext::new(48000.0, 32).unwrap();
/// let mut rnd = Rand::with_seed(Value::new(-0.1), Value::new(0.1), 42)
///     .with_trigger(Value::new(1.0));
/// let mut block = vec![0.0; 32];
/// ctx.tick();
/// rnd.process(&mut ctx, &mut block);
/// assert!(block.iter().all(|&s| s == block[0]));
/// assert!((-0.1..0.1).contains(&block[0]));
/// ```
pub struct Rand<R: Rng = StdRng> {
    min: Box<dyn Processor>,
    max: Source,
    trig: Trigger,
    held: Sample,
    rng: R,
}

impl Rand<StdRng> {
    /// Creates a randomizer seeded from system entropy.
    #[cfg(feature = "std")]
    pub fn new(min: impl Processor + 'static, max: impl Processor + 'static) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Creates a randomizer with a fixed seed, for reproducible patches.
    pub fn with_seed(
        min: impl Processor + 'static,
        max: impl Processor + 'static,
        seed: u64,
    ) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Rand<R> {
    /// Node type name.
    pub const KIND: &'static str = "rand";
    /// Input roles.
    pub const INPUTS: &'static [&'static str] = &["min", "max", "trig"];

    /// Creates a randomizer drawing from a custom generator.
    pub fn with_rng(min: impl Processor + 'static, max: impl Processor + 'static, rng: R) -> Self {
        Self {
            min: Box::new(min),
            max: Source::new(max),
            trig: Trigger::default(),
            held: 0.0,
            rng,
        }
    }

    /// Sets the trigger input.
    pub fn with_trigger(mut self, trig: impl Processor + 'static) -> Self {
        self.trig = Trigger::new(trig);
        self
    }

    /// The value currently held.
    pub fn held(&self) -> Sample {
        self.held
    }
}

impl<R: Rng + Send> Processor for Rand<R> {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        let len = out.len();
        self.min.process(ctx, out);
        let max = self.max.process(ctx, len);
        let mut trig = self.trig.process(ctx, len);

        let mut held = self.held;
        for (i, s) in out.iter_mut().enumerate() {
            if trig.fired(i) {
                let (lo, hi) = (*s, max[i]);
                held = if hi > lo && (hi - lo).is_finite() {
                    self.rng.gen_range(lo..hi)
                } else {
                    // Widened so bounds near f32::MAX do not overflow.
                    let u: f64 = self.rng.r#gen();
                    (f64::from(lo) + u * (f64::from(hi) - f64::from(lo))) as Sample
                };
            }
            *s = held;
        }
        self.held = held;
    }
}

impl<R: Rng + Send> Patchable for Rand<R> {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "min" => self.min = node,
            "max" => self.max.set(node),
            "trig" => self.trig.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}
