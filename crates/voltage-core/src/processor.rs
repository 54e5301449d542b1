//! Processing contracts shared by every node.
//!
//! A patch is a tree of boxed [`Processor`]s pulled from the root once per
//! tick. Each node renders its primary input straight into the caller's
//! buffer; additional inputs are wrapped in a [`Source`], which owns a block
//! buffer of its own, or a [`Trigger`], which also classifies each sample as
//! fired or not.
//!
//! ## Design Decisions
//!
//! - **Object-safe**: nodes are stored as `Box<dyn Processor>` so a patch can
//!   be rewired at construction time without generic explosion.
//! - **Context by reference**: sample rate, block size and the fan-out arena
//!   travel in [`ProcessContext`]; there is no global state.
//! - **No allocation per tick**: secondary buffers are sized on first use and
//!   reused afterwards.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::Sample;
use crate::error::PatchError;
use crate::fan_out::FanOut;
use crate::nodes::Value;

/// Core trait for all graph nodes.
///
/// `process` fills `out` with this tick's output. Implementations pull their
/// upstream inputs first (depth-first), then overwrite `out` in place.
///
/// # Example
///
/// ```rust
/// use voltage_core::{ProcessContext, Processor, Sample};
///
/// /// Emits a rising ramp that restarts every block.
/// struct Ramp;
///
/// impl Processor for Ramp {
///     fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
///         let step = 1.0 / out.len() as Sample;
///         for (i, s) in out.iter_mut().enumerate() {
///             *s = i as Sample * step;
///         }
///     }
/// }
/// ```
pub trait Processor: Send {
    /// Fill `out` with this tick's samples.
    ///
    /// `out.len()` is the block size of the current tick; every call within
    /// one tick receives the same length.
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]);
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        (**self).process(ctx, out)
    }
}

/// Information and shared state available while a patch is processed.
///
/// Sample rate and block size are fixed at construction. The context also owns
/// the [`FanOut`] arena backing every [`Dup`](crate::Dup) in the patch.
pub struct ProcessContext {
    sample_rate: f64,
    block_size: usize,
    fan_out: FanOut,
}

impl ProcessContext {
    /// Creates a context for the given sample rate (Hz) and block size.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidSampleRate`] unless the rate is finite and
    /// positive, and [`PatchError::InvalidBlockSize`] for a zero block size.
    pub fn new(sample_rate: f64, block_size: usize) -> Result<Self, PatchError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PatchError::InvalidSampleRate(sample_rate));
        }
        if block_size == 0 {
            return Err(PatchError::InvalidBlockSize(block_size));
        }
        Ok(Self {
            sample_rate,
            block_size,
            fan_out: FanOut::new(block_size),
        })
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Samples per block.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The fan-out arena holding every [`Dup`](crate::Dup) of this patch.
    pub fn fan_out(&mut self) -> &mut FanOut {
        &mut self.fan_out
    }

    /// Starts a new processing cycle.
    ///
    /// Must be called once before the output nodes are pulled for a block.
    /// Clears the "evaluated" flag of every `Dup`.
    pub fn tick(&mut self) {
        self.fan_out.tick();
    }
}

/// A secondary input: an upstream node plus the buffer it renders into.
///
/// Nodes use a `Source` for every input other than the one that drives the
/// caller's buffer.
pub struct Source {
    node: Box<dyn Processor>,
    buf: Vec<Sample>,
}

impl Default for Source {
    /// A constant 0.0 input.
    fn default() -> Self {
        Self::new(Value::new(0.0))
    }
}

impl Source {
    /// Wraps an upstream node.
    pub fn new(node: impl Processor + 'static) -> Self {
        Self::from_boxed(Box::new(node))
    }

    /// Wraps an already boxed upstream node.
    pub fn from_boxed(node: Box<dyn Processor>) -> Self {
        Self {
            node,
            buf: Vec::new(),
        }
    }

    /// Replaces the upstream node, keeping the buffer.
    pub fn set(&mut self, node: Box<dyn Processor>) {
        self.node = node;
    }

    /// Processes the upstream node and returns `len` freshly filled samples.
    ///
    /// The buffer is allocated on the first call and reused afterwards.
    pub fn process(&mut self, ctx: &mut ProcessContext, len: usize) -> &[Sample] {
        debug_assert_eq!(len, ctx.block_size(), "block length differs from context");
        if self.buf.len() != len {
            self.buf.resize(len, 0.0);
        }
        self.node.process(ctx, &mut self.buf);
        &self.buf
    }
}

/// Classifies individual samples of a signal as trigger events.
///
/// Implementations may keep state between calls; `is_trigger` is called once
/// per sample, in order.
pub trait Triggerable: Send {
    /// Returns `true` when `sample` fires an event.
    fn is_trigger(&mut self, sample: Sample) -> bool;
}

/// Rising-edge detector: fires when the signal crosses from `<= 0` to `> 0`.
///
/// The previous sample starts at 0.0, so a signal that is positive from the
/// very first sample fires once on that sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingEdge {
    last: Sample,
}

impl RisingEdge {
    /// Creates a detector with a previous sample of 0.0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Triggerable for RisingEdge {
    #[inline]
    fn is_trigger(&mut self, sample: Sample) -> bool {
        let fired = self.last <= 0.0 && sample > 0.0;
        self.last = sample;
        fired
    }
}

/// A trigger input: a [`Source`] paired with a [`Triggerable`] detector.
pub struct Trigger {
    source: Source,
    detector: Box<dyn Triggerable>,
}

impl Default for Trigger {
    /// A trigger that never fires.
    fn default() -> Self {
        Self::from_source(Source::default())
    }
}

impl Trigger {
    /// Wraps an upstream node with a [`RisingEdge`] detector.
    pub fn new(node: impl Processor + 'static) -> Self {
        Self::from_source(Source::new(node))
    }

    /// Wraps an already boxed upstream node with a [`RisingEdge`] detector.
    pub fn from_boxed(node: Box<dyn Processor>) -> Self {
        Self::from_source(Source::from_boxed(node))
    }

    /// Wraps an upstream node with a custom detector.
    pub fn with_detector(
        node: impl Processor + 'static,
        detector: impl Triggerable + 'static,
    ) -> Self {
        Self {
            source: Source::new(node),
            detector: Box::new(detector),
        }
    }

    fn from_source(source: Source) -> Self {
        Self {
            source,
            detector: Box::new(RisingEdge::new()),
        }
    }

    /// Replaces the upstream node, keeping the detector state.
    pub fn set(&mut self, node: Box<dyn Processor>) {
        self.source.set(node);
    }

    /// Processes the upstream node and returns a view for classifying samples.
    pub fn process(&mut self, ctx: &mut ProcessContext, len: usize) -> TriggerBlock<'_> {
        let samples = self.source.process(ctx, len);
        TriggerBlock {
            samples,
            detector: &mut *self.detector,
        }
    }
}

/// One block of trigger input, classified sample by sample.
pub struct TriggerBlock<'a> {
    samples: &'a [Sample],
    detector: &'a mut dyn Triggerable,
}

impl TriggerBlock<'_> {
    /// Returns whether sample `i` fires.
    ///
    /// Must be called exactly once per index, in increasing order, so that
    /// stateful detectors see the signal as a continuous stream.
    #[inline]
    pub fn fired(&mut self, i: usize) -> bool {
        self.detector.is_trigger(self.samples[i])
    }

    /// The raw trigger samples of this block.
    pub fn samples(&self) -> &[Sample] {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(Sample);

    impl Processor for Counter {
        fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
            for s in out.iter_mut() {
                self.0 += 1.0;
                *s = self.0;
            }
        }
    }

    #[test]
    fn context_rejects_bad_settings() {
        assert_eq!(
            ProcessContext::new(0.0, 64).err(),
            Some(PatchError::InvalidSampleRate(0.0))
        );
        assert!(matches!(
            ProcessContext::new(f64::NAN, 64),
            Err(PatchError::InvalidSampleRate(_))
        ));
        assert_eq!(
            ProcessContext::new(48000.0, 0).err(),
            Some(PatchError::InvalidBlockSize(0))
        );
    }

    #[test]
    fn source_reuses_buffer() {
        let mut ctx = ProcessContext::new(48000.0, 4).unwrap();
        let mut src = Source::new(Counter(0.0));
        assert_eq!(src.process(&mut ctx, 4), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(src.process(&mut ctx, 4), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn default_source_is_silent() {
        let mut ctx = ProcessContext::new(48000.0, 8).unwrap();
        let mut src = Source::default();
        assert!(src.process(&mut ctx, 8).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rising_edge_fires_on_transition_only() {
        let mut edge = RisingEdge::new();
        let signal = [0.0, 1.0, 1.0, -1.0, 0.0, 0.5, 0.0, -0.2, 0.3];
        let fired: Vec<bool> = signal.iter().map(|&s| edge.is_trigger(s)).collect();
        assert_eq!(
            fired,
            [false, true, false, false, false, true, false, false, true]
        );
    }

    #[test]
    fn rising_edge_fires_on_first_positive_sample() {
        let mut edge = RisingEdge::new();
        assert!(edge.is_trigger(1.0));
        assert!(!edge.is_trigger(1.0));
    }

    #[test]
    fn trigger_state_spans_blocks() {
        // A constant high signal fires once, not once per block.
        let mut ctx = ProcessContext::new(48000.0, 4).unwrap();
        let mut trig = Trigger::new(Value::new(1.0));
        let mut count = 0;
        for _ in 0..3 {
            let mut block = trig.process(&mut ctx, 4);
            for i in 0..4 {
                if block.fired(i) {
                    count += 1;
                }
            }
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn default_trigger_never_fires() {
        let mut ctx = ProcessContext::new(48000.0, 16).unwrap();
        let mut trig = Trigger::default();
        let mut block = trig.process(&mut ctx, 16);
        assert!((0..16).all(|i| !block.fired(i)));
    }

    #[test]
    fn custom_detector() {
        struct Above(Sample);
        impl Triggerable for Above {
            fn is_trigger(&mut self, sample: Sample) -> bool {
                sample > self.0
            }
        }

        let mut ctx = ProcessContext::new(48000.0, 3).unwrap();
        let mut trig = Trigger::with_detector(Value::new(0.7), Above(0.5));
        let mut block = trig.process(&mut ctx, 3);
        assert_eq!(block.samples(), &[0.7, 0.7, 0.7]);
        assert!((0..3).all(|i| block.fired(i)));
    }
}
