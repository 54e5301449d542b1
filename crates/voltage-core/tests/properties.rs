//! Property-based tests for voltage-core nodes.
//!
//! Tests output bounds, fan-out evaluation counts and pitch conversion using
//! proptest for randomized control signals.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use voltage_core::{
    Clip, Env, Mul, ProcessContext, Processor, Rand, Sample, Sin, Square, Sum, Value,
    hz_to_sample, sample_to_hz,
};

/// Plays back a fixed buffer on every tick.
#[derive(Clone)]
struct Playback(Vec<Sample>);

impl Processor for Playback {
    fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
        out.copy_from_slice(&self.0[..out.len()]);
    }
}

/// Counts evaluations through a shared handle.
struct Counted(Arc<AtomicUsize>);

impl Processor for Counted {
    fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
        let n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        out.fill(n as Sample);
    }
}

const BLOCK: usize = 64;

fn render(node: &mut dyn Processor, ticks: usize) -> Vec<Sample> {
    let mut ctx = ProcessContext::new(48000.0, BLOCK).unwrap();
    let mut block = vec![0.0; BLOCK];
    let mut all = Vec::new();
    for _ in 0..ticks {
        ctx.tick();
        node.process(&mut ctx, &mut block);
        all.extend_from_slice(&block);
    }
    all
}

fn block(range: core::ops::RangeInclusive<f32>) -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(range, BLOCK)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Clip output stays in [-1, 1] and clipping twice changes nothing.
    #[test]
    fn clip_bounded_and_idempotent(input in block(-100.0f32..=100.0f32)) {
        let once = render(&mut Clip::new(Playback(input.clone())), 1);
        let twice = render(&mut Clip::new(Clip::new(Playback(input))), 1);
        prop_assert!(once.iter().all(|s| (-1.0..=1.0).contains(s)));
        prop_assert_eq!(once, twice);
    }

    /// Square output is exactly ±1 for any pitch in a five-octave range.
    #[test]
    fn square_is_bipolar(pitch in block(-0.25f32..=0.25f32)) {
        let out = render(&mut Square::new(Playback(pitch)), 8);
        prop_assert!(out.iter().all(|&s| s == 1.0 || s == -1.0));
    }

    /// Sine output is bounded for any pitch and sync pattern.
    #[test]
    fn sine_is_bounded(
        pitch in block(-0.3f32..=0.3f32),
        sync in block(-1.0f32..=1.0f32),
    ) {
        let out = render(&mut Sin::new(Playback(pitch)).with_sync(Playback(sync)), 8);
        prop_assert!(out.iter().all(|s| s.abs() <= 1.0));
    }

    /// The envelope level stays in [0, 1] for arbitrary gate, trigger and rates.
    #[test]
    fn envelope_level_bounded(
        gate in block(-2.0f32..=2.0f32),
        trig in block(-1.0f32..=1.0f32),
        att in block(-0.01f32..=0.01f32),
        dec in block(-0.01f32..=0.01f32),
    ) {
        let mut env = Env::new(Playback(gate))
            .with_trigger(Playback(trig))
            .with_attack(Playback(att))
            .with_decay(Playback(dec));
        let out = render(&mut env, 16);
        prop_assert!(out.iter().all(|s| (0.0..=1.0).contains(s)), "{:?}", out);
    }

    /// Every latched value lies in [min, max).
    #[test]
    fn rand_within_bounds(
        min in -10.0f32..0.0f32,
        width in 0.001f32..10.0f32,
        seed in any::<u64>(),
        trig in block(-1.0f32..=1.0f32),
    ) {
        let max = min + width;
        let mut rnd = Rand::with_seed(Value::new(min), Value::new(max), seed)
            .with_trigger(Playback(trig));
        let out = render(&mut rnd, 4);
        prop_assert!(
            out.iter().all(|&s| s == 0.0 || (min..max).contains(&s)),
            "value outside [{}, {})", min, max
        );
    }

    /// Sum does not depend on input order.
    #[test]
    fn sum_commutes(a in block(-1.0f32..=1.0f32), b in block(-1.0f32..=1.0f32)) {
        let ab = render(&mut Sum::new(Playback(a.clone()), Playback(b.clone())), 1);
        let ba = render(&mut Sum::new(Playback(b), Playback(a)), 1);
        prop_assert_eq!(ab, ba);
    }

    /// Adding a signal to its negation cancels exactly, at any magnitude.
    #[test]
    fn sum_with_negation_is_zero(a in block(-1.0e6f32..=1.0e6f32)) {
        let neg: Vec<Sample> = a.iter().map(|s| -s).collect();
        let out = render(&mut Sum::new(Playback(a), Playback(neg)), 1);
        prop_assert!(out.iter().all(|&s| s == 0.0));
    }

    /// Multiplying by one is the identity; nothing is clamped.
    #[test]
    fn mul_by_one_is_identity(a in block(-1.0e6f32..=1.0e6f32)) {
        let out = render(&mut Mul::new(Playback(a.clone()), Value::new(1.0)), 1);
        prop_assert_eq!(out, a);
    }

    /// However many consumers a dup has, its source runs once per tick and
    /// every consumer sees the same block.
    #[test]
    fn fan_out_evaluates_once(consumers in 1usize..8, ticks in 1usize..6) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut ctx = ProcessContext::new(48000.0, BLOCK).unwrap();
        let dup = ctx.fan_out().dup(Counted(Arc::clone(&calls)));
        let mut outputs: Vec<_> = (0..consumers).map(|_| dup.output(ctx.fan_out())).collect();
        let mut buf = vec![0.0; BLOCK];

        for tick in 1..=ticks {
            ctx.tick();
            for out in &mut outputs {
                buf.fill(-1.0);
                out.process(&mut ctx, &mut buf);
                prop_assert!(buf.iter().all(|&s| s == tick as Sample));
            }
        }
        prop_assert_eq!(calls.load(Ordering::Relaxed), ticks);
    }

    /// Converting a frequency to a control value and back lands within 0.01%.
    #[test]
    fn pitch_conversion_inverts(hz in 20.0f64..20000.0) {
        let back = sample_to_hz(hz_to_sample(hz));
        prop_assert!((back - hz).abs() / hz < 1e-4, "{} -> {}", hz, back);
    }
}
