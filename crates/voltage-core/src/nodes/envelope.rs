//! Attack/decay envelope generator.
//!
//! ```text
//!   1.0 ┤    /\
//!       │   /  \
//!       │  /    \
//!       │ /      \
//!   0.0 ┼/        \________  gate = 0
//!       trig peak
//! ```
//!
//! There is no sustain stage: reaching 1.0 always ends the attack. The level
//! then decays towards the gate value. A gate above the current level restarts
//! the attack on its own, so a gate held above zero makes the level cycle
//! between the gate and the peak.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::Sample;
use crate::error::PatchError;
use crate::patch::Patchable;
use crate::processor::{ProcessContext, Processor, Source, Trigger};

/// Rate controls are scaled by this factor: a control value of 0.1 is a one
/// second ramp over the full range.
const RATE_SCALE: f64 = 10.0;

/// Attack/decay envelope.
///
/// Inputs:
/// - `gate`: target level; drives the output buffer.
/// - `trig`: trigger that forces the attack phase.
/// - `att`: attack time control. The level rises by `1 / (att · sr · 10)`
///   per sample; zero or negative holds.
/// - `dec`: decay time control, as `att` but falling.
///
/// # Example
///
/// ```rust
/// use voltage_core::{Env, ProcessContext, Processor, Value};
///
/// let mut ctx = ProcessContext::new(1000.0, 64).unwrap();
/// let mut env = Env::new(Value::new(0.0))
///     .with_trigger(Value::new(1.0))
///     .with_attack(Value::new(0.01)); // 0.01 per sample at 1 kHz
/// let mut block = vec![0.0; 64];
/// ctx.tick();
/// env.process(&mut ctx, &mut block);
/// assert!((block[0] - 0.01).abs() < 1e-6);
/// ```
pub struct Env {
    gate: Box<dyn Processor>,
    trig: Trigger,
    att: Source,
    dec: Source,
    level: f64,
    attacking: bool,
}

impl Env {
    /// Node type name.
    pub const KIND: &'static str = "env";
    /// Input roles.
    pub const INPUTS: &'static [&'static str] = &["gate", "trig", "att", "dec"];

    /// Creates an envelope following `gate`.
    ///
    /// With no trigger and zero rates the level stays at 0.0 until rates are
    /// connected.
    pub fn new(gate: impl Processor + 'static) -> Self {
        Self {
            gate: Box::new(gate),
            trig: Trigger::default(),
            att: Source::default(),
            dec: Source::default(),
            level: 0.0,
            attacking: false,
        }
    }

    /// Sets the trigger input.
    pub fn with_trigger(mut self, trig: impl Processor + 'static) -> Self {
        self.trig = Trigger::new(trig);
        self
    }

    /// Sets the attack rate control.
    pub fn with_attack(mut self, att: impl Processor + 'static) -> Self {
        self.att = Source::new(att);
        self
    }

    /// Sets the decay rate control.
    pub fn with_decay(mut self, dec: impl Processor + 'static) -> Self {
        self.dec = Source::new(dec);
        self
    }

    /// Current level.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Whether the envelope is rising.
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }
}

impl Processor for Env {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        let len = out.len();
        self.gate.process(ctx, out);
        let mut trig = self.trig.process(ctx, len);
        let att = self.att.process(ctx, len);
        let dec = self.dec.process(ctx, len);
        let scale = ctx.sample_rate() * RATE_SCALE;

        let mut v = self.level;
        let mut up = self.attacking;
        for (i, s) in out.iter_mut().enumerate() {
            let gate = f64::from(*s);
            // The detector must see every sample, even while attacking.
            let fired = trig.fired(i);
            if !up {
                if fired || v < gate {
                    up = true;
                } else if v > gate && dec[i] > 0.0 {
                    v -= 1.0 / (f64::from(dec[i]) * scale);
                }
            }
            if up && att[i] > 0.0 {
                v += 1.0 / (f64::from(att[i]) * scale);
            }
            if v > 1.0 {
                v = 1.0;
                up = false;
            } else if v < 0.0 {
                v = 0.0;
            }
            *s = v as Sample;
        }
        self.level = v;
        self.attacking = up;
    }
}

impl Patchable for Env {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "gate" => self.gate = node,
            "trig" => self.trig.set(node),
            "att" => self.att.set(node),
            "dec" => self.dec.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Value;

    /// Emits 1.0 on the listed sample indices (counted across blocks), 0.0 otherwise.
    struct Pulses {
        at: Vec<usize>,
        pos: usize,
    }

    impl Processor for Pulses {
        fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
            for s in out.iter_mut() {
                *s = if self.at.contains(&self.pos) { 1.0 } else { 0.0 };
                self.pos += 1;
            }
        }
    }

    fn pluck(trigger_at: Vec<usize>) -> Env {
        // At 1 kHz: +0.03 per sample rising, -0.02 per sample falling.
        Env::new(Value::new(0.0))
            .with_trigger(Pulses {
                at: trigger_at,
                pos: 0,
            })
            .with_attack(Value::new(1.0 / 300.0))
            .with_decay(Value::new(0.005))
    }

    fn render(env: &mut Env, len: usize) -> Vec<Sample> {
        let mut ctx = ProcessContext::new(1000.0, len).unwrap();
        let mut block = vec![0.0; len];
        ctx.tick();
        env.process(&mut ctx, &mut block);
        block
    }

    #[test]
    fn idle_without_trigger() {
        let mut env = Env::new(Value::new(0.0))
            .with_attack(Value::new(0.01))
            .with_decay(Value::new(0.01));
        assert!(render(&mut env, 128).iter().all(|&s| s == 0.0));
        assert!(!env.is_attacking());
    }

    #[test]
    fn trigger_rises_then_falls() {
        let mut env = pluck(vec![0]);
        let out = render(&mut env, 120);

        let peak = out
            .iter()
            .position(|&s| s == 1.0)
            .expect("envelope reaches the peak");
        // 0.03 per sample: 34 samples to pass 1.0.
        assert_eq!(peak, 33);
        for w in out[..=peak].windows(2) {
            assert!(w[1] > w[0], "attack not rising: {w:?}");
        }
        // 0.02 per sample: 50 samples from 1.0 down to 0.0.
        let floor = peak + 50;
        for w in out[peak..=floor].windows(2) {
            assert!(w[1] < w[0], "decay not falling: {w:?}");
        }
        assert!(out[floor..].iter().all(|&s| s == 0.0));
        assert!((out[0] - 0.03).abs() < 1e-6);
        assert!((out[peak + 1] - 0.98).abs() < 1e-6);
    }

    #[test]
    fn retrigger_resumes_from_current_level() {
        let mut env = pluck(vec![0, 60]);
        let out = render(&mut env, 100);
        // At sample 59 the decay has run 26 steps from 1.0.
        let before = out[59];
        assert!((before - 0.48).abs() < 1e-4, "level before retrigger {before}");
        assert!((out[60] - (before + 0.03)).abs() < 1e-4);
        assert!(out[61] > out[60]);
    }

    #[test]
    fn trigger_while_attacking_is_consumed() {
        let mut env = pluck(vec![0, 10]);
        let single = render(&mut pluck(vec![0]), 40);
        let double = render(&mut env, 40);
        assert_eq!(single, double);
    }

    #[test]
    fn gate_above_level_starts_attack() {
        let mut env = Env::new(Value::new(0.5))
            .with_attack(Value::new(0.01))
            .with_decay(Value::new(0.01));
        let out = render(&mut env, 400);
        assert!(out[0] > 0.0);
        // Each dip below the gate restarts the attack.
        let peaks = out.iter().filter(|&&s| s == 1.0).count();
        assert!(peaks >= 3, "only {peaks} peaks");
        assert!(out[100..].iter().all(|&s| s > 0.48), "fell below the gate");
    }

    #[test]
    fn zero_rates_hold_level() {
        let mut env = Env::new(Value::new(0.0)).with_trigger(Value::new(1.0));
        let out = render(&mut env, 32);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(env.is_attacking());
    }

    #[test]
    fn level_carries_across_ticks() {
        let mut env = pluck(vec![0]);
        let mut ctx = ProcessContext::new(1000.0, 10).unwrap();
        let mut block = vec![0.0; 10];
        let mut all = Vec::new();
        for _ in 0..12 {
            ctx.tick();
            env.process(&mut ctx, &mut block);
            all.extend_from_slice(&block);
        }
        assert_eq!(all, render(&mut pluck(vec![0]), 120));
    }
}
