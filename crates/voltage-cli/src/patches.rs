//! Built-in demo patches.
//!
//! Patches are wired in code: the node layer has no patch file format.

use clap::ValueEnum;
use voltage_core::{
    Clip, Env, Mul, ProcessContext, Processor, Rand, Sin, Square, Value, hz_to_sample,
};

/// Patches the `render` command can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoPatch {
    /// 440 Hz sine at half scale
    Sine,
    /// 220 Hz square at quarter scale
    Square,
    /// Plucked square notes at random pitches, four per second
    Pluck,
    /// Sine hopping to a random pitch eight times per second
    Random,
}

impl DemoPatch {
    /// Every demo patch, in listing order.
    pub const ALL: [DemoPatch; 4] = [
        DemoPatch::Sine,
        DemoPatch::Square,
        DemoPatch::Pluck,
        DemoPatch::Random,
    ];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DemoPatch::Sine => "sine",
            DemoPatch::Square => "square",
            DemoPatch::Pluck => "pluck",
            DemoPatch::Random => "random",
        }
    }

    /// Builds the patch's output node.
    ///
    /// Patches that share a node register it in `ctx`'s fan-out arena, so the
    /// returned node must be pulled with the same context. `seed` makes the
    /// random patches reproducible; `None` seeds from the system.
    pub fn build(self, ctx: &mut ProcessContext, seed: Option<u64>) -> Box<dyn Processor> {
        match self {
            DemoPatch::Sine => Box::new(Mul::new(Sin::new(Value::new(0.0)), Value::new(0.5))),
            DemoPatch::Square => {
                Box::new(Mul::new(Square::new(Value::new(-0.1)), Value::new(0.25)))
            }
            DemoPatch::Pluck => {
                // One clock feeds both the envelope and the pitch randomizer.
                let clock = ctx.fan_out().dup(Square::new(Value::new(hz_to_sample(4.0))));
                let env_trig = clock.output(ctx.fan_out());
                let pitch_trig = clock.output(ctx.fan_out());

                let pitch =
                    random(Value::new(-0.15), Value::new(0.05), seed).with_trigger(pitch_trig);
                let env = Env::new(Value::new(0.0))
                    .with_trigger(env_trig)
                    .with_attack(Value::new(0.0002))
                    .with_decay(Value::new(0.004));
                let voice = Mul::new(Square::new(pitch), env);
                Box::new(Clip::new(Mul::new(voice, Value::new(0.4))))
            }
            DemoPatch::Random => {
                let clock = Square::new(Value::new(hz_to_sample(8.0)));
                let pitch = random(Value::new(-0.1), Value::new(0.1), seed).with_trigger(clock);
                Box::new(Mul::new(Sin::new(pitch), Value::new(0.5)))
            }
        }
    }
}

fn random(min: Value, max: Value, seed: Option<u64>) -> Rand {
    match seed {
        Some(seed) => Rand::with_seed(min, max, seed),
        None => Rand::new(min, max),
    }
}
