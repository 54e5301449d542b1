//! Elementwise combination of two signals.
//!
//! `a` is rendered into the caller's buffer and `b` into the node's own
//! [`Source`] buffer, then the two are merged sample by sample.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::Sample;
use crate::error::PatchError;
use crate::patch::Patchable;
use crate::processor::{ProcessContext, Processor, Source};

/// Elementwise product, `a[i] · b[i]`.
///
/// Multiplying audio by an envelope is the usual VCA.
pub struct Mul {
    a: Box<dyn Processor>,
    b: Source,
}

impl Mul {
    /// Node type name.
    pub const KIND: &'static str = "mul";
    /// Input roles.
    pub const INPUTS: &'static [&'static str] = &["a", "b"];

    /// Multiplies `a` by `b`.
    pub fn new(a: impl Processor + 'static, b: impl Processor + 'static) -> Self {
        Self {
            a: Box::new(a),
            b: Source::new(b),
        }
    }
}

impl Processor for Mul {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        self.a.process(ctx, out);
        let b = self.b.process(ctx, out.len());
        for (o, &x) in out.iter_mut().zip(b) {
            *o *= x;
        }
    }
}

impl Patchable for Mul {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "a" => self.a = node,
            "b" => self.b.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Elementwise sum, `a[i] + b[i]`.
///
/// Also used to offset a pitch signal, which transposes it.
pub struct Sum {
    a: Box<dyn Processor>,
    b: Source,
}

impl Sum {
    /// Node type name.
    pub const KIND: &'static str = "sum";
    /// Input roles.
    pub const INPUTS: &'static [&'static str] = &["a", "b"];

    /// Adds `b` to `a`.
    pub fn new(a: impl Processor + 'static, b: impl Processor + 'static) -> Self {
        Self {
            a: Box::new(a),
            b: Source::new(b),
        }
    }
}

impl Processor for Sum {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        self.a.process(ctx, out);
        let b = self.b.process(ctx, out.len());
        for (o, &x) in out.iter_mut().zip(b) {
            *o += x;
        }
    }
}

impl Patchable for Sum {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "a" => self.a = node,
            "b" => self.b.set(node),
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Sin, Value};

    struct Ramp(Sample);

    impl Processor for Ramp {
        fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
            for s in out.iter_mut() {
                *s = self.0;
                self.0 += 0.25;
            }
        }
    }

    #[test]
    fn mul_by_one_is_identity() {
        let mut ctx = ProcessContext::new(48000.0, 64).unwrap();
        let mut reference = Sin::new(Value::new(0.0));
        let mut scaled = Mul::new(Sin::new(Value::new(0.0)), Value::new(1.0));
        let mut a = vec![0.0; 64];
        let mut b = vec![0.0; 64];
        ctx.tick();
        reference.process(&mut ctx, &mut a);
        scaled.process(&mut ctx, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn mul_elementwise() {
        let mut ctx = ProcessContext::new(48000.0, 4).unwrap();
        let mut node = Mul::new(Ramp(0.0), Value::new(-2.0));
        let mut out = [0.0; 4];
        node.process(&mut ctx, &mut out);
        assert_eq!(out, [0.0, -0.5, -1.0, -1.5]);
    }

    #[test]
    fn sum_with_negation_cancels() {
        let mut ctx = ProcessContext::new(48000.0, 8).unwrap();
        let mut node = Sum::new(Ramp(0.0), Mul::new(Ramp(0.0), Value::new(-1.0)));
        let mut out = [1.0; 8];
        node.process(&mut ctx, &mut out);
        assert!(out.iter().all(|&s| s == 0.0), "{out:?}");
    }

    #[test]
    fn sum_offsets() {
        let mut ctx = ProcessContext::new(48000.0, 4).unwrap();
        let mut node = Sum::new(Ramp(1.0), Value::new(0.5));
        let mut out = [0.0; 4];
        node.process(&mut ctx, &mut out);
        assert_eq!(out, [1.5, 1.75, 2.0, 2.25]);
    }

    #[test]
    fn rewire_by_name() {
        let mut ctx = ProcessContext::new(48000.0, 2).unwrap();
        let mut node = Sum::new(Value::new(1.0), Value::new(1.0));
        node.set_input("b", Box::new(Value::new(3.0))).unwrap();
        let mut out = [0.0; 2];
        node.process(&mut ctx, &mut out);
        assert_eq!(out, [4.0, 4.0]);
    }
}
