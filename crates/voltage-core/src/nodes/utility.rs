//! Stateless helpers: range limiting and constants.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::Sample;
use crate::error::PatchError;
use crate::patch::Patchable;
use crate::processor::{ProcessContext, Processor};

/// Hard clipper limiting its input to \[-1, 1\].
pub struct Clip {
    input: Box<dyn Processor>,
}

impl Clip {
    /// Node type name.
    pub const KIND: &'static str = "clip";
    /// Input roles.
    pub const INPUTS: &'static [&'static str] = &["in"];

    /// Clips `input`.
    pub fn new(input: impl Processor + 'static) -> Self {
        Self {
            input: Box::new(input),
        }
    }
}

impl Processor for Clip {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        self.input.process(ctx, out);
        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

impl Patchable for Clip {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError> {
        match name {
            "in" => self.input = node,
            _ => return Err(PatchError::unknown_input(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Constant source.
///
/// Fills every sample with the same value. Used for fixed pitches, rates and
/// levels, and as the default for unconnected inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    value: Sample,
}

impl Value {
    /// Node type name.
    pub const KIND: &'static str = "value";
    /// A constant has no inputs.
    pub const INPUTS: &'static [&'static str] = &[];

    /// Creates a constant.
    pub const fn new(value: Sample) -> Self {
        Self { value }
    }

    /// Current value.
    pub fn get(&self) -> Sample {
        self.value
    }

    /// Changes the value from the next block on.
    pub fn set(&mut self, value: Sample) {
        self.value = value;
    }
}

impl Processor for Value {
    #[inline]
    fn process(&mut self, _ctx: &mut ProcessContext, out: &mut [Sample]) {
        out.fill(self.value);
    }
}

impl Patchable for Value {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn input_names(&self) -> &'static [&'static str] {
        Self::INPUTS
    }

    fn set_input(&mut self, name: &str, _node: Box<dyn Processor>) -> Result<(), PatchError> {
        Err(PatchError::unknown_input(Self::KIND, name))
    }
}
