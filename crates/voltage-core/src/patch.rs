//! Binding upstream nodes to input roles by name.
//!
//! Nodes expose their inputs as typed fields (`pitch`, `gate`, `trig`, ...) set
//! through builder methods. Hosts that wire patches from names (a text
//! description, a UI) use [`Patchable::set_input`] instead. The lookup happens
//! once, at construction time; the per-sample path only sees the fields.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::error::PatchError;
use crate::nodes::{Clip, Env, Mul, Rand, Sin, Square, Sum, Value};
use crate::processor::Processor;
use rand::rngs::StdRng;

/// A node whose inputs can be bound by role name.
///
/// # Example
///
/// ```rust
/// use voltage_core::{Patchable, Square, Value};
///
/// let mut osc = Square::new(Value::new(0.0));
/// osc.set_input("pitch", Box::new(Value::new(0.1))).unwrap();
/// assert!(osc.set_input("cutoff", Box::new(Value::new(0.0))).is_err());
/// ```
pub trait Patchable: Processor {
    /// Node type name, as used in listings and error messages.
    fn kind(&self) -> &'static str;

    /// Names of the input roles this node accepts.
    fn input_names(&self) -> &'static [&'static str];

    /// Binds `node` to the input role `name`, replacing the previous binding.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::UnknownInput`] if the node has no such role.
    fn set_input(&mut self, name: &str, node: Box<dyn Processor>) -> Result<(), PatchError>;
}

/// Static description of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// Type name.
    pub name: &'static str,
    /// Input role names; the first one drives the output buffer.
    pub inputs: &'static [&'static str],
    /// One-line description.
    pub description: &'static str,
}

/// Every built-in node type.
pub const CATALOG: &[NodeInfo] = &[
    NodeInfo {
        name: Square::KIND,
        inputs: Square::INPUTS,
        description: "square oscillator, 0.1/octave pitch, phase reset on sync",
    },
    NodeInfo {
        name: Sin::KIND,
        inputs: Sin::INPUTS,
        description: "sine oscillator, 0.1/octave pitch, phase reset on sync",
    },
    NodeInfo {
        name: Mul::KIND,
        inputs: Mul::INPUTS,
        description: "elementwise product of two signals",
    },
    NodeInfo {
        name: Sum::KIND,
        inputs: Sum::INPUTS,
        description: "elementwise sum of two signals",
    },
    NodeInfo {
        name: Env::KIND,
        inputs: Env::INPUTS,
        description: "attack/decay envelope following a gate, restarted by trigger",
    },
    NodeInfo {
        name: Clip::KIND,
        inputs: Clip::INPUTS,
        description: "limits a signal to [-1, 1]",
    },
    NodeInfo {
        name: Value::KIND,
        inputs: Value::INPUTS,
        description: "constant value",
    },
    NodeInfo {
        name: Rand::<StdRng>::KIND,
        inputs: Rand::<StdRng>::INPUTS,
        description: "samples a uniform random value in [min, max) on each trigger",
    },
];

/// Looks up a node type by name.
pub fn node_info(name: &str) -> Option<&'static NodeInfo> {
    CATALOG.iter().find(|info| info.name == name)
}
