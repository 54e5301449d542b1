//! Built-in node types.
//!
//! Every node follows the same shape: its first input renders straight into the
//! output buffer, the remaining inputs are [`Source`](crate::Source)s or
//! [`Trigger`](crate::Trigger)s, and the node then rewrites the buffer in place.
//! Unconnected secondary inputs read as a constant 0.0.
//!
//! | Node | Inputs | Output |
//! |------|--------|--------|
//! | [`Square`] | pitch, syn | ±1 square wave |
//! | [`Sin`] | pitch, syn | sine wave |
//! | [`Mul`] | a, b | `a · b` |
//! | [`Sum`] | a, b | `a + b` |
//! | [`Env`] | gate, trig, att, dec | attack/decay level in \[0, 1\] |
//! | [`Clip`] | in | input limited to \[-1, 1\] |
//! | [`Value`] | | constant |
//! | [`Rand`] | min, max, trig | sample-and-hold random value |

mod combinator;
mod envelope;
mod oscillator;
mod random;
mod utility;

pub use combinator::{Mul, Sum};
pub use envelope::Env;
pub use oscillator::{Sin, Square};
pub use random::Rand;
pub use utility::{Clip, Value};
