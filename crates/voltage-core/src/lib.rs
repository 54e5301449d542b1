//! Voltage Core - pull-based modular synthesis nodes
//!
//! This crate provides the node layer of a small modular synthesizer: audio-rate
//! units that generate or transform blocks of samples, wired into a pull-based
//! graph. A host asks its output node to fill a buffer once per tick; every node
//! first pulls its upstream inputs, then rewrites the buffer in place.
//!
//! # Core Abstractions
//!
//! ## Processing Contracts
//!
//! - [`Processor`] - Object-safe trait implemented by every node
//! - [`ProcessContext`] - Sample rate, block size and the fan-out arena
//! - [`Source`] - Secondary input that owns its own block buffer
//! - [`Trigger`] / [`Triggerable`] / [`RisingEdge`] - Event classification
//!
//! ## Nodes
//!
//! - [`Square`], [`Sin`] - Oscillators with exponential pitch control and hard sync
//! - [`Mul`], [`Sum`] - Elementwise combinators
//! - [`Env`] - Attack/decay envelope driven by gate and trigger
//! - [`Clip`], [`Value`], [`Rand`] - Range limiting, constants, sample-and-hold
//!
//! ## Fan-out
//!
//! - [`Dup`] / [`Output`] - Share one upstream node between several consumers
//!   while evaluating it at most once per tick
//!
//! ## Utilities
//!
//! - Pitch conversion: [`sample_to_hz`], [`hz_to_sample`]
//! - Math approximations: [`fast_exp2`], [`fast_sin_turns`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! voltage-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use voltage_core::{Env, Mul, ProcessContext, Processor, Sin, Value};
//!
//! let mut ctx = ProcessContext::new(48000.0, 256).unwrap();
//!
//! // A 440 Hz sine shaped by a one-shot envelope.
//! let env = Env::new(Value::new(0.0))
//!     .with_trigger(Value::new(1.0))
//!     .with_attack(Value::new(0.001))
//!     .with_decay(Value::new(0.05));
//! let mut voice = Mul::new(Sin::new(Value::new(0.0)), env);
//!
//! let mut block = vec![0.0; ctx.block_size()];
//! for _ in 0..4 {
//!     ctx.tick();
//!     voice.process(&mut ctx, &mut block);
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Pull evaluation**: a node computes only when a consumer asks for it
//! - **In-place buffers**: the primary input is rendered straight into the
//!   caller's buffer; no allocation per tick
//! - **Owned state**: each node owns its accumulators; outputs are shared only
//!   through the fan-out arena

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub mod fan_out;
pub mod fast_math;
pub mod nodes;
pub mod patch;
pub mod pitch;
pub mod processor;

/// A single audio or control sample.
///
/// Audio sits nominally in \[-1, 1\]; control signals (pitch, rates) may exceed it.
pub type Sample = f32;

// Re-export main types at crate root
pub use error::PatchError;
pub use fan_out::{Dup, FanOut, Output, OutputId};
pub use fast_math::{fast_exp2, fast_sin_turns};
pub use nodes::{Clip, Env, Mul, Rand, Sin, Square, Sum, Value};
pub use patch::Patchable;
pub use pitch::{PitchTracker, REFERENCE_HZ, hz_to_sample, sample_to_hz};
pub use processor::{
    ProcessContext, Processor, RisingEdge, Source, Trigger, TriggerBlock, Triggerable,
};
