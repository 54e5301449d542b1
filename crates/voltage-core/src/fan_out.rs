//! Fan-out: one upstream node, several consumers, one evaluation per tick.
//!
//! In a pull graph every consumer calls `process` on its inputs. When two
//! consumers share an upstream node, naive pulling would run it twice per
//! tick (advancing phase twice) and let the first consumer's in-place edits
//! corrupt what the second one sees. A [`Dup`] prevents both.
//!
//! # Architecture
//!
//! The [`FanOut`] arena, owned by the [`ProcessContext`], holds one slot per
//! `Dup`: the upstream node, the ids of the registered [`Output`]s, a scratch
//! buffer and an "evaluated this tick" flag. `Dup` is a copyable handle to a
//! slot; `Output` is a [`Processor`] that consumers wire as an input.
//!
//! - With at most one registered output the first pull of a tick renders the
//!   upstream node straight into the caller's buffer (no copy) and later
//!   pulls in the same tick do nothing.
//! - With more outputs the first pull renders into the scratch buffer and
//!   every pull copies the scratch buffer out, so each consumer gets its own
//!   copy to modify.
//!
//! The scratch buffer is allocated when the second output is registered. An
//! output stops counting as a consumer once it is closed or dropped, so
//! rebinding a node input that held an `Output` releases it.
//! [`ProcessContext::tick`] clears every slot's flag; it must run once before
//! each block is pulled.
//!
//! # Example
//!
//! ```rust
//! use voltage_core::{ProcessContext, Processor, Square, Sum, Value};
//!
//! let mut ctx = ProcessContext::new(48000.0, 64).unwrap();
//! let dup = ctx.fan_out().dup(Square::new(Value::new(0.0)));
//! let left = dup.output(ctx.fan_out());
//! let right = dup.output(ctx.fan_out());
//!
//! // Both halves of the sum read the same square wave; it runs once per tick.
//! let mut doubled = Sum::new(left, right);
//! let mut block = vec![0.0; 64];
//! ctx.tick();
//! doubled.process(&mut ctx, &mut block);
//! assert!(block.iter().all(|&s| s == 2.0 || s == -2.0));
//! ```

#[cfg(not(feature = "std"))]
use alloc::{
    boxed::Box,
    sync::{Arc, Weak},
    vec,
    vec::Vec,
};
use core::sync::atomic::{AtomicU32, Ordering};
#[cfg(feature = "std")]
use std::sync::{Arc, Weak};

use crate::Sample;
use crate::processor::{ProcessContext, Processor};

static NEXT_ARENA: AtomicU32 = AtomicU32::new(0);

/// Handle to one fan-out group in a [`FanOut`] arena.
///
/// Handles are only meaningful for the arena that created them; passing one
/// to another arena panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dup {
    arena: u32,
    index: u32,
}

/// Unique identifier for an [`Output`] within its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputId(u32);

impl Dup {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Clears this group's "evaluated" flag.
    ///
    /// [`FanOut::tick`] does this for every group at once.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different arena.
    pub fn tick(self, fan_out: &mut FanOut) {
        fan_out.slot_mut(self).done = false;
    }

    /// Registers a new consumer of this group.
    ///
    /// Registering the second live consumer allocates the scratch buffer.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different arena.
    pub fn output(self, fan_out: &mut FanOut) -> Output {
        let id = OutputId(fan_out.next_output);
        fan_out.next_output += 1;
        let block_size = fan_out.block_size;
        let slot = fan_out.slot_mut(self);
        slot.prune();
        let alive = Arc::new(());
        slot.outputs.push((id, Arc::downgrade(&alive)));
        if slot.outputs.len() > 1 && slot.scratch.is_empty() {
            slot.scratch = vec![0.0; block_size];
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "dup[{}]: scratch buffer allocated ({block_size} samples)",
                self.index
            );
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "dup[{}]: output {} registered, {} consumers",
            self.index,
            id.0,
            slot.outputs.len()
        );
        Output {
            dup: self,
            id,
            _alive: alive,
        }
    }

    /// Rebinds the upstream node of this group.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different arena.
    pub fn set_source(self, fan_out: &mut FanOut, source: impl Processor + 'static) {
        fan_out.slot_mut(self).source = Some(Box::new(source));
        #[cfg(feature = "tracing")]
        tracing::debug!("dup[{}]: source rebound", self.index);
    }

    /// Number of live consumers.
    ///
    /// Outputs that were closed or dropped (for example when a node input is
    /// rebound) are not counted.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different arena.
    pub fn consumers(self, fan_out: &FanOut) -> usize {
        fan_out.slot(self).live()
    }
}

struct DupSlot {
    /// `None` only while the source itself is being processed.
    source: Option<Box<dyn Processor>>,
    /// Registered outputs; an entry is dead once its `Output` is dropped.
    outputs: Vec<(OutputId, Weak<()>)>,
    scratch: Vec<Sample>,
    done: bool,
}

impl DupSlot {
    fn live(&self) -> usize {
        self.outputs
            .iter()
            .filter(|(_, alive)| alive.strong_count() > 0)
            .count()
    }

    fn prune(&mut self) {
        self.outputs.retain(|(_, alive)| alive.strong_count() > 0);
    }
}

/// Arena of fan-out groups, owned by a [`ProcessContext`].
pub struct FanOut {
    id: u32,
    slots: Vec<DupSlot>,
    block_size: usize,
    next_output: u32,
}

impl FanOut {
    pub(crate) fn new(block_size: usize) -> Self {
        Self {
            id: NEXT_ARENA.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            block_size,
            next_output: 0,
        }
    }

    /// Creates a fan-out group around `source` with no consumers yet.
    pub fn dup(&mut self, source: impl Processor + 'static) -> Dup {
        let dup = Dup {
            arena: self.id,
            index: self.slots.len() as u32,
        };
        self.slots.push(DupSlot {
            source: Some(Box::new(source)),
            outputs: Vec::new(),
            scratch: Vec::new(),
            done: false,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!("dup[{}]: created", dup.index);
        dup
    }

    /// Clears the "evaluated" flag of every group and forgets dropped outputs.
    pub fn tick(&mut self) {
        for slot in &mut self.slots {
            slot.done = false;
            slot.prune();
        }
    }

    /// Number of groups in the arena.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no group has been created.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if `dup` was created by this arena.
    pub fn owns(&self, dup: Dup) -> bool {
        dup.arena == self.id && (dup.index as usize) < self.slots.len()
    }

    #[inline]
    fn slot(&self, dup: Dup) -> &DupSlot {
        assert!(self.owns(dup), "dup[{}] belongs to another arena", dup.index);
        &self.slots[dup.index as usize]
    }

    #[inline]
    fn slot_mut(&mut self, dup: Dup) -> &mut DupSlot {
        assert!(self.owns(dup), "dup[{}] belongs to another arena", dup.index);
        &mut self.slots[dup.index as usize]
    }
}

/// One consumer endpoint of a [`Dup`].
///
/// Wire it wherever a [`Processor`] input is expected. Dropping it (or
/// replacing the input it is wired to) deregisters it like [`Output::close`].
#[derive(Debug)]
pub struct Output {
    dup: Dup,
    id: OutputId,
    _alive: Arc<()>,
}

impl Output {
    /// The group this output reads from.
    pub fn dup(&self) -> Dup {
        self.dup
    }

    /// This output's identifier.
    pub fn id(&self) -> OutputId {
        self.id
    }

    /// Deregisters this output from its group.
    ///
    /// The remaining outputs keep working. Order among outputs is not
    /// preserved.
    ///
    /// # Panics
    ///
    /// Panics if `fan_out` is not the arena the output was registered with.
    pub fn close(self, fan_out: &mut FanOut) {
        let slot = fan_out.slot_mut(self.dup);
        if let Some(pos) = slot.outputs.iter().position(|(o, _)| *o == self.id) {
            slot.outputs.swap_remove(pos);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "dup[{}]: output {} closed, {} consumers",
            self.dup.index,
            self.id.0,
            slot.live()
        );
    }
}

impl Processor for Output {
    fn process(&mut self, ctx: &mut ProcessContext, out: &mut [Sample]) {
        let slot = ctx.fan_out().slot_mut(self.dup);
        let shared = slot.live() > 1;

        if slot.done {
            if shared {
                if slot.scratch.len() == out.len() {
                    out.copy_from_slice(&slot.scratch);
                } else {
                    // Re-entrant pull while the source is still running.
                    out.fill(0.0);
                }
            }
            return;
        }
        slot.done = true;

        let Some(mut source) = slot.source.take() else {
            out.fill(0.0);
            return;
        };

        if shared {
            let mut scratch = core::mem::take(&mut slot.scratch);
            if scratch.len() != out.len() {
                scratch.resize(out.len(), 0.0);
            }
            source.process(ctx, &mut scratch);
            out.copy_from_slice(&scratch);
            ctx.fan_out().slot_mut(self.dup).scratch = scratch;
        } else {
            source.process(ctx, out);
        }

        let slot = ctx.fan_out().slot_mut(self.dup);
        if slot.source.is_none() {
            slot.source = Some(source);
        }
    }
}
