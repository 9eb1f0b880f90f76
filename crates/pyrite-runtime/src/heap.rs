//! Frame arena.
//!
//! Every environment frame of a run lives in one [`Heap`] and is named by a
//! [`FrameId`]. A closure holds the handle of the frame it was defined in,
//! so later assignments in that frame are visible to it and frames are never
//! copied. Handles are plain indices: a closure stored in the frame it
//! captured is not an ownership cycle, and frames are freed by
//! [`Heap::collect`] instead, which keeps everything reachable from the
//! backend's roots (the frames of active calls and the values it still
//! holds) and releases the rest.
//!
//! # Examples
//!
//! ```
//! use pyrite_mem::Symbol;
//! use pyrite_runtime::{FrameId, Heap, Value};
//! # use pyrite_runtime::Callable;
//! # #[derive(Clone)] struct NoFn(FrameId);
//! # impl Callable for NoFn {
//! #     fn name(&self) -> &str { "" }
//! #     fn arity(&self) -> usize { 0 }
//! #     fn same(&self, _: &Self) -> bool { false }
//! #     fn env(&self) -> FrameId { self.0 }
//! # }
//!
//! let x = Symbol::new(20);
//! let mut heap: Heap<NoFn> = Heap::new();
//! let module = heap.alloc(None);
//! heap.define(module, x, Value::Int(1));
//!
//! let call = heap.alloc(Some(module));
//! assert!(matches!(heap.lookup(call, x), Some(Value::Int(1))));
//!
//! // Only the module frame is still in use.
//! assert_eq!(heap.collect([module], []), 1);
//! assert!(!heap.contains(call));
//! ```

use crate::value::{Callable, Value};
use fxhash::FxHashMap;
use pyrite_mem::Symbol;
use std::fmt;

/// Live frame count below which [`Heap::wants_collection`] stays false.
pub const MIN_COLLECT_THRESHOLD: usize = 256;

/// Handle to a frame in a [`Heap`].
///
/// The generation distinguishes successive frames stored in the same slot,
/// so a handle to a freed frame resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId {
    index: u32,
    generation: u32,
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.index)
    }
}

struct Frame<F> {
    vars: FxHashMap<Symbol, Value<F>>,
    parent: Option<FrameId>,
}

struct Slot<F> {
    generation: u32,
    marked: bool,
    frame: Option<Frame<F>>,
}

/// Allocation and collection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Frames currently allocated
    pub live: usize,
    /// Most frames allocated at once
    pub peak: usize,
    /// Frames allocated over the heap's lifetime
    pub allocated: usize,
    /// Frames freed by collection
    pub reclaimed: usize,
    /// Collections run
    pub collections: usize,
}

/// Arena of environment frames for one run.
pub struct Heap<F> {
    slots: Vec<Slot<F>>,
    free: Vec<u32>,
    threshold: usize,
    stats: HeapStats,
}

impl<F: Callable> Heap<F> {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            threshold: MIN_COLLECT_THRESHOLD,
            stats: HeapStats::default(),
        }
    }

    /// Allocates an empty frame whose lookups fall back to `parent`.
    pub fn alloc(&mut self, parent: Option<FrameId>) -> FrameId {
        let frame = Frame {
            vars: FxHashMap::default(),
            parent,
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.frame = Some(frame);
                FrameId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    marked: false,
                    frame: Some(frame),
                });
                FrameId {
                    index,
                    generation: 0,
                }
            }
        };

        self.stats.allocated += 1;
        self.stats.live += 1;
        self.stats.peak = self.stats.peak.max(self.stats.live);
        id
    }

    fn frame(&self, id: FrameId) -> Option<&Frame<F>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_ref())
    }

    fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame<F>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_mut())
    }

    /// True if `id` names a frame that has not been freed.
    #[must_use]
    pub fn contains(&self, id: FrameId) -> bool {
        self.frame(id).is_some()
    }

    /// Binds or rebinds `name` in frame `id`.
    pub fn define(&mut self, id: FrameId, name: Symbol, value: Value<F>) {
        if let Some(frame) = self.frame_mut(id) {
            frame.vars.insert(name, value);
        }
    }

    /// Finds `name` in frame `id` or the nearest ancestor that binds it.
    #[must_use]
    pub fn lookup(&self, id: FrameId, name: Symbol) -> Option<Value<F>> {
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = self.frame(id)?;
            if let Some(value) = frame.vars.get(&name) {
                return Some(value.clone());
            }
            current = frame.parent;
        }
        None
    }

    /// The frame `id` falls back to.
    #[must_use]
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frame(id).and_then(|frame| frame.parent)
    }

    /// Number of bindings in frame `id` alone.
    #[must_use]
    pub fn bindings(&self, id: FrameId) -> usize {
        self.frame(id).map_or(0, |frame| frame.vars.len())
    }

    /// Number of allocated frames.
    #[must_use]
    pub fn live(&self) -> usize {
        self.stats.live
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// True once enough frames were allocated since the last collection
    /// for another one to pay off.
    #[must_use]
    pub fn wants_collection(&self) -> bool {
        self.stats.live >= self.threshold
    }

    /// Frees every frame not reachable from `frames`, or from the frame a
    /// function among `values` captured, following parent links and the
    /// functions bound in each reachable frame. Returns the number freed.
    ///
    /// The caller must pass every frame and value it will use again.
    pub fn collect<'v>(
        &mut self,
        frames: impl IntoIterator<Item = FrameId>,
        values: impl IntoIterator<Item = &'v Value<F>>,
    ) -> usize
    where
        F: 'v,
    {
        let mut pending: Vec<FrameId> = frames.into_iter().collect();
        pending.extend(values.into_iter().filter_map(Value::captured));

        while let Some(id) = pending.pop() {
            let slot = match self.slots.get_mut(id.index as usize) {
                Some(slot) if slot.generation == id.generation && !slot.marked => slot,
                _ => continue,
            };
            let Some(frame) = slot.frame.as_ref() else {
                continue;
            };
            pending.extend(frame.parent);
            pending.extend(frame.vars.values().filter_map(Value::captured));
            slot.marked = true;
        }

        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.marked {
                slot.marked = false;
            } else if slot.frame.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                freed += 1;
            }
        }

        self.stats.live -= freed;
        self.stats.reclaimed += freed;
        self.stats.collections += 1;
        self.threshold = MIN_COLLECT_THRESHOLD.max(self.stats.live * 2);
        freed
    }
}

impl<F: Callable> Default for Heap<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Heap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("slots", &self.slots.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
