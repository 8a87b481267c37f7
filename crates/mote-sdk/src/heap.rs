//! Slot-arena heap with stable, generation-tagged handles
//!
//! The interpreter proper owns allocation and reclamation; the dispatch core
//! only needs three things from the heap: allocate, read through a handle,
//! and be told when a native object is reclaimed. Handles carry a generation
//! counter so a freed-and-reused slot never aliases a stale handle.
//!
//! Reclamation discipline: when the interpreter frees a value that is a
//! materialized native object, it must route the free through the instance
//! cache's `invalidate` first. Skipping that leaves a dangling cache slot —
//! a correctness requirement, not optional cleanup.

use crate::native::{ConstructorId, NativeFn, TableIndex};
use crate::value::Value;

/// Handle to a heap slot. Identity is `(index, generation)` equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapRef {
    index: u32,
    generation: u32,
}

/// Distinguishes a plain array buffer from a typed view onto one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// The backing buffer itself.
    Buffer,
    /// A typed view (Uint8Array-style) onto a buffer.
    View,
}

/// Heap-resident object payload.
///
/// Own-property storage for script objects belongs to the evaluator and is
/// out of scope here; the core only needs each object's kind, its optional
/// constructor token, and (for native objects) the symbol-table
/// back-reference.
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// The root (global) object. There is normally exactly one.
    Root,
    /// String.
    Str(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Array buffer or typed view.
    Buffer {
        /// Buffer or view.
        kind: BufferKind,
        /// Raw bytes.
        data: Vec<u8>,
    },
    /// Script-level object instance.
    Object {
        /// Token of the constructor that built this instance, if a native
        /// constructor did.
        constructor: Option<ConstructorId>,
    },
    /// Script-level function. Built-in constructor functions carry their
    /// constructor token here.
    Function {
        /// Constructor token, for built-in constructors.
        constructor: Option<ConstructorId>,
    },
    /// A native function bound to an implementation and packed signature,
    /// produced by symbol resolution and invoked later with script args.
    NativeFunction {
        /// Implementation entry point.
        imp: NativeFn,
        /// Packed call signature bits (decoded by the dispatch core).
        sig: u32,
    },
    /// A materialized symbol-table (module / prototype) object.
    NativeObject {
        /// Back-reference to the governing symbol table.
        table: TableIndex,
    },
}

struct Slot {
    generation: u32,
    object: Option<HeapObject>,
}

/// The arena. Freed slots are recycled; generations detect staleness.
#[derive(Default)]
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Heap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an object, returning its handle.
    pub fn alloc(&mut self, object: HeapObject) -> HeapRef {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            HeapRef {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                object: Some(object),
            });
            HeapRef {
                index,
                generation: 0,
            }
        }
    }

    /// Read through a handle. Returns `None` for stale or freed handles.
    pub fn get(&self, r: HeapRef) -> Option<&HeapObject> {
        let slot = self.slots.get(r.index as usize)?;
        if slot.generation != r.generation {
            return None;
        }
        slot.object.as_ref()
    }

    /// Mutable read through a handle.
    pub fn get_mut(&mut self, r: HeapRef) -> Option<&mut HeapObject> {
        let slot = self.slots.get_mut(r.index as usize)?;
        if slot.generation != r.generation {
            return None;
        }
        slot.object.as_mut()
    }

    /// Check whether a handle still points at a live object.
    pub fn contains(&self, r: HeapRef) -> bool {
        self.get(r).is_some()
    }

    /// Reclaim a slot, returning its payload. The slot's generation is
    /// bumped so outstanding handles go stale instead of aliasing.
    pub fn free(&mut self, r: HeapRef) -> Option<HeapObject> {
        let slot = self.slots.get_mut(r.index as usize)?;
        if slot.generation != r.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(r.index);
        Some(object)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all live objects with their handles. Used by the
    /// instance cache to rebuild its slots after a snapshot load or reset.
    pub fn iter(&self) -> impl Iterator<Item = (HeapRef, &HeapObject)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.object.as_ref().map(|o| {
                (
                    HeapRef {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    o,
                )
            })
        })
    }

    /// Convenience: allocate a string.
    pub fn alloc_str(&mut self, s: impl Into<String>) -> Value {
        Value::Ref(self.alloc(HeapObject::Str(s.into())))
    }

    /// Convenience: allocate an array.
    pub fn alloc_array(&mut self, items: Vec<Value>) -> Value {
        Value::Ref(self.alloc(HeapObject::Array(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_get_free() {
        let mut heap = Heap::new();
        let r = heap.alloc(HeapObject::Str("x".into()));
        assert!(heap.contains(r));
        assert_eq!(heap.len(), 1);
        assert!(matches!(heap.free(r), Some(HeapObject::Str(_))));
        assert!(!heap.contains(r));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut heap = Heap::new();
        let old = heap.alloc(HeapObject::Str("old".into()));
        heap.free(old);
        let new = heap.alloc(HeapObject::Str("new".into()));
        // Slot is recycled but the old handle must not see the new object.
        assert_eq!(heap.len(), 1);
        assert!(heap.get(old).is_none());
        assert!(heap.get(new).is_some());
        assert_ne!(old, new);
    }

    #[test]
    fn test_double_free_is_noop() {
        let mut heap = Heap::new();
        let r = heap.alloc(HeapObject::Root);
        assert!(heap.free(r).is_some());
        assert!(heap.free(r).is_none());
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_iter_live() {
        let mut heap = Heap::new();
        let a = heap.alloc(HeapObject::Str("a".into()));
        let b = heap.alloc(HeapObject::Str("b".into()));
        heap.free(a);
        let live: Vec<_> = heap.iter().map(|(r, _)| r).collect();
        assert_eq!(live, vec![b]);
    }
}
