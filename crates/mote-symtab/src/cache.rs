//! Instance cache for materialized symbol-table objects
//!
//! A symbol table materializes into at most one live heap object at a time;
//! the cache maps table index to that object's handle so repeated
//! resolutions of `Math`, a prototype, or a library hand back the same
//! instance. The cache is owned by the embedder and threaded into the
//! resolution calls — there is no process-global state, so independent
//! runtimes (or tests) never share instances.
//!
//! When the interpreter reclaims a materialized object it must call
//! [`InstanceCache::invalidate`] so the slot is cleared; the next
//! resolution then materializes a fresh instance.

use crate::build::SymbolTableSet;
use mote_sdk::{Heap, HeapObject, HeapRef, TableIndex, Value};

/// Per-runtime cache of materialized native objects, one slot per table.
#[derive(Debug, Default)]
pub struct InstanceCache {
    slots: Vec<Option<HeapRef>>,
}

impl InstanceCache {
    /// A cache with `count` slots.
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    /// A cache sized for `tables`.
    pub fn for_tables(tables: &SymbolTableSet) -> Self {
        Self::new(tables.table_count())
    }

    /// The single live instance of the table at `index`, allocating it on
    /// first use. The returned object carries the table back-reference so
    /// identity resolution on it is O(1).
    pub fn materialize(&mut self, heap: &mut Heap, index: TableIndex) -> Value {
        let slot = index.as_usize();
        debug_assert!(slot < self.slots.len(), "cache not sized for table set");

        if let Some(r) = self.slots.get(slot).copied().flatten() {
            match heap.get(r) {
                Some(HeapObject::NativeObject { table }) if *table == index => {
                    return Value::Ref(r);
                }
                _ => {
                    // The object was reclaimed without an invalidate call.
                    debug_assert!(false, "stale instance-cache slot for table {}", index.0);
                    self.slots[slot] = None;
                }
            }
        }

        let r = heap.alloc(HeapObject::NativeObject { table: index });
        if slot < self.slots.len() {
            self.slots[slot] = Some(r);
        }
        Value::Ref(r)
    }

    /// The cached handle for `index`, if one is recorded.
    pub fn cached(&self, index: TableIndex) -> Option<HeapRef> {
        self.slots.get(index.as_usize()).copied().flatten()
    }

    /// Drop the cache entry for a reclaimed native object. Must be called
    /// when the interpreter frees a materialized instance; a no-op for
    /// values the cache doesn't know.
    pub fn invalidate(&mut self, heap: &Heap, v: Value) {
        let Value::Ref(r) = v else { return };
        if let Some(HeapObject::NativeObject { table }) = heap.get(r) {
            let slot = table.as_usize();
            if self.slots.get(slot).copied().flatten() == Some(r) {
                self.slots[slot] = None;
            }
            return;
        }
        // Already freed: clear any slot still naming this handle.
        for slot in self.slots.iter_mut() {
            if *slot == Some(r) {
                *slot = None;
            }
        }
    }

    /// Forget every cached instance (the objects themselves belong to the
    /// heap). Used at teardown.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// Re-adopt materialized instances already present on the heap, e.g.
    /// after loading a saved image. First live instance per table wins.
    pub fn rehydrate(&mut self, heap: &Heap) {
        self.reset();
        for (r, object) in heap.iter() {
            if let HeapObject::NativeObject { table } = object {
                let slot = table.as_usize();
                if let Some(entry) = self.slots.get_mut(slot) {
                    if entry.is_none() {
                        *entry = Some(r);
                    }
                }
            }
        }
    }
}
