//! Runtime lifecycle hooks
//!
//! Catalogue entries can register init, kill, and idle hooks; the embedder
//! drives them through the table set at the matching points of its own
//! lifecycle. Hooks run in declaration order. The idle poll reports whether
//! any hook did work, so the embedder knows not to sleep yet.

use crate::build::SymbolTableSet;
use crate::cache::InstanceCache;
use mote_sdk::{Heap, NativeReturn};

impl SymbolTableSet {
    /// Run the init hooks. Called once when the runtime starts; also
    /// re-adopts any materialized instances already on the heap (a loaded
    /// image) into the cache first, so hooks observe a consistent cache.
    pub fn run_init(&self, heap: &mut Heap, cache: &mut InstanceCache) {
        cache.rehydrate(heap);
        for hook in &self.init_hooks {
            hook(heap, None, &[]);
        }
    }

    /// Run the kill hooks and drop all cached instances. Called once at
    /// teardown, before the heap is torn down.
    pub fn run_kill(&self, heap: &mut Heap, cache: &mut InstanceCache) {
        for hook in &self.kill_hooks {
            hook(heap, None, &[]);
        }
        cache.reset();
    }

    /// Poll every idle hook. True if any hook reported it did work and the
    /// embedder should poll again before sleeping.
    pub fn run_idle(&self, heap: &mut Heap) -> bool {
        let mut busy = false;
        for hook in &self.idle_hooks {
            if matches!(hook(heap, None, &[]), NativeReturn::Bool(true)) {
                busy = true;
            }
        }
        busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Catalogue, CatalogueEntry};
    use mote_sdk::{NativeArg, Value};

    fn marker(heap: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        heap.alloc_str("init ran");
        NativeReturn::Void
    }

    fn busy_hook(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        NativeReturn::Bool(true)
    }

    fn lazy_hook(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        NativeReturn::Bool(false)
    }

    #[test]
    fn test_init_hooks_run() {
        let catalogue: Catalogue = [CatalogueEntry::init_hook(marker)].into_iter().collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let mut heap = Heap::new();
        let mut cache = InstanceCache::for_tables(&set);
        set.run_init(&mut heap, &mut cache);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_kill_resets_cache() {
        let catalogue: Catalogue = [CatalogueEntry::object("Math").member_of("global")]
            .into_iter()
            .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let mut heap = Heap::new();
        let mut cache = InstanceCache::for_tables(&set);
        let math = set.index_of("Math").unwrap();
        cache.materialize(&mut heap, math);
        assert!(cache.cached(math).is_some());
        set.run_kill(&mut heap, &mut cache);
        assert!(cache.cached(math).is_none());
    }

    #[test]
    fn test_idle_reports_busy() {
        let busy: Catalogue = [
            CatalogueEntry::idle_hook(lazy_hook),
            CatalogueEntry::idle_hook(busy_hook),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&busy).unwrap();
        let mut heap = Heap::new();
        assert!(set.run_idle(&mut heap));

        let quiet: Catalogue = [CatalogueEntry::idle_hook(lazy_hook)].into_iter().collect();
        let set = SymbolTableSet::build(&quiet).unwrap();
        assert!(!set.run_idle(&mut heap));
    }
}
