//! Native-call dispatch and symbol-resolution core for the Mote runtime.
//!
//! The embedder supplies a [`Catalogue`] of native bindings (usually
//! filtered through a [`Blacklist`]); [`SymbolTableSet::build`] turns it
//! into immutable, sorted per-namespace symbol tables with every call
//! signature packed into a `u32`. At run time the evaluator asks the set to
//! [`resolve`](SymbolTableSet::resolve) names, to identify which namespace
//! answers for a value, and to materialize module / prototype objects
//! through a per-runtime [`InstanceCache`].
//!
//! ```ignore
//! let catalogue = blacklist.apply(&catalogue);
//! let tables = SymbolTableSet::build(&catalogue)?;
//! let mut cache = InstanceCache::for_tables(&tables);
//! let abs = tables.find_builtin(&mut heap, &mut cache, math_obj, "abs");
//! ```

#![warn(missing_docs)]

pub mod blacklist;
pub mod build;
pub mod cache;
pub mod catalogue;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod signature;

pub use blacklist::{Blacklist, BlacklistRule};
pub use build::{
    ResolvedImpl, SymbolRecord, SymbolTable, SymbolTableSet, TableConstructor, ROOT_TABLE,
};
pub use cache::InstanceCache;
pub use catalogue::{Catalogue, CatalogueEntry, EntryKind, Impl, Param};
pub use dispatch::{call_bound, call_native};
pub use error::BuildError;
pub use identity::BuiltinCheck;
pub use signature::{PackedSignature, MAX_PARAMS};

// Host-side ABI types, re-exported so embedders need only one import path.
pub use mote_sdk::{
    ArgKind, BufferKind, ConstructorId, Heap, HeapObject, HeapRef, NativeArg, NativeFn,
    NativeReturn, Pin, TableIndex, UnknownArgKind, Value,
};
