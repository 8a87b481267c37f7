//! Mote SDK - the host value surface consumed by the symbol-table core
//!
//! This crate provides the minimal types the native dispatch core needs from
//! the surrounding interpreter, without depending on the parser or evaluator:
//!
//! - [`Value`] — compact, copyable runtime value with type predicates and the
//!   boxing/unboxing coercions used by generic argument marshalling
//! - [`Heap`] — slot arena with stable, generation-tagged identities and an
//!   explicit reclamation path
//! - the closed native-call ABI: [`ArgKind`], [`NativeArg`], [`NativeReturn`]
//!   and the uniform [`NativeFn`] implementation shape
//!
//! The kind set is closed by design: this is not a general FFI, and every
//! native binding in the catalogue compiles down to the same `NativeFn`
//! shape so that a single invoker can call all of them.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod heap;
pub mod native;
pub mod value;

pub use heap::{BufferKind, Heap, HeapObject, HeapRef};
pub use native::{
    ArgKind, ConstructorId, NativeArg, NativeFn, NativeReturn, TableIndex, UnknownArgKind,
};
pub use value::{Pin, Value};
