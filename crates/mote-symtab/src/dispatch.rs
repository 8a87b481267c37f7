//! Symbol resolution and the generic native-call marshaller
//!
//! [`SymbolTableSet::resolve`] is the hot path: binary-search one table,
//! then act on the record's calling mode — materialize a referenced table,
//! invoke the implementation immediately (variables, properties, object
//! factories), or hand back a bound native function for the evaluator to
//! call later.
//!
//! [`call_native`] is the one marshaller every native call funnels through.
//! It unboxes script arguments per the packed signature's declared kinds,
//! collects a trailing `VarArray` into a fresh array, threads `this` only
//! for this-bound signatures, and re-boxes the tagged return. There is no
//! per-function glue anywhere.

use crate::build::{ResolvedImpl, SymbolTableSet};
use crate::cache::InstanceCache;
use crate::signature::{PackedSignature, MAX_PARAMS};
use mote_sdk::{ArgKind, Heap, HeapObject, NativeArg, NativeFn, NativeReturn, TableIndex, Value};

impl SymbolTableSet {
    /// Resolve `name` in the table at `index`.
    ///
    /// `None` means the table exists but has no such symbol (or `index` is
    /// out of range) — an ordinary miss, for the caller to fall through to
    /// script-level properties or the prototype chain.
    pub fn resolve(
        &self,
        heap: &mut Heap,
        cache: &mut InstanceCache,
        index: TableIndex,
        this: Option<Value>,
        name: &str,
    ) -> Option<Value> {
        let table = self.table(index)?;
        let record = table.lookup(name)?;
        let signature = record.signature;
        match record.imp {
            ResolvedImpl::Table(target) => Some(cache.materialize(heap, target)),
            ResolvedImpl::Native(imp) => {
                if signature.execute_immediately() {
                    Some(call_native(heap, imp, signature, this, &[]))
                } else {
                    let r = heap.alloc(HeapObject::NativeFunction {
                        imp,
                        sig: signature.bits(),
                    });
                    Some(Value::Ref(r))
                }
            }
        }
    }
}

/// Invoke a native implementation with script-level arguments.
///
/// Missing arguments read as undefined and coerce per their declared kind;
/// excess arguments are dropped unless a `VarArray` slot collects them.
pub fn call_native(
    heap: &mut Heap,
    imp: NativeFn,
    signature: PackedSignature,
    this: Option<Value>,
    args: &[Value],
) -> Value {
    let mut unboxed: Vec<NativeArg> = Vec::with_capacity(signature.param_count());
    for slot in 0..MAX_PARAMS {
        let Some(kind) = signature.param_kind(slot) else {
            break;
        };
        if kind == ArgKind::VarArray {
            let rest = args.get(slot..).unwrap_or(&[]).to_vec();
            unboxed.push(NativeArg::VarArray(heap.alloc_array(rest)));
            break;
        }
        let v = args.get(slot).copied().unwrap_or(Value::Undefined);
        unboxed.push(match kind {
            ArgKind::Var => NativeArg::Var(v),
            ArgKind::Bool => NativeArg::Bool(v.as_bool(heap)),
            ArgKind::Pin => NativeArg::Pin(v.as_pin(heap)),
            ArgKind::Int32 => NativeArg::Int32(v.as_i32(heap)),
            ArgKind::Float => NativeArg::Float(v.as_f64(heap)),
            ArgKind::VarArray => unreachable!("handled above"),
        });
    }

    let this = if signature.has_this() { this } else { None };
    let ret = imp(heap, this, &unboxed);
    box_return(signature, ret)
}

/// Call a bound native function produced by an earlier resolution.
///
/// `None` if `callee` is not a live native function.
pub fn call_bound(
    heap: &mut Heap,
    callee: Value,
    this: Option<Value>,
    args: &[Value],
) -> Option<Value> {
    let Value::Ref(r) = callee else { return None };
    let (imp, signature) = match heap.get(r) {
        Some(HeapObject::NativeFunction { imp, sig }) => (*imp, PackedSignature::from_bits(*sig)),
        _ => return None,
    };
    Some(call_native(heap, imp, signature, this, args))
}

/// Re-box a tagged return per the declared return kind. A mismatch between
/// the two is a binding bug; release builds degrade it to undefined.
fn box_return(signature: PackedSignature, ret: NativeReturn) -> Value {
    match (signature.return_kind(), ret) {
        (None, NativeReturn::Void) => Value::Undefined,
        (Some(ArgKind::Var), NativeReturn::Var(v)) => v,
        (Some(ArgKind::Bool), NativeReturn::Bool(b)) => Value::bool(b),
        (Some(ArgKind::Pin), NativeReturn::Pin(p)) => Value::pin(p),
        (Some(ArgKind::Int32), NativeReturn::Int32(i)) => Value::int(i as i64),
        (Some(ArgKind::Float), NativeReturn::Float(f)) => Value::float(f),
        _ => {
            debug_assert!(false, "native return does not match declared signature");
            Value::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CatalogueEntry;

    fn add(heap: &mut Heap, _this: Option<Value>, args: &[NativeArg]) -> NativeReturn {
        let _ = heap;
        NativeReturn::Int32(args[0].int32() + args[1].int32())
    }

    fn sig_of(entry: &CatalogueEntry) -> PackedSignature {
        PackedSignature::encode(entry).unwrap()
    }

    #[test]
    fn test_unbox_and_rebox() {
        let mut heap = Heap::new();
        let sig = sig_of(
            &CatalogueEntry::function("add")
                .param("a", ArgKind::Int32)
                .param("b", ArgKind::Int32)
                .returns(ArgKind::Int32)
                .native(add),
        );
        let out = call_native(&mut heap, add, sig, None, &[Value::int(2), Value::int(40)]);
        assert_eq!(out, Value::int(42));
    }

    #[test]
    fn test_missing_args_coerce_from_undefined() {
        let mut heap = Heap::new();
        let sig = sig_of(
            &CatalogueEntry::function("add")
                .param("a", ArgKind::Int32)
                .param("b", ArgKind::Int32)
                .returns(ArgKind::Int32)
                .native(add),
        );
        // Undefined coerces to 0 for an Int32 slot.
        let out = call_native(&mut heap, add, sig, None, &[Value::int(5)]);
        assert_eq!(out, Value::int(5));
    }

    #[test]
    fn test_excess_args_dropped() {
        let mut heap = Heap::new();
        fn count(_: &mut Heap, _: Option<Value>, args: &[NativeArg]) -> NativeReturn {
            NativeReturn::Int32(args.len() as i32)
        }
        let sig = sig_of(
            &CatalogueEntry::function("count")
                .param("a", ArgKind::Var)
                .returns(ArgKind::Int32)
                .native(count),
        );
        let out = call_native(
            &mut heap,
            count,
            sig,
            None,
            &[Value::int(1), Value::int(2), Value::int(3)],
        );
        assert_eq!(out, Value::int(1));
    }

    #[test]
    fn test_var_array_collects_tail() {
        let mut heap = Heap::new();
        fn tail_len(heap: &mut Heap, _: Option<Value>, args: &[NativeArg]) -> NativeReturn {
            let arr = args[1].value();
            match arr.object(heap) {
                Some(HeapObject::Array(items)) => NativeReturn::Int32(items.len() as i32),
                _ => NativeReturn::Int32(-1),
            }
        }
        let sig = sig_of(
            &CatalogueEntry::function("tail_len")
                .param("first", ArgKind::Var)
                .param("rest", ArgKind::VarArray)
                .returns(ArgKind::Int32)
                .native(tail_len),
        );
        let out = call_native(
            &mut heap,
            tail_len,
            sig,
            None,
            &[Value::int(0), Value::int(1), Value::int(2), Value::int(3)],
        );
        assert_eq!(out, Value::int(3));
    }

    #[test]
    fn test_var_array_with_no_tail_is_empty_array() {
        let mut heap = Heap::new();
        fn tail_len(heap: &mut Heap, _: Option<Value>, args: &[NativeArg]) -> NativeReturn {
            match args[0].value().object(heap) {
                Some(HeapObject::Array(items)) => NativeReturn::Int32(items.len() as i32),
                _ => NativeReturn::Int32(-1),
            }
        }
        let sig = sig_of(
            &CatalogueEntry::function("tail_len")
                .param("rest", ArgKind::VarArray)
                .returns(ArgKind::Int32)
                .native(tail_len),
        );
        let out = call_native(&mut heap, tail_len, sig, None, &[]);
        assert_eq!(out, Value::int(0));
    }

    #[test]
    fn test_this_only_reaches_bound_signatures() {
        let mut heap = Heap::new();
        fn saw_this(_: &mut Heap, this: Option<Value>, _: &[NativeArg]) -> NativeReturn {
            NativeReturn::Bool(this.is_some())
        }
        let receiver = heap.alloc_str("receiver");

        let unbound = sig_of(&CatalogueEntry::function("f").returns(ArgKind::Bool).native(saw_this));
        assert_eq!(
            call_native(&mut heap, saw_this, unbound, Some(receiver), &[]),
            Value::bool(false)
        );

        let bound = sig_of(&CatalogueEntry::method("m").returns(ArgKind::Bool).native(saw_this));
        assert_eq!(
            call_native(&mut heap, saw_this, bound, Some(receiver), &[]),
            Value::bool(true)
        );
    }

    #[test]
    fn test_void_return_is_undefined() {
        let mut heap = Heap::new();
        fn noop(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
            NativeReturn::Void
        }
        let sig = sig_of(&CatalogueEntry::function("noop").native(noop));
        assert_eq!(call_native(&mut heap, noop, sig, None, &[]), Value::Undefined);
    }

    #[test]
    fn test_call_bound_round_trip() {
        let mut heap = Heap::new();
        let sig = sig_of(
            &CatalogueEntry::function("add")
                .param("a", ArgKind::Int32)
                .param("b", ArgKind::Int32)
                .returns(ArgKind::Int32)
                .native(add),
        );
        let f = Value::Ref(heap.alloc(HeapObject::NativeFunction {
            imp: add,
            sig: sig.bits(),
        }));
        let out = call_bound(&mut heap, f, None, &[Value::int(20), Value::int(22)]);
        assert_eq!(out, Some(Value::int(42)));
        // Not callable: miss, not a panic.
        assert_eq!(call_bound(&mut heap, Value::int(1), None, &[]), None);
    }
}
