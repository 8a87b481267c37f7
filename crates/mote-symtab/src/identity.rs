//! Value-identity resolution
//!
//! Given an arbitrary runtime value, decide which symbol table answers for
//! it. Built-in types are recognized by [`BuiltinCheck`] predicates walked
//! in a fixed precedence order (specific before general, the plain-object
//! fallback last); instances of user-defined native classes are recognized
//! by the [`ConstructorId`] token stamped on them at construction time.
//! Materialized native objects short-circuit everything: they carry their
//! table index directly.

use crate::build::SymbolTableSet;
use crate::cache::InstanceCache;
use mote_sdk::{Heap, TableIndex, Value};

/// Run-time type predicate a class declares to claim instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCheck {
    /// The root (global) object.
    Root,
    /// Strings.
    String,
    /// Integer numerics.
    Integer,
    /// Floating-point numerics.
    Double,
    /// Any numeric, integer or float.
    Numeric,
    /// Hardware pins.
    Pin,
    /// Arrays.
    Array,
    /// Plain array buffers.
    ArrayBuffer,
    /// Typed views onto array buffers.
    ArrayBufferView,
    /// Callables.
    Function,
    /// Plain objects. The fallback; always checked last.
    Object,
}

impl BuiltinCheck {
    /// Evaluation order for the identity walk. `Root` is handled explicitly
    /// by the resolver and never appears in a check list; `Object` is last
    /// so every more specific claim wins first.
    pub const PRECEDENCE: &'static [BuiltinCheck] = &[
        BuiltinCheck::String,
        BuiltinCheck::Integer,
        BuiltinCheck::Double,
        BuiltinCheck::Numeric,
        BuiltinCheck::Pin,
        BuiltinCheck::Array,
        BuiltinCheck::ArrayBuffer,
        BuiltinCheck::ArrayBufferView,
        BuiltinCheck::Function,
        BuiltinCheck::Object,
    ];

    /// Whether `v` satisfies this predicate.
    pub fn matches(self, heap: &Heap, v: Value) -> bool {
        match self {
            BuiltinCheck::Root => v.is_root(heap),
            BuiltinCheck::String => v.is_string(heap),
            BuiltinCheck::Integer => v.is_int(),
            BuiltinCheck::Double => v.is_float(),
            BuiltinCheck::Numeric => v.is_numeric(),
            BuiltinCheck::Pin => v.is_pin(),
            BuiltinCheck::Array => v.is_array(heap),
            BuiltinCheck::ArrayBuffer => v.is_array_buffer(heap),
            BuiltinCheck::ArrayBufferView => v.is_array_buffer_view(heap),
            BuiltinCheck::Function => v.is_function(heap),
            BuiltinCheck::Object => v.is_object(heap),
        }
    }
}

impl SymbolTableSet {
    /// The table that answers member lookups on `v` directly, if any.
    ///
    /// Precedence: native-object back-reference, the root, built-in checks
    /// in declaration-independent [`BuiltinCheck::PRECEDENCE`] order, and
    /// constructor-token identity only when every predicate missed. A
    /// catalogue that declares the plain-object fallback check therefore
    /// shadows user constructors.
    pub fn symbol_index_for(&self, heap: &Heap, v: Value) -> Option<TableIndex> {
        if let Some(table) = v.native_table(heap) {
            return Some(table);
        }
        if v.is_root(heap) {
            return Some(self.global());
        }
        for (check, index) in &self.checks {
            if check.matches(heap, v) {
                return Some(*index);
            }
        }
        self.constructor_table_for(heap, v)
    }

    /// The prototype table consulted after `v`'s own table misses, if any.
    pub fn prototype_symbol_index_for(&self, heap: &Heap, v: Value) -> Option<TableIndex> {
        for (check, index) in &self.proto_checks {
            if check.matches(heap, v) {
                return Some(*index);
            }
        }
        None
    }

    fn constructor_table_for(&self, heap: &Heap, v: Value) -> Option<TableIndex> {
        let id = v.constructor(heap)?;
        self.constructors
            .iter()
            .find(|(c, _)| *c == id)
            .map(|(_, t)| *t)
    }

    /// Look `name` up on `parent`'s own table.
    ///
    /// Lookups on the root are unbound (no `this`); everything else binds
    /// `parent` as the receiver.
    pub fn find_builtin(
        &self,
        heap: &mut Heap,
        cache: &mut InstanceCache,
        parent: Value,
        name: &str,
    ) -> Option<Value> {
        let index = self.symbol_index_for(heap, parent)?;
        let this = if index == self.global() {
            None
        } else {
            Some(parent)
        };
        self.resolve(heap, cache, index, this, name)
    }

    /// Look `name` up on `parent`'s built-in prototype, after its own table
    /// missed. `__proto__` resolves to the prototype object itself.
    pub fn find_in_prototype(
        &self,
        heap: &mut Heap,
        cache: &mut InstanceCache,
        parent: Value,
        name: &str,
    ) -> Option<Value> {
        let proto = self.prototype_symbol_index_for(heap, parent)?;
        if name == "__proto__" {
            return Some(cache.materialize(heap, proto));
        }
        self.resolve(heap, cache, proto, Some(parent), name)
    }

    /// Materialize a declared library's namespace object. The module
    /// loader's entry point; repeated requests return the cached instance.
    pub fn library(
        &self,
        heap: &mut Heap,
        cache: &mut InstanceCache,
        name: &str,
    ) -> Option<Value> {
        let index = self.library_index(name)?;
        Some(cache.materialize(heap, index))
    }

    /// The built-in class name describing `v`'s basic shape, if one of the
    /// declared classes claims it. Buffer checks run first so a typed view
    /// never reports as a plain buffer (or vice versa).
    pub fn basic_object_name(&self, heap: &Heap, v: Value) -> Option<&str> {
        self.named_checks
            .iter()
            .find(|(_, check)| check.matches(heap, v))
            .map(|(name, _)| name.as_str())
    }
}
