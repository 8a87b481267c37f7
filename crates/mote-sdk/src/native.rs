//! Native-call ABI types
//!
//! The dispatch core calls every native implementation through one uniform
//! function shape, [`NativeFn`]. Arguments arrive pre-unboxed as a slice of
//! [`NativeArg`] variants and the return travels back as a [`NativeReturn`]
//! variant; the generic marshaller in the dispatch core is the only place
//! that converts between script values and these tags. The kind set is
//! closed — there is deliberately no way to extend it at run time.

use crate::heap::Heap;
use crate::value::{Pin, Value};

/// Index of a symbol table (namespace) within a built table set.
///
/// Assigned once at build time, stable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableIndex(pub u16);

impl TableIndex {
    /// The index as a usize, for table array access.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Token identifying one native constructor.
///
/// Assigned per constructor at table-build time and recorded on the
/// instances it builds; the identity resolver compares tokens by equality.
/// This replaces comparing raw function pointers, which the compiler is
/// free to alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorId(pub u32);

/// The closed set of native argument / return kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// An opaque script value, passed through unconverted.
    Var,
    /// Boolean, unboxed via truthiness.
    Bool,
    /// Hardware pin.
    Pin,
    /// 32-bit integer.
    Int32,
    /// 64-bit float.
    Float,
    /// All remaining positional arguments, collected into a fresh array.
    /// The escape hatch for calls with more than four parameters.
    VarArray,
}

/// Error for an argument-kind name the catalogue front-end does not know.
///
/// This is an author-time (build) error: the kind enumeration is closed and
/// an unknown name in a declaration is fatal, never a runtime condition.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown argument kind `{name}`")]
pub struct UnknownArgKind {
    /// The unrecognized kind name.
    pub name: String,
}

impl std::str::FromStr for ArgKind {
    type Err = UnknownArgKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JsVar" => Ok(ArgKind::Var),
            "JsVarArray" => Ok(ArgKind::VarArray),
            "bool" => Ok(ArgKind::Bool),
            "pin" => Ok(ArgKind::Pin),
            "int" | "int32" => Ok(ArgKind::Int32),
            "float" => Ok(ArgKind::Float),
            _ => Err(UnknownArgKind { name: s.to_string() }),
        }
    }
}

/// One pre-unboxed argument, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum NativeArg {
    /// Opaque value.
    Var(Value),
    /// Unboxed boolean.
    Bool(bool),
    /// Unboxed pin.
    Pin(Pin),
    /// Unboxed 32-bit integer.
    Int32(i32),
    /// Unboxed float.
    Float(f64),
    /// Array value collecting the remaining arguments.
    VarArray(Value),
}

impl NativeArg {
    /// The opaque value, for `Var` and `VarArray` slots.
    pub fn value(&self) -> Value {
        match self {
            NativeArg::Var(v) | NativeArg::VarArray(v) => *v,
            NativeArg::Bool(b) => Value::Bool(*b),
            NativeArg::Pin(p) => Value::Pin(*p),
            NativeArg::Int32(i) => Value::Int(*i as i64),
            NativeArg::Float(f) => Value::Float(*f),
        }
    }

    /// The unboxed i32, when the slot was declared `Int32`.
    pub fn int32(&self) -> i32 {
        match self {
            NativeArg::Int32(i) => *i,
            _ => 0,
        }
    }

    /// The unboxed float, when the slot was declared `Float`.
    pub fn float(&self) -> f64 {
        match self {
            NativeArg::Float(f) => *f,
            _ => 0.0,
        }
    }

    /// The unboxed boolean, when the slot was declared `Bool`.
    pub fn boolean(&self) -> bool {
        match self {
            NativeArg::Bool(b) => *b,
            _ => false,
        }
    }

    /// The unboxed pin, when the slot was declared `Pin`.
    pub fn pin(&self) -> Pin {
        match self {
            NativeArg::Pin(p) => *p,
            _ => Pin::UNDEFINED,
        }
    }
}

/// Return channel of a native call, tagged with its kind.
///
/// The marshaller re-boxes this per the signature's declared return code;
/// `Void` becomes the undefined value.
#[derive(Debug, Clone, Copy)]
pub enum NativeReturn {
    /// No return value.
    Void,
    /// Opaque value.
    Var(Value),
    /// Boolean, boxed by the marshaller.
    Bool(bool),
    /// Pin, boxed by the marshaller.
    Pin(Pin),
    /// 32-bit integer, boxed by the marshaller.
    Int32(i32),
    /// Float, boxed by the marshaller.
    Float(f64),
}

impl From<Value> for NativeReturn {
    fn from(v: Value) -> Self {
        NativeReturn::Var(v)
    }
}

impl From<bool> for NativeReturn {
    fn from(b: bool) -> Self {
        NativeReturn::Bool(b)
    }
}

impl From<i32> for NativeReturn {
    fn from(i: i32) -> Self {
        NativeReturn::Int32(i)
    }
}

impl From<f64> for NativeReturn {
    fn from(f: f64) -> Self {
        NativeReturn::Float(f)
    }
}

/// The single implementation shape every native binding compiles to.
///
/// `this` is present exactly when the packed signature says the call is
/// this-bound. The arg slice layout is dictated by the signature; a binding
/// may pattern-match its declared kinds without re-checking.
pub type NativeFn = fn(&mut Heap, Option<Value>, &[NativeArg]) -> NativeReturn;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_arg_kind_names() {
        assert_eq!(ArgKind::from_str("JsVar").unwrap(), ArgKind::Var);
        assert_eq!(ArgKind::from_str("JsVarArray").unwrap(), ArgKind::VarArray);
        assert_eq!(ArgKind::from_str("bool").unwrap(), ArgKind::Bool);
        assert_eq!(ArgKind::from_str("pin").unwrap(), ArgKind::Pin);
        assert_eq!(ArgKind::from_str("int").unwrap(), ArgKind::Int32);
        assert_eq!(ArgKind::from_str("int32").unwrap(), ArgKind::Int32);
        assert_eq!(ArgKind::from_str("float").unwrap(), ArgKind::Float);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let err = ArgKind::from_str("quaternion").unwrap_err();
        assert_eq!(err.name, "quaternion");
        assert!(err.to_string().contains("quaternion"));
    }

    #[test]
    fn test_native_arg_accessors() {
        assert_eq!(NativeArg::Int32(7).int32(), 7);
        assert_eq!(NativeArg::Float(1.5).float(), 1.5);
        assert!(NativeArg::Bool(true).boolean());
        assert_eq!(NativeArg::Pin(Pin(4)).pin(), Pin(4));
        assert_eq!(NativeArg::Int32(7).value(), Value::Int(7));
    }
}
