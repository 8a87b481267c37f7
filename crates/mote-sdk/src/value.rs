//! Runtime value representation
//!
//! Scalars are stored inline; everything heap-resident is reached through a
//! [`HeapRef`] handle. All predicates and coercions take the owning [`Heap`]
//! so a `Value` stays `Copy` and never borrows the arena.
//!
//! Coercions are total: like the host interpreter's `jsvGetBool`-style
//! primitives they never fail, they coerce.

use crate::heap::{BufferKind, Heap, HeapObject, HeapRef};
use crate::native::TableIndex;

/// A hardware pin identifier.
///
/// Pins are a first-class argument kind on the target platform; the core
/// only moves them around and compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(pub u8);

impl Pin {
    /// The "no such pin" sentinel.
    pub const UNDEFINED: Pin = Pin(0xFF);

    /// True unless this is the undefined-pin sentinel.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Pin::UNDEFINED
    }
}

/// Compact runtime value.
///
/// `Int` and `Float` are distinct kinds (the identity resolver dispatches
/// them to different namespaces); `Ref` points into the [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Absent / undefined.
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Integer numeric.
    Int(i64),
    /// Floating-point numeric.
    Float(f64),
    /// Hardware pin.
    Pin(Pin),
    /// Handle to a heap object.
    Ref(HeapRef),
}

impl Value {
    /// Create a boolean value.
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an integer value.
    #[inline]
    pub const fn int(i: i64) -> Self {
        Value::Int(i)
    }

    /// Create a float value.
    #[inline]
    pub const fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a pin value.
    #[inline]
    pub const fn pin(p: Pin) -> Self {
        Value::Pin(p)
    }

    // ========================================================================
    // Type predicates
    // ========================================================================

    /// Check if this is the undefined value.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this is an integer numeric.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if this is a floating-point numeric.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this is any numeric (integer or float).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.is_int() || self.is_float()
    }

    /// Check if this is a pin.
    #[inline]
    pub fn is_pin(&self) -> bool {
        matches!(self, Value::Pin(_))
    }

    /// Check if this is the root (global) object.
    pub fn is_root(&self, heap: &Heap) -> bool {
        matches!(self.object(heap), Some(HeapObject::Root))
    }

    /// Check if this is a string.
    pub fn is_string(&self, heap: &Heap) -> bool {
        matches!(self.object(heap), Some(HeapObject::Str(_)))
    }

    /// Check if this is an array.
    pub fn is_array(&self, heap: &Heap) -> bool {
        matches!(self.object(heap), Some(HeapObject::Array(_)))
    }

    /// Check if this is a plain array buffer (not a typed view onto one).
    pub fn is_array_buffer(&self, heap: &Heap) -> bool {
        matches!(
            self.object(heap),
            Some(HeapObject::Buffer {
                kind: BufferKind::Buffer,
                ..
            })
        )
    }

    /// Check if this is a typed view onto an array buffer.
    pub fn is_array_buffer_view(&self, heap: &Heap) -> bool {
        matches!(
            self.object(heap),
            Some(HeapObject::Buffer {
                kind: BufferKind::View,
                ..
            })
        )
    }

    /// Check if this is callable (script function or bound native function).
    pub fn is_function(&self, heap: &Heap) -> bool {
        matches!(
            self.object(heap),
            Some(HeapObject::Function { .. } | HeapObject::NativeFunction { .. })
        )
    }

    /// Check if this is an object-like heap value.
    pub fn is_object(&self, heap: &Heap) -> bool {
        matches!(
            self.object(heap),
            Some(HeapObject::Object { .. } | HeapObject::NativeObject { .. } | HeapObject::Root)
        )
    }

    /// Check if this is a materialized native (symbol-table backed) object.
    pub fn is_native_object(&self, heap: &Heap) -> bool {
        self.native_table(heap).is_some()
    }

    /// The symbol-table back-reference carried by a materialized native
    /// object, if this value is one.
    pub fn native_table(&self, heap: &Heap) -> Option<TableIndex> {
        match self.object(heap) {
            Some(HeapObject::NativeObject { table }) => Some(*table),
            _ => None,
        }
    }

    /// The constructor token recorded on this value at construction time,
    /// if any. Used for user-class identity resolution.
    pub fn constructor(&self, heap: &Heap) -> Option<crate::native::ConstructorId> {
        match self.object(heap) {
            Some(HeapObject::Object { constructor, .. })
            | Some(HeapObject::Function { constructor }) => *constructor,
            _ => None,
        }
    }

    /// The heap object behind this value, if it is a live reference.
    #[inline]
    pub fn object<'h>(&self, heap: &'h Heap) -> Option<&'h HeapObject> {
        match self {
            Value::Ref(r) => heap.get(*r),
            _ => None,
        }
    }

    // ========================================================================
    // Unboxing coercions
    // ========================================================================

    /// Coerce to a boolean (truthiness).
    pub fn as_bool(&self, heap: &Heap) -> bool {
        match self {
            Value::Undefined => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Pin(p) => p.is_valid(),
            Value::Ref(r) => match heap.get(*r) {
                Some(HeapObject::Str(s)) => !s.is_empty(),
                Some(_) => true,
                None => false,
            },
        }
    }

    /// Coerce to a 64-bit integer.
    pub fn as_i64(&self, heap: &Heap) -> i64 {
        match self {
            Value::Undefined => 0,
            Value::Bool(b) => *b as i64,
            Value::Int(i) => *i,
            Value::Float(f) => *f as i64,
            Value::Pin(p) => p.0 as i64,
            Value::Ref(r) => match heap.get(*r) {
                Some(HeapObject::Str(s)) => s.trim().parse().unwrap_or(0),
                _ => 0,
            },
        }
    }

    /// Coerce to a 32-bit integer (wrapping, like the native call ABI).
    pub fn as_i32(&self, heap: &Heap) -> i32 {
        self.as_i64(heap) as i32
    }

    /// Coerce to a 64-bit float.
    pub fn as_f64(&self, heap: &Heap) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Bool(b) => *b as i64 as f64,
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Pin(p) => p.0 as f64,
            Value::Ref(r) => match heap.get(*r) {
                Some(HeapObject::Str(s)) => s.trim().parse().unwrap_or(f64::NAN),
                _ => f64::NAN,
            },
        }
    }

    /// Coerce to a pin. Values outside the pin range map to
    /// [`Pin::UNDEFINED`].
    pub fn as_pin(&self, heap: &Heap) -> Pin {
        match self {
            Value::Pin(p) => *p,
            Value::Int(i) if (0..=0xFE).contains(i) => Pin(*i as u8),
            Value::Ref(_) => {
                let i = self.as_i64(heap);
                if (0..=0xFE).contains(&i) {
                    Pin(i as u8)
                } else {
                    Pin::UNDEFINED
                }
            }
            _ => Pin::UNDEFINED,
        }
    }
}
