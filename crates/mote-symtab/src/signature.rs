//! Packed call signatures
//!
//! A [`PackedSignature`] is the complete calling convention of one native
//! binding folded into a single `u32`: return kind, up to four parameter
//! kinds, and the calling-mode flags. The generic invoker reads it instead
//! of consulting any per-function metadata — one dispatcher serves every
//! native function, which is the entire reason this encoding exists.
//!
//! # Layout
//!
//! ```text
//! bits  0..4   return type code
//! bits  4..8   parameter 0 type code     (0 = no parameter)
//! bits  8..12  parameter 1 type code
//! bits 12..16  parameter 2 type code
//! bits 16..20  parameter 3 type code
//! bit  20      THIS_ARG             call is this-bound
//! bit  21      EXECUTE_IMMEDIATELY  invoke at lookup time, return the result
//! bit  22      SYMBOL_TABLE         materialize the referenced table instead
//! ```

use crate::catalogue::{CatalogueEntry, EntryKind, Impl};
use crate::error::BuildError;
use mote_sdk::ArgKind;

/// Bits per type-code slot.
const TYPE_BITS: u32 = 4;
/// Mask for one type-code slot.
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;

// Type codes. Zero doubles as "void" for the return slot and "no more
// parameters" for parameter slots.
const CODE_VOID: u32 = 0;
const CODE_VAR: u32 = 1;
const CODE_BOOL: u32 = 2;
const CODE_PIN: u32 = 3;
const CODE_INT32: u32 = 4;
const CODE_FLOAT: u32 = 5;
const CODE_VAR_ARRAY: u32 = 6;

const FLAG_THIS_ARG: u32 = 1 << 20;
const FLAG_EXECUTE_IMMEDIATELY: u32 = 1 << 21;
const FLAG_SYMBOL_TABLE: u32 = 1 << 22;

/// Hard structural limit on positional parameters; beyond this the author
/// must take a `VarArray`.
pub const MAX_PARAMS: usize = 4;

/// Packed call-signature descriptor. Immutable once encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedSignature(u32);

fn kind_code(kind: ArgKind) -> u32 {
    match kind {
        ArgKind::Var => CODE_VAR,
        ArgKind::Bool => CODE_BOOL,
        ArgKind::Pin => CODE_PIN,
        ArgKind::Int32 => CODE_INT32,
        ArgKind::Float => CODE_FLOAT,
        ArgKind::VarArray => CODE_VAR_ARRAY,
    }
}

fn code_kind(code: u32) -> Option<ArgKind> {
    match code {
        CODE_VOID => None,
        CODE_VAR => Some(ArgKind::Var),
        CODE_BOOL => Some(ArgKind::Bool),
        CODE_PIN => Some(ArgKind::Pin),
        CODE_INT32 => Some(ArgKind::Int32),
        CODE_FLOAT => Some(ArgKind::Float),
        CODE_VAR_ARRAY => Some(ArgKind::VarArray),
        // The kind enumeration is closed; other codes cannot be encoded.
        _ => None,
    }
}

impl PackedSignature {
    /// Encode a catalogue entry's calling convention.
    ///
    /// Total over all valid entries; the only failure is a parameter list
    /// that exceeds [`MAX_PARAMS`], reported with the entry's identity.
    pub fn encode(entry: &CatalogueEntry) -> Result<Self, BuildError> {
        // A symbol-table reference doesn't call anything: it names a table
        // to materialize. Declared parameters are ignored.
        if matches!(entry.imp, Some(Impl::TableRef(_))) {
            return Ok(Self(
                CODE_VAR | FLAG_SYMBOL_TABLE | FLAG_EXECUTE_IMMEDIATELY,
            ));
        }

        // An object entry's implementation *creates* the object, so it must
        // run at lookup time and always yields an opaque value.
        if entry.kind == EntryKind::Object {
            return Ok(Self(CODE_VAR | FLAG_EXECUTE_IMMEDIATELY));
        }

        let mut bits = entry.returns.map_or(CODE_VOID, kind_code);
        if entry.has_this() {
            bits |= FLAG_THIS_ARG;
        }
        if matches!(entry.kind, EntryKind::Variable | EntryKind::Property) {
            bits |= FLAG_EXECUTE_IMMEDIATELY;
        }

        if entry.params.len() > MAX_PARAMS {
            return Err(BuildError::TooManyParams {
                entry: entry.qualified_name(),
            });
        }
        for (slot, param) in entry.params.iter().enumerate() {
            bits |= kind_code(param.kind) << ((slot as u32 + 1) * TYPE_BITS);
        }

        Ok(Self(bits))
    }

    /// Reconstruct from raw bits (e.g. from a bound native-function value).
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Declared return kind; `None` means no return value.
    pub fn return_kind(self) -> Option<ArgKind> {
        code_kind(self.0 & TYPE_MASK)
    }

    /// Declared kind of parameter `slot` (0-based); `None` past the end.
    pub fn param_kind(self, slot: usize) -> Option<ArgKind> {
        if slot >= MAX_PARAMS {
            return None;
        }
        code_kind((self.0 >> ((slot as u32 + 1) * TYPE_BITS)) & TYPE_MASK)
    }

    /// All declared parameter kinds in order.
    pub fn param_kinds(self) -> Vec<ArgKind> {
        (0..MAX_PARAMS)
            .map_while(|slot| self.param_kind(slot))
            .collect()
    }

    /// Number of declared parameters.
    pub fn param_count(self) -> usize {
        (0..MAX_PARAMS)
            .take_while(|&slot| self.param_kind(slot).is_some())
            .count()
    }

    /// Whether the call receives an implicit `this`.
    #[inline]
    pub const fn has_this(self) -> bool {
        self.0 & FLAG_THIS_ARG != 0
    }

    /// Whether the implementation runs at lookup time.
    #[inline]
    pub const fn execute_immediately(self) -> bool {
        self.0 & FLAG_EXECUTE_IMMEDIATELY != 0
    }

    /// Whether this record re-exposes another symbol table.
    #[inline]
    pub const fn is_symbol_table(self) -> bool {
        self.0 & FLAG_SYMBOL_TABLE != 0
    }
}
