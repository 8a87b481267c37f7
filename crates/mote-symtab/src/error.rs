//! Build-time error taxonomy
//!
//! Everything here is fatal and author-facing: table construction aborts on
//! the first inconsistency rather than emitting a partial table set. The
//! run-time side has no error type at all — a resolution miss is `None` and
//! is ordinary control flow.

use mote_sdk::UnknownArgKind;

/// Fatal table-construction error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    /// The same class was declared twice.
    #[error("class `{name}` is defined twice")]
    DuplicateClass {
        /// The class name.
        name: String,
    },

    /// Two constructors were declared for one class.
    #[error("duplicate constructor for `{name}`")]
    DuplicateConstructor {
        /// The class name.
        name: String,
    },

    /// Two surviving entries in one namespace share a name.
    #[error("symbol `{name}` appears twice in table `{table}`")]
    DuplicateSymbol {
        /// The table name.
        table: String,
        /// The duplicated symbol name.
        name: String,
    },

    /// A prototype namespace cannot itself be a member of anything.
    #[error("class `{name}` can't be a member of anything because it's a prototype")]
    PrototypeIsMember {
        /// The prototype class name.
        name: String,
    },

    /// More parameters than the packed signature has slots for.
    #[error("too many arguments on `{entry}` to fit in the packed signature; use a JsVarArray parameter instead")]
    TooManyParams {
        /// Identity of the offending entry.
        entry: String,
    },

    /// A symbol-table reference names a namespace that has no table.
    #[error("entry `{entry}` references unknown symbol table `{target}`")]
    UnresolvedTableRef {
        /// Identity of the referencing entry.
        entry: String,
        /// The missing table name.
        target: String,
    },

    /// A table's concatenated names outgrew the 16-bit offset space.
    #[error("name table for `{table}` exceeds the 16-bit offset range")]
    NameTableOverflow {
        /// The table name.
        table: String,
    },

    /// An argument-kind name from a catalogue front-end was not recognized.
    #[error(transparent)]
    UnknownArgKind(#[from] UnknownArgKind),
}
