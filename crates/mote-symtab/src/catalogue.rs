//! Metadata catalogue
//!
//! One [`CatalogueEntry`] describes one native binding: a function, method,
//! property, variable, constructor, object, library, or lifecycle hook. The
//! catalogue is an ordered collection of entries supplied by an external
//! extraction step; the table builder consumes it as-is.
//!
//! Entries are authored with fluent constructors:
//!
//! ```ignore
//! CatalogueEntry::function("abs")
//!     .member_of("Math")
//!     .param("x", ArgKind::Float)
//!     .returns(ArgKind::Float)
//!     .native(math_abs)
//! ```

use crate::identity::BuiltinCheck;
use mote_sdk::{ArgKind, NativeFn};

/// The kind of a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Plain function, not this-bound.
    Function,
    /// This-bound function.
    Method,
    /// This-bound accessor, evaluated eagerly at lookup time.
    Property,
    /// Value-like binding, evaluated eagerly at lookup time.
    Variable,
    /// Native constructor for a class. Attached to the class's table rather
    /// than emitted as a symbol; the class's object entry is the visible name.
    Constructor,
    /// A class, module object, or object-literal prototype. Owns a symbol
    /// table and usually also appears as a symbol in its owner's table.
    Object,
    /// A library, materialized on demand by the module-loading path. Owns a
    /// symbol table but is not listed on the global object.
    Library,
    /// Hook run once at runtime initialisation.
    Init,
    /// Hook run at runtime teardown.
    Kill,
    /// Hook polled from the idle loop; reports whether it did work.
    Idle,
}

/// Implementation reference for an entry.
#[derive(Debug, Clone)]
pub enum Impl {
    /// A native function.
    Native(NativeFn),
    /// "Materialize the symbol table of the named namespace." Used by the
    /// synthesized `prototype` / `__proto__` links and by object entries
    /// that re-expose their own table.
    TableRef(String),
}

/// A declared parameter: name and kind.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name (documentation only; calls are positional).
    pub name: String,
    /// Parameter kind.
    pub kind: ArgKind,
}

/// One declared native binding.
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    /// What this entry is.
    pub kind: EntryKind,
    /// Identifier, unique within its owning namespace.
    pub name: String,
    /// Owning namespace; `None` puts the entry on the global root.
    pub member_of: Option<String>,
    /// Namespace this one behaviorally extends (drives `__proto__`
    /// synthesis).
    pub instance_of: Option<String>,
    /// Positional parameters.
    pub params: Vec<Param>,
    /// Return kind; `None` means no return value.
    pub returns: Option<ArgKind>,
    /// Whether a `Function`-kind entry is nonetheless this-bound.
    pub this_param: bool,
    /// For `Object` entries: the built-in type predicate that recognizes
    /// instances of this class at run time.
    pub check: Option<BuiltinCheck>,
    /// Implementation; entries without one are skipped by the builder.
    pub imp: Option<Impl>,
}

impl CatalogueEntry {
    fn new(kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            member_of: None,
            instance_of: None,
            params: Vec::new(),
            returns: None,
            this_param: false,
            check: None,
            imp: None,
        }
    }

    /// A plain function.
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Function, name)
    }

    /// A this-bound method.
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Method, name)
    }

    /// An eagerly-evaluated property accessor.
    pub fn property(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Property, name)
    }

    /// An eagerly-evaluated variable.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Variable, name)
    }

    /// The native constructor for the named class.
    pub fn constructor(class: impl Into<String>) -> Self {
        Self::new(EntryKind::Constructor, class)
    }

    /// A class / module object / prototype namespace.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Object, name)
    }

    /// A library namespace.
    pub fn library(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Library, name)
    }

    /// An initialisation hook.
    pub fn init_hook(imp: NativeFn) -> Self {
        Self::new(EntryKind::Init, "").native(imp)
    }

    /// A teardown hook.
    pub fn kill_hook(imp: NativeFn) -> Self {
        Self::new(EntryKind::Kill, "").native(imp)
    }

    /// An idle-loop hook.
    pub fn idle_hook(imp: NativeFn) -> Self {
        Self::new(EntryKind::Idle, "").native(imp)
    }

    /// Set the owning namespace.
    pub fn member_of(mut self, owner: impl Into<String>) -> Self {
        self.member_of = Some(owner.into());
        self
    }

    /// Set the namespace this one behaviorally extends.
    pub fn instance_of(mut self, class: impl Into<String>) -> Self {
        self.instance_of = Some(class.into());
        self
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        self.params.push(Param {
            name: name.into(),
            kind,
        });
        self
    }

    /// Set the return kind.
    pub fn returns(mut self, kind: ArgKind) -> Self {
        self.returns = Some(kind);
        self
    }

    /// Mark a `Function`-kind entry as this-bound.
    pub fn with_this(mut self) -> Self {
        self.this_param = true;
        self
    }

    /// Set the run-time type predicate for an `Object` entry.
    pub fn check(mut self, check: BuiltinCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Set a native implementation.
    pub fn native(mut self, imp: NativeFn) -> Self {
        self.imp = Some(Impl::Native(imp));
        self
    }

    /// Set a symbol-table reference implementation.
    pub fn table_ref(mut self, table: impl Into<String>) -> Self {
        self.imp = Some(Impl::TableRef(table.into()));
        self
    }

    /// Whether calls to this entry receive an implicit `this`.
    pub fn has_this(&self) -> bool {
        self.this_param || matches!(self.kind, EntryKind::Method | EntryKind::Property)
    }

    /// `Owner.name` identity string used in build diagnostics.
    pub fn qualified_name(&self) -> String {
        match &self.member_of {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}

/// Ordered collection of catalogue entries.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    /// The entries, in declaration order. Order is significant: table
    /// indices are assigned in discovery order over this sequence.
    pub entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: CatalogueEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogueEntry> {
        self.entries.iter()
    }
}

impl FromIterator<CatalogueEntry> for Catalogue {
    fn from_iter<T: IntoIterator<Item = CatalogueEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
