//! Symbol-table construction
//!
//! `SymbolTableSet::build` turns a catalogue into the read-only table set
//! the runtime dispatches against. Construction is three-phase so no pass
//! ever appends to a collection another pass is iterating:
//!
//! 1. **collect** — validate the declared entries immutably and record
//!    classes, constructors, checks, libraries, and lifecycle hooks;
//! 2. **synthesize** — compute the implicit entries into a separate buffer:
//!    `__proto__` links for `instance_of` classes, base classes for orphan
//!    prototypes, `prototype` back-links, self-materializing impls for
//!    object entries;
//! 3. **merge** — partition everything by owner, sort each table's
//!    surviving entries by name, concatenate the NUL-separated name blob,
//!    encode signatures, resolve table references to indices, and attach
//!    constructors.
//!
//! Any inconsistency aborts the whole build; a partially built table set is
//! never observable.

use crate::catalogue::{Catalogue, CatalogueEntry, EntryKind, Impl};
use crate::error::BuildError;
use crate::identity::BuiltinCheck;
use crate::signature::PackedSignature;
use mote_sdk::{ArgKind, ConstructorId, NativeFn, TableIndex};
use rustc_hash::{FxHashMap, FxHashSet};

/// Name of the root namespace; ownerless entries land here.
pub const ROOT_TABLE: &str = "global";

/// Suffix marking a prototype namespace.
const PROTO_SUFFIX: &str = ".prototype";

/// Resolved implementation of one symbol record.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedImpl {
    /// Call (or bind) this native function.
    Native(NativeFn),
    /// Materialize the symbol table at this index.
    Table(TableIndex),
}

/// One record in a symbol table: name offset into the blob, packed
/// signature, resolved implementation.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRecord {
    /// Byte offset of this record's name in the table's name blob.
    pub name_offset: u16,
    /// Packed call signature.
    pub signature: PackedSignature,
    /// What resolving this record does.
    pub imp: ResolvedImpl,
}

/// Constructor attached to a table, used to recognize instances.
#[derive(Debug, Clone, Copy)]
pub struct TableConstructor {
    /// The constructor implementation.
    pub imp: NativeFn,
    /// Its packed signature.
    pub signature: PackedSignature,
    /// The identity token instances of this class carry.
    pub id: ConstructorId,
}

/// One namespace's sorted symbol table. Immutable after build.
#[derive(Debug)]
pub struct SymbolTable {
    name: String,
    index: TableIndex,
    records: Vec<SymbolRecord>,
    name_blob: String,
    constructor: Option<TableConstructor>,
}

impl SymbolTable {
    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This table's index in the set.
    pub fn index(&self) -> TableIndex {
        self.index
    }

    /// The sorted records.
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// The concatenated, NUL-separated name blob.
    pub fn name_blob(&self) -> &str {
        &self.name_blob
    }

    /// The constructor attached to this table, if any.
    pub fn constructor(&self) -> Option<&TableConstructor> {
        self.constructor.as_ref()
    }

    /// A record's name, read out of the blob.
    pub fn record_name(&self, record: &SymbolRecord) -> &str {
        let rest = &self.name_blob[record.name_offset as usize..];
        match rest.find('\0') {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    /// Binary search for `name`. O(log n) string comparisons; names are
    /// unique so no tie-break is needed.
    pub fn lookup(&self, name: &str) -> Option<&SymbolRecord> {
        let mut lo = 0isize;
        let mut hi = self.records.len() as isize - 1;
        while lo <= hi {
            let mid = (lo + hi) >> 1;
            let record = &self.records[mid as usize];
            match name.cmp(self.record_name(record)) {
                std::cmp::Ordering::Equal => return Some(record),
                std::cmp::Ordering::Less => hi = mid - 1,
                std::cmp::Ordering::Greater => lo = mid + 1,
            }
        }
        None
    }
}

/// The complete, immutable table set: one sorted symbol table per
/// namespace, plus the derived lookup structures the identity resolver and
/// module loader consume.
#[derive(Debug)]
pub struct SymbolTableSet {
    tables: Vec<SymbolTable>,
    by_name: FxHashMap<String, TableIndex>,
    global: TableIndex,
    libraries: Vec<(String, TableIndex)>,
    /// Ordered instance checks: fixed precedence, object fallback last.
    pub(crate) checks: Vec<(BuiltinCheck, TableIndex)>,
    /// Ordered prototype checks for classes that have a `.prototype` table.
    pub(crate) proto_checks: Vec<(BuiltinCheck, TableIndex)>,
    /// Constructor tokens in table order, for user-class identity.
    pub(crate) constructors: Vec<(ConstructorId, TableIndex)>,
    /// Class-name/check pairs for `basic_object_name`, buffer checks first.
    pub(crate) named_checks: Vec<(String, BuiltinCheck)>,
    builtin_names: Vec<String>,
    pub(crate) init_hooks: Vec<NativeFn>,
    pub(crate) kill_hooks: Vec<NativeFn>,
    pub(crate) idle_hooks: Vec<NativeFn>,
}

impl SymbolTableSet {
    /// Build the table set from a (possibly blacklist-filtered) catalogue.
    ///
    /// Deterministic given a fixed catalogue order: table indices are
    /// assigned in discovery order (root first, then declared classes,
    /// then libraries, then implicitly referenced owners).
    pub fn build(catalogue: &Catalogue) -> Result<Self, BuildError> {
        Builder::new(catalogue)?.finish()
    }

    /// The table at `index`.
    pub fn table(&self, index: TableIndex) -> Option<&SymbolTable> {
        self.tables.get(index.as_usize())
    }

    /// All tables, in index order.
    pub fn tables(&self) -> &[SymbolTable] {
        &self.tables
    }

    /// Number of tables. The instance cache is sized to this.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Look a table up by namespace name.
    pub fn index_of(&self, name: &str) -> Option<TableIndex> {
        self.by_name.get(name).copied()
    }

    /// The root namespace's table index.
    pub fn global(&self) -> TableIndex {
        self.global
    }

    /// The constructor token for `index`'s class, if it has a constructor.
    pub fn constructor_id(&self, index: TableIndex) -> Option<ConstructorId> {
        self.table(index)?.constructor().map(|c| c.id)
    }

    /// Declared library names, in declaration order.
    pub fn library_names(&self) -> Vec<&str> {
        self.libraries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// The table index of a declared library.
    pub fn library_index(&self, name: &str) -> Option<TableIndex> {
        self.libraries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, i)| *i)
    }

    /// Whether `name` is the name of a built-in object (i.e. some binding
    /// declares it as its owner). Used by the evaluator to decide whether a
    /// bare identifier should be set up as a builtin.
    pub fn is_builtin_object(&self, name: &str) -> bool {
        self.builtin_names.iter().any(|n| n == name)
    }
}

/// In-progress build state.
struct Builder<'c> {
    catalogue: &'c Catalogue,
    class_order: Vec<String>,
    classes: FxHashSet<String>,
    constructors: FxHashMap<String, &'c CatalogueEntry>,
    libraries: Vec<String>,
    named_checks_decl: Vec<(String, BuiltinCheck)>,
    init_hooks: Vec<NativeFn>,
    kill_hooks: Vec<NativeFn>,
    idle_hooks: Vec<NativeFn>,
}

impl<'c> Builder<'c> {
    /// Phase 1: collect and validate the declared entries.
    fn new(catalogue: &'c Catalogue) -> Result<Self, BuildError> {
        let mut b = Builder {
            catalogue,
            class_order: Vec::new(),
            classes: FxHashSet::default(),
            constructors: FxHashMap::default(),
            libraries: Vec::new(),
            named_checks_decl: Vec::new(),
            init_hooks: Vec::new(),
            kill_hooks: Vec::new(),
            idle_hooks: Vec::new(),
        };

        for entry in catalogue.iter() {
            match entry.kind {
                EntryKind::Object => {
                    if !b.classes.insert(entry.name.clone()) {
                        return Err(BuildError::DuplicateClass {
                            name: entry.name.clone(),
                        });
                    }
                    if entry.name.ends_with(PROTO_SUFFIX) && entry.member_of.is_some() {
                        return Err(BuildError::PrototypeIsMember {
                            name: entry.name.clone(),
                        });
                    }
                    b.class_order.push(entry.name.clone());
                    if let Some(check) = entry.check {
                        b.named_checks_decl.push((entry.name.clone(), check));
                    }
                }
                EntryKind::Constructor => {
                    if b.constructors.insert(entry.name.clone(), entry).is_some() {
                        return Err(BuildError::DuplicateConstructor {
                            name: entry.name.clone(),
                        });
                    }
                }
                EntryKind::Library => b.libraries.push(entry.name.clone()),
                EntryKind::Init => {
                    if let Some(Impl::Native(f)) = &entry.imp {
                        b.init_hooks.push(*f);
                    }
                }
                EntryKind::Kill => {
                    if let Some(Impl::Native(f)) = &entry.imp {
                        b.kill_hooks.push(*f);
                    }
                }
                EntryKind::Idle => {
                    if let Some(Impl::Native(f)) = &entry.imp {
                        b.idle_hooks.push(*f);
                    }
                }
                _ => {}
            }
        }
        Ok(b)
    }

    /// Phase 2: compute the synthesized entries into a separate buffer and
    /// return the merged entry list.
    fn expand(&self) -> Vec<CatalogueEntry> {
        let mut expanded: Vec<CatalogueEntry> = Vec::with_capacity(self.catalogue.len());

        for entry in self.catalogue.iter() {
            match entry.kind {
                EntryKind::Constructor
                | EntryKind::Library
                | EntryKind::Init
                | EntryKind::Kill
                | EntryKind::Idle => {}
                EntryKind::Object => {
                    let mut e = entry.clone();
                    // An object entry without an implementation re-exposes
                    // its own table.
                    if e.imp.is_none() {
                        e.imp = Some(Impl::TableRef(e.name.clone()));
                    }
                    expanded.push(e);
                }
                _ => expanded.push(entry.clone()),
            }
        }

        // instance → prototype: every class that extends another gets a
        // `__proto__` that materializes the base's prototype table.
        for entry in self.catalogue.iter() {
            if entry.kind != EntryKind::Object {
                continue;
            }
            if let Some(base) = &entry.instance_of {
                expanded.push(
                    CatalogueEntry::variable("__proto__")
                        .member_of(entry.name.clone())
                        .returns(ArgKind::Var)
                        .table_ref(format!("{base}{PROTO_SUFFIX}")),
                );
            }
        }

        // Orphan prototypes: a `Foo.prototype` with no `Foo` synthesizes the
        // base class on the root so `Foo` still resolves there.
        for class in &self.class_order {
            let Some(base) = class.strip_suffix(PROTO_SUFFIX) else {
                continue;
            };
            if !self.classes.contains(base) {
                expanded.push(
                    CatalogueEntry::object(base)
                        .member_of(ROOT_TABLE)
                        .table_ref(base),
                );
            }
        }

        // prototype back-link on the base class, unless declared explicitly.
        for class in &self.class_order {
            let Some(base) = class.strip_suffix(PROTO_SUFFIX) else {
                continue;
            };
            let declared = self
                .catalogue
                .iter()
                .any(|e| e.name == "prototype" && e.member_of.as_deref() == Some(base));
            if !declared {
                expanded.push(
                    CatalogueEntry::variable("prototype")
                        .member_of(base)
                        .returns(ArgKind::Var)
                        .table_ref(class.clone()),
                );
            }
        }

        expanded
    }

    /// Phase 3: partition, sort, and emit.
    fn finish(self) -> Result<SymbolTableSet, BuildError> {
        let expanded = self.expand();

        // Table discovery order: root, declared classes, synthesized base
        // classes, libraries, then implicitly referenced owners.
        let mut order: Vec<String> = Vec::new();
        let mut by_name: FxHashMap<String, TableIndex> = FxHashMap::default();
        let mut members: Vec<Vec<usize>> = Vec::new();

        fn ensure(
            name: &str,
            order: &mut Vec<String>,
            by_name: &mut FxHashMap<String, TableIndex>,
            members: &mut Vec<Vec<usize>>,
        ) -> TableIndex {
            if let Some(i) = by_name.get(name) {
                return *i;
            }
            let index = TableIndex(order.len() as u16);
            order.push(name.to_string());
            by_name.insert(name.to_string(), index);
            members.push(Vec::new());
            index
        }

        ensure(ROOT_TABLE, &mut order, &mut by_name, &mut members);
        for class in &self.class_order {
            ensure(class, &mut order, &mut by_name, &mut members);
        }
        for e in &expanded {
            // Synthesized base classes need their tables discovered before
            // reference resolution, in synthesis order.
            if e.kind == EntryKind::Object {
                ensure(&e.name, &mut order, &mut by_name, &mut members);
            }
        }
        for lib in &self.libraries {
            ensure(lib, &mut order, &mut by_name, &mut members);
        }

        for (i, e) in expanded.iter().enumerate() {
            // Prototype namespaces are reached through their base class's
            // `prototype` link, never as a symbol of some owner.
            if e.kind == EntryKind::Object && e.name.ends_with(PROTO_SUFFIX) {
                continue;
            }
            let owner = e.member_of.as_deref().unwrap_or(ROOT_TABLE);
            // Libraries are materialized by the module loader, not listed on
            // the global object.
            if owner == ROOT_TABLE && self.libraries.iter().any(|l| *l == e.name) {
                continue;
            }
            let t = ensure(owner, &mut order, &mut by_name, &mut members);
            members[t.as_usize()].push(i);
        }

        // Emit each table: filter implementation-less entries, sort, blob.
        let mut tables: Vec<SymbolTable> = Vec::with_capacity(order.len());
        let mut constructors: Vec<(ConstructorId, TableIndex)> = Vec::new();
        let mut next_constructor = 0u32;

        for (i, name) in order.iter().enumerate() {
            let index = TableIndex(i as u16);
            let mut entries: Vec<&CatalogueEntry> = members[i]
                .iter()
                .map(|&j| &expanded[j])
                .filter(|e| e.imp.is_some())
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            for pair in entries.windows(2) {
                if pair[0].name == pair[1].name {
                    return Err(BuildError::DuplicateSymbol {
                        table: name.clone(),
                        name: pair[0].name.clone(),
                    });
                }
            }

            let mut name_blob = String::new();
            let mut records = Vec::with_capacity(entries.len());
            for e in &entries {
                let imp = match &e.imp {
                    Some(Impl::Native(f)) => ResolvedImpl::Native(*f),
                    Some(Impl::TableRef(target)) => {
                        let t = by_name.get(target).ok_or_else(|| {
                            BuildError::UnresolvedTableRef {
                                entry: e.qualified_name(),
                                target: target.clone(),
                            }
                        })?;
                        ResolvedImpl::Table(*t)
                    }
                    // Implementation-less entries were filtered above.
                    None => continue,
                };

                if name_blob.len() > u16::MAX as usize {
                    return Err(BuildError::NameTableOverflow {
                        table: name.clone(),
                    });
                }
                let name_offset = name_blob.len() as u16;
                name_blob.push_str(&e.name);
                name_blob.push('\0');

                let signature = PackedSignature::encode(e)?;
                records.push(SymbolRecord {
                    name_offset,
                    signature,
                    imp,
                });
            }

            let mut constructor = None;
            if let Some(ctor) = self.constructors.get(name) {
                if let Some(Impl::Native(f)) = &ctor.imp {
                    let id = ConstructorId(next_constructor);
                    next_constructor += 1;
                    constructors.push((id, index));
                    constructor = Some(TableConstructor {
                        imp: *f,
                        signature: PackedSignature::encode(ctor)?,
                        id,
                    });
                }
            }

            tables.push(SymbolTable {
                name: name.clone(),
                index,
                records,
                name_blob,
                constructor,
            });
        }

        // Ordered predicate lists. A class with a prototype table answers
        // through the prototype list; one without answers directly.
        let mut checks = Vec::new();
        let mut proto_checks = Vec::new();
        for ck in BuiltinCheck::PRECEDENCE {
            for (class, c) in &self.named_checks_decl {
                if *c != *ck {
                    continue;
                }
                let idx = by_name[class.as_str()];
                match by_name.get(format!("{class}{PROTO_SUFFIX}").as_str()) {
                    Some(proto) => {
                        if class != ROOT_TABLE {
                            proto_checks.push((*c, *proto));
                        }
                    }
                    None => checks.push((*c, idx)),
                }
            }
        }

        // `basic_object_name` order: array-buffer sub-checks first so a
        // view never reports as its backing buffer's class.
        let mut named_checks: Vec<(String, BuiltinCheck)> = Vec::new();
        for (class, c) in &self.named_checks_decl {
            if matches!(c, BuiltinCheck::ArrayBuffer | BuiltinCheck::ArrayBufferView) {
                named_checks.push((class.clone(), *c));
            }
        }
        for ck in BuiltinCheck::PRECEDENCE {
            for (class, c) in &self.named_checks_decl {
                if c == ck && !matches!(c, BuiltinCheck::ArrayBuffer | BuiltinCheck::ArrayBufferView)
                {
                    named_checks.push((class.clone(), *c));
                }
            }
        }

        // Builtin-object names: every distinct top-level owner that isn't a
        // library.
        let mut builtin_names: Vec<String> = Vec::new();
        for e in &expanded {
            if let Some(owner) = &e.member_of {
                if owner.contains('.') || self.libraries.iter().any(|l| l == owner) {
                    continue;
                }
                if !builtin_names.iter().any(|n| n == owner) {
                    builtin_names.push(owner.clone());
                }
            }
        }

        let libraries = self
            .libraries
            .iter()
            .map(|l| (l.clone(), by_name[l.as_str()]))
            .collect();

        let global = by_name[ROOT_TABLE];
        Ok(SymbolTableSet {
            tables,
            by_name,
            global,
            libraries,
            checks,
            proto_checks,
            constructors,
            named_checks,
            builtin_names,
            init_hooks: self.init_hooks,
            kill_hooks: self.kill_hooks,
            idle_hooks: self.idle_hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mote_sdk::{Heap, NativeArg, NativeReturn, Value};

    fn noop(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        NativeReturn::Void
    }

    fn ret_int(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        NativeReturn::Int32(1)
    }

    #[test]
    fn test_sorted_and_unique() {
        let catalogue: Catalogue = [
            CatalogueEntry::function("zeta").native(noop),
            CatalogueEntry::function("alpha").native(noop),
            CatalogueEntry::function("mid").native(noop),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let root = set.table(set.global()).unwrap();
        let names: Vec<&str> = root
            .records()
            .iter()
            .map(|r| root.record_name(r))
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        // Strictly ascending — binary search needs no linear fallback.
        for pair in names.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_duplicate_symbol_is_fatal() {
        let catalogue: Catalogue = [
            CatalogueEntry::function("f").member_of("Math").native(noop),
            CatalogueEntry::variable("f").member_of("Math").returns(ArgKind::Int32).native(noop),
        ]
        .into_iter()
        .collect();
        let err = SymbolTableSet::build(&catalogue).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_duplicate_class_is_fatal() {
        let catalogue: Catalogue = [
            CatalogueEntry::object("Math").member_of(ROOT_TABLE),
            CatalogueEntry::object("Math").member_of(ROOT_TABLE),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            SymbolTableSet::build(&catalogue).unwrap_err(),
            BuildError::DuplicateClass { .. }
        ));
    }

    #[test]
    fn test_duplicate_constructor_is_fatal() {
        let catalogue: Catalogue = [
            CatalogueEntry::constructor("Widget").returns(ArgKind::Var).native(noop),
            CatalogueEntry::constructor("Widget").returns(ArgKind::Var).native(noop),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            SymbolTableSet::build(&catalogue).unwrap_err(),
            BuildError::DuplicateConstructor { .. }
        ));
    }

    #[test]
    fn test_prototype_cannot_be_member() {
        let catalogue: Catalogue = [CatalogueEntry::object("Widget.prototype").member_of("Gui")]
            .into_iter()
            .collect();
        assert!(matches!(
            SymbolTableSet::build(&catalogue).unwrap_err(),
            BuildError::PrototypeIsMember { .. }
        ));
    }

    #[test]
    fn test_orphan_prototype_synthesizes_base() {
        let catalogue: Catalogue = [
            CatalogueEntry::object("Foo.prototype"),
            CatalogueEntry::method("bar")
                .member_of("Foo.prototype")
                .returns(ArgKind::Int32)
                .native(ret_int),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        // The base table exists and the root lists it.
        let foo = set.index_of("Foo").unwrap();
        let root = set.table(set.global()).unwrap();
        assert!(root.lookup("Foo").is_some());
        // And the base links back to its prototype.
        let foo_table = set.table(foo).unwrap();
        let proto_link = foo_table.lookup("prototype").unwrap();
        assert!(proto_link.signature.is_symbol_table());
        match proto_link.imp {
            ResolvedImpl::Table(t) => {
                assert_eq!(set.table(t).unwrap().name(), "Foo.prototype");
            }
            _ => panic!("prototype link should be a table reference"),
        }
    }

    #[test]
    fn test_instance_of_synthesizes_dunder_proto() {
        let catalogue: Catalogue = [
            CatalogueEntry::object("Object.prototype"),
            CatalogueEntry::object("Math")
                .member_of(ROOT_TABLE)
                .instance_of("Object"),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let math = set.table(set.index_of("Math").unwrap()).unwrap();
        let proto = math.lookup("__proto__").unwrap();
        assert!(proto.signature.is_symbol_table());
        match proto.imp {
            ResolvedImpl::Table(t) => {
                assert_eq!(set.table(t).unwrap().name(), "Object.prototype");
            }
            _ => panic!("__proto__ should be a table reference"),
        }
    }

    #[test]
    fn test_unresolved_table_ref_is_fatal() {
        let catalogue: Catalogue = [CatalogueEntry::object("Math")
            .member_of(ROOT_TABLE)
            .instance_of("Missing")]
        .into_iter()
        .collect();
        assert!(matches!(
            SymbolTableSet::build(&catalogue).unwrap_err(),
            BuildError::UnresolvedTableRef { .. }
        ));
    }

    #[test]
    fn test_entries_without_impl_are_skipped() {
        let catalogue: Catalogue = [
            CatalogueEntry::function("documented_only"),
            CatalogueEntry::function("real").native(noop),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let root = set.table(set.global()).unwrap();
        assert!(root.lookup("documented_only").is_none());
        assert!(root.lookup("real").is_some());
        assert_eq!(root.record_count(), 1);
    }

    #[test]
    fn test_libraries_not_listed_on_global() {
        let catalogue: Catalogue = [
            CatalogueEntry::library("Storage"),
            CatalogueEntry::function("read")
                .member_of("Storage")
                .returns(ArgKind::Var)
                .native(noop),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        assert!(set.table(set.global()).unwrap().lookup("Storage").is_none());
        assert_eq!(set.library_names(), vec!["Storage"]);
        let lib = set.library_index("Storage").unwrap();
        assert!(set.table(lib).unwrap().lookup("read").is_some());
    }

    #[test]
    fn test_forward_referenced_owner_creates_table() {
        // Nothing declares `Console`, but a member claims it.
        let catalogue: Catalogue = [CatalogueEntry::function("log")
            .member_of("Console")
            .native(noop)]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let idx = set.index_of("Console").unwrap();
        assert!(set.table(idx).unwrap().lookup("log").is_some());
    }

    #[test]
    fn test_first_declaration_wins_over_implicit() {
        let catalogue: Catalogue = [
            CatalogueEntry::object("Console").member_of(ROOT_TABLE),
            CatalogueEntry::function("log").member_of("Console").native(noop),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        // Exactly one Console table: root + Console.
        assert_eq!(set.table_count(), 2);
        assert!(set.table(set.global()).unwrap().lookup("Console").is_some());
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let catalogue: Catalogue = [
                CatalogueEntry::object("B").member_of(ROOT_TABLE),
                CatalogueEntry::object("A").member_of(ROOT_TABLE),
                CatalogueEntry::function("f").member_of("A").native(noop),
                CatalogueEntry::function("g").member_of("B").native(noop),
            ]
            .into_iter()
            .collect::<Catalogue>();
            SymbolTableSet::build(&catalogue).unwrap()
        };
        let a = build();
        let b = build();
        let names = |s: &SymbolTableSet| {
            s.tables().iter().map(|t| t.name().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.global(), b.global());
    }

    #[test]
    fn test_name_blob_layout() {
        let catalogue: Catalogue = [
            CatalogueEntry::function("bb").native(noop),
            CatalogueEntry::function("a").native(noop),
        ]
        .into_iter()
        .collect();
        let set = SymbolTableSet::build(&catalogue).unwrap();
        let root = set.table(set.global()).unwrap();
        assert_eq!(root.name_blob(), "a\0bb\0");
        assert_eq!(root.records()[0].name_offset, 0);
        assert_eq!(root.records()[1].name_offset, 2);
    }
}
