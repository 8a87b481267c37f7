//! Build-time blacklist filtering
//!
//! Firmware variants strip bindings to fit flash: a JSON rule file lists
//! `{class, name}` pairs and [`Blacklist::apply`] filters a catalogue down
//! before table construction. A name wildcard removes the whole namespace:
//! every member, the class or library declaration itself, and any class
//! declared as an instance of it.

use crate::catalogue::{Catalogue, CatalogueEntry, EntryKind};
use serde::Deserialize;

/// Name matching every member, or every class instance.
const WILDCARD: &str = "*";

/// Class name addressing ownerless (global) entries.
const GLOBAL_CLASS: &str = "__";

/// One removal rule from a blacklist file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistRule {
    /// Owning class, `"__"` for global entries.
    pub class: String,
    /// Member name, `"*"` for all of them.
    pub name: String,
}

/// An ordered set of removal rules.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    rules: Vec<BlacklistRule>,
}

impl Blacklist {
    /// A blacklist from already-parsed rules.
    pub fn new(rules: Vec<BlacklistRule>) -> Self {
        Self { rules }
    }

    /// Parse a JSON rule file: an array of `{"class": ..., "name": ...}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<BlacklistRule>>(text).map(Self::new)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The catalogue with every blacklisted entry removed. Declaration
    /// order of the survivors is preserved.
    pub fn apply(&self, catalogue: &Catalogue) -> Catalogue {
        catalogue
            .iter()
            .filter(|e| !self.removes(e))
            .cloned()
            .collect()
    }

    fn removes(&self, entry: &CatalogueEntry) -> bool {
        for rule in &self.rules {
            // Members of the named class, by name or wholesale.
            if entry.member_of.as_deref() == Some(rule.class.as_str())
                && (rule.name == WILDCARD || rule.name == entry.name)
            {
                return true;
            }
            // `__` addresses entries on the global root.
            if entry.member_of.is_none()
                && rule.class == GLOBAL_CLASS
                && rule.name == entry.name
            {
                return true;
            }
            // A name wildcard also removes the class or library declaration
            // itself, and strips the family of derived classes.
            if rule.name == WILDCARD {
                if matches!(entry.kind, EntryKind::Object | EntryKind::Library)
                    && entry.name == rule.class
                {
                    return true;
                }
                if entry.instance_of.as_deref() == Some(rule.class.as_str()) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mote_sdk::{ArgKind, Heap, NativeArg, NativeReturn, Value};

    fn noop(_: &mut Heap, _: Option<Value>, _: &[NativeArg]) -> NativeReturn {
        NativeReturn::Void
    }

    fn sample() -> Catalogue {
        [
            CatalogueEntry::object("Math").member_of("global"),
            CatalogueEntry::function("abs")
                .member_of("Math")
                .param("x", ArgKind::Float)
                .returns(ArgKind::Float)
                .native(noop),
            CatalogueEntry::function("sin")
                .member_of("Math")
                .param("x", ArgKind::Float)
                .returns(ArgKind::Float)
                .native(noop),
            CatalogueEntry::function("eval").native(noop),
            CatalogueEntry::object("I2C1").instance_of("I2C"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_named_member_removed() {
        let bl = Blacklist::from_json(r#"[{"class": "Math", "name": "sin"}]"#).unwrap();
        let filtered = bl.apply(&sample());
        assert!(filtered.iter().all(|e| e.name != "sin"));
        assert!(filtered.iter().any(|e| e.name == "abs"));
    }

    #[test]
    fn test_wildcard_removes_members_and_declaration() {
        let bl = Blacklist::from_json(r#"[{"class": "Math", "name": "*"}]"#).unwrap();
        let filtered = bl.apply(&sample());
        assert!(filtered.iter().all(|e| e.member_of.as_deref() != Some("Math")));
        // The class declaration goes with its members.
        assert!(filtered.iter().all(|e| e.name != "Math"));
        // Unrelated entries are untouched.
        assert!(filtered.iter().any(|e| e.name == "eval"));
    }

    #[test]
    fn test_global_entries_addressed_as_dunder() {
        let bl = Blacklist::from_json(r#"[{"class": "__", "name": "eval"}]"#).unwrap();
        let filtered = bl.apply(&sample());
        assert!(filtered.iter().all(|e| e.name != "eval"));
    }

    #[test]
    fn test_instance_family_wildcard() {
        let bl = Blacklist::from_json(r#"[{"class": "I2C", "name": "*"}]"#).unwrap();
        let filtered = bl.apply(&sample());
        assert!(filtered.iter().all(|e| e.name != "I2C1"));
    }

    #[test]
    fn test_empty_blacklist_is_identity() {
        let bl = Blacklist::default();
        assert!(bl.is_empty());
        assert_eq!(bl.apply(&sample()).len(), sample().len());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Blacklist::from_json("{not json").is_err());
        assert!(Blacklist::from_json(r#"[{"class": "Math"}]"#).is_err());
    }
}
