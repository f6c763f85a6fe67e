//! Concurrent name interner for declaration names.
//!
//! Type tables store every declaration name and namespace as an [`Atom`]
//! (a `u32` index) so symbol records stay `Copy`-friendly and name equality
//! is an integer comparison. The interner is shared between threads that
//! register and query declarations at the same time, so interning goes
//! through a `DashMap` and resolution through a read-mostly vector.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// An interned name.
///
/// Atoms are cheap to copy and compare. To get the text back, use
/// [`NameInterner::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty name. Used for the global namespace.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names pre-interned by [`NameInterner::with_common_names`].
const COMMON_NAMES: &[&str] = &[
    "System",
    "System.Collections",
    "System.Collections.Generic",
    "Object",
    "ValueType",
    "String",
    "Boolean",
    "Char",
    "Int16",
    "Int32",
    "Int64",
    "Single",
    "Double",
    "Decimal",
    "IEquatable",
    "IComparable",
    "IEnumerable",
    "ICollection",
    "IList",
    "List",
    "Dictionary",
    "KeyValuePair",
    "T",
    "TKey",
    "TValue",
];

/// Thread-safe string interner.
///
/// Index 0 is always the empty string, so `Atom::NONE` resolves to `""`.
#[derive(Debug)]
pub struct NameInterner {
    map: DashMap<Arc<str>, Atom, FxBuildHasher>,
    strings: RwLock<Vec<Arc<str>>>,
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl NameInterner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let map = DashMap::with_hasher(FxBuildHasher);
        map.insert(empty.clone(), Atom::NONE);
        NameInterner {
            map,
            strings: RwLock::new(vec![empty]),
        }
    }

    /// Create an interner with the common framework names already present.
    pub fn with_common_names() -> Self {
        let interner = Self::new();
        for name in COMMON_NAMES {
            interner.intern(name);
        }
        interner
    }

    /// Intern `s`, returning the existing atom if it was seen before.
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }
        if let Some(atom) = self.map.get(s) {
            return *atom;
        }

        // The entry API holds the shard lock, so two threads racing on the
        // same name agree on a single atom.
        let owned: Arc<str> = Arc::from(s);
        *self.map.entry(owned.clone()).or_insert_with(|| {
            // A push either happened or it did not, so a poisoned list is
            // still consistent.
            let mut strings = self.strings.write().unwrap_or_else(PoisonError::into_inner);
            let atom = Atom(strings.len() as u32);
            strings.push(owned);
            atom
        })
    }

    /// Resolve an atom. Unknown atoms resolve to the empty string.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        self.read_strings().get(atom.0 as usize).cloned()
    }

    /// Look up an already-interned name without interning it.
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.map.get(s).map(|atom| *atom)
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.read_strings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn read_strings(&self) -> RwLockReadGuard<'_, Vec<Arc<str>>> {
        self.strings.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A namespace-qualified declaration name, split at the last `.`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Atom,
    pub name: Atom,
}

impl QualifiedName {
    /// Split `System.Collections.Generic.List` into namespace and name and
    /// intern both parts. A name without a dot lives in the global namespace.
    pub fn parse(interner: &NameInterner, qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((namespace, name)) => QualifiedName {
                namespace: interner.intern(namespace),
                name: interner.intern(name),
            },
            None => QualifiedName {
                namespace: Atom::NONE,
                name: interner.intern(qualified),
            },
        }
    }

    /// Render back to dotted form.
    pub fn render(&self, interner: &NameInterner) -> String {
        let name = interner.resolve(self.name);
        if self.namespace.is_none() {
            return name.to_string();
        }
        format!("{}.{}", interner.resolve(self.namespace), name)
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
