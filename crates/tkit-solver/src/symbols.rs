//! Declaration identifiers and storage.
//!
//! [`SymbolTable`] is the in-process [`TypeInfo`] source: a thread-safe map
//! from [`TypeSymbol`] to [`SymbolInfo`], plus the name interner used to
//! render and look up declarations.
//!
//! Base types and interfaces are stored as written on the declaration, in
//! terms of the declaration's own placeholders. Flattening (interfaces of
//! interfaces, interfaces of ancestors) happens on query, with placeholders
//! substituted along the way, so `class Sub : MyList<Int32>` reports
//! `Enumerable<Int32>` even though only `MyList<T> : Enumerable<T>` was
//! declared.
//!
//! | Kind | Base | Example |
//! |------|------|---------|
//! | Class | root unless given | `class Person : IEquatable<Person>` |
//! | Interface | none | `interface IEnumerable<T>` |
//! | Struct | none | `struct KeyValuePair<TKey, TValue>` |
//! | Primitive | none | `Int32` |

use crate::error::UnifyError;
use crate::provider::{TypeInfo, validate_type_ref};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{ParamRef, TypeRef, TypeSymbol};
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tkit_common::{Atom, NameInterner, QualifiedName};
use tracing::trace;

/// Global counter for telling symbol table instances apart in traces.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// SymbolKind
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Struct,
    Primitive,
}

// =============================================================================
// SymbolInfo
// =============================================================================

/// Everything the table knows about one declaration.
#[derive(Clone, Debug)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub name: Atom,
    pub namespace: Atom,
    /// Generic parameter names, in declaration order. Length is the arity.
    pub type_params: Vec<Atom>,
    /// Immediate base type, in terms of this declaration's placeholders.
    pub base: Option<TypeRef>,
    /// Directly declared interfaces, in terms of this declaration's placeholders.
    pub interfaces: Vec<TypeRef>,
    /// The universal root (`Object`).
    pub is_root: bool,
}

impl SymbolInfo {
    pub fn new(kind: SymbolKind, name: QualifiedName, type_params: Vec<Atom>) -> Self {
        Self {
            kind,
            name: name.name,
            namespace: name.namespace,
            type_params,
            base: None,
            interfaces: Vec::new(),
            is_root: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeRef>) -> Self {
        self.interfaces = interfaces;
        self
    }

    const fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }
}

// =============================================================================
// SymbolTable
// =============================================================================

/// Thread-safe declaration storage.
///
/// ## Usage
///
/// ```ignore
/// let table = SymbolTable::with_root();
/// let enumerable = table.declare(SymbolKind::Interface, "Enumerable", &["T"]);
/// let my_list = table.declare(SymbolKind::Class, "MyList", &["T"]);
/// table.add_interface(my_list, TypeRef::generic(enumerable, [TypeArgument::param(my_list, 0)]));
/// ```
#[derive(Debug)]
pub struct SymbolTable {
    instance_id: u64,
    names: NameInterner,
    symbols: DashMap<TypeSymbol, SymbolInfo>,
    by_qualified_name: DashMap<Atom, TypeSymbol>,
    by_name: DashMap<Atom, TypeSymbol>,
    next_id: AtomicU32,
    root: Option<TypeSymbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create an empty table with no universal root.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "SymbolTable::new");
        Self {
            instance_id,
            names: NameInterner::with_common_names(),
            symbols: DashMap::new(),
            by_qualified_name: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU32::new(TypeSymbol::FIRST_VALID),
            root: None,
        }
    }

    /// Create a table whose first symbol is the universal root `Object`.
    /// Classes declared afterwards extend it unless given another base.
    pub fn with_root() -> Self {
        let mut table = Self::new();
        let name = QualifiedName::parse(&table.names, "System.Object");
        let root = table.register(SymbolInfo::new(SymbolKind::Class, name, Vec::new()).as_root());
        table.root = Some(root);
        table
    }

    pub fn root(&self) -> Option<TypeSymbol> {
        self.root
    }

    pub fn names(&self) -> &NameInterner {
        &self.names
    }

    fn allocate(&self) -> TypeSymbol {
        TypeSymbol(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a declaration and return its symbol.
    pub fn register(&self, info: SymbolInfo) -> TypeSymbol {
        let symbol = self.allocate();
        trace!(
            instance_id = self.instance_id,
            symbol = symbol.0,
            kind = ?info.kind,
            arity = info.arity(),
            "SymbolTable::register"
        );

        let qualified = QualifiedName {
            namespace: info.namespace,
            name: info.name,
        }
        .render(&self.names);
        self.by_qualified_name
            .insert(self.names.intern(&qualified), symbol);
        self.by_name.entry(info.name).or_insert(symbol);
        self.symbols.insert(symbol, info);
        symbol
    }

    /// Declare `qualified_name` with the given parameter names.
    ///
    /// Classes get the root as their base when the table has one.
    pub fn declare(&self, kind: SymbolKind, qualified_name: &str, params: &[&str]) -> TypeSymbol {
        let name = QualifiedName::parse(&self.names, qualified_name);
        let params = params.iter().map(|p| self.names.intern(p)).collect();
        let mut info = SymbolInfo::new(kind, name, params);
        if kind == SymbolKind::Class {
            info.base = self.root.map(TypeRef::simple);
        }
        self.register(info)
    }

    pub fn get(&self, symbol: TypeSymbol) -> Option<SymbolInfo> {
        self.symbols.get(&symbol).map(|r| r.clone())
    }

    pub fn contains(&self, symbol: TypeSymbol) -> bool {
        self.symbols.contains_key(&symbol)
    }

    pub fn kind(&self, symbol: TypeSymbol) -> Option<SymbolKind> {
        self.symbols.get(&symbol).map(|r| r.kind)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in allocation order.
    pub fn all_symbols(&self) -> Vec<TypeSymbol> {
        let mut all: Vec<TypeSymbol> = self.symbols.iter().map(|r| *r.key()).collect();
        all.sort_unstable();
        all
    }

    /// Find a declaration by qualified name, falling back to the bare name.
    /// A bare name shared by several declarations resolves to the first one.
    pub fn lookup(&self, name: &str) -> Option<TypeSymbol> {
        if let Some(atom) = self.names.get(name) {
            if let Some(symbol) = self.by_qualified_name.get(&atom) {
                return Some(*symbol);
            }
            if let Some(symbol) = self.by_name.get(&atom) {
                return Some(*symbol);
            }
        }
        None
    }

    /// Replace the base type. Used to wire declarations that reference each
    /// other after all of them have been registered.
    pub fn set_base(&self, symbol: TypeSymbol, base: Option<TypeRef>) {
        if let Some(mut entry) = self.symbols.get_mut(&symbol) {
            entry.base = base;
        }
    }

    /// Append a directly declared interface.
    pub fn add_interface(&self, symbol: TypeSymbol, interface: TypeRef) {
        if let Some(mut entry) = self.symbols.get_mut(&symbol) {
            entry.interfaces.push(interface);
        }
    }

    /// The placeholder for slot `index` of `owner`, if it exists.
    pub fn param(&self, owner: TypeSymbol, index: u32) -> Option<ParamRef> {
        let arity = self.symbols.get(&owner)?.arity();
        ((index as usize) < arity).then_some(ParamRef::new(owner, index))
    }

    /// Find a parameter of `owner` by its declared name.
    pub fn param_by_name(&self, owner: TypeSymbol, name: &str) -> Option<ParamRef> {
        let atom = self.names.get(name)?;
        let entry = self.symbols.get(&owner)?;
        let index = entry.type_params.iter().position(|p| *p == atom)?;
        Some(ParamRef::new(owner, index as u32))
    }

    /// Validate a reference against this table.
    pub fn check_type_ref(&self, ty: &TypeRef) -> Result<(), UnifyError> {
        validate_type_ref(self, ty)
    }

    pub fn name_of(&self, symbol: TypeSymbol) -> Option<Arc<str>> {
        let name = self.symbols.get(&symbol)?.name;
        Some(self.names.resolve(name))
    }

    pub fn namespace_of(&self, symbol: TypeSymbol) -> Option<Arc<str>> {
        let namespace = self.symbols.get(&symbol)?.namespace;
        Some(self.names.resolve(namespace))
    }

    pub fn param_name(&self, param: ParamRef) -> Option<Arc<str>> {
        let entry = self.symbols.get(&param.owner)?;
        let atom = *entry.type_params.get(param.index as usize)?;
        Some(self.names.resolve(atom))
    }

    /// Collect interfaces reachable from `ty` into `out`.
    ///
    /// The guard's visiting set holds the symbols currently being expanded,
    /// which stops declarations whose interfaces mention a deeper
    /// instantiation of themselves from expanding forever.
    fn collect_interfaces(
        &self,
        ty: &TypeRef,
        out: &mut Vec<TypeRef>,
        seen: &mut FxHashSet<TypeRef>,
        guard: &mut RecursionGuard<TypeSymbol>,
    ) -> Result<(), UnifyError> {
        let Some(info) = self.get(ty.symbol) else {
            return Ok(());
        };
        match guard.enter(ty.symbol) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return Ok(()),
            RecursionResult::DepthExceeded => {
                return Err(UnifyError::DepthExceeded {
                    depth: guard.max_depth(),
                });
            }
            RecursionResult::IterationExceeded => {
                return Err(UnifyError::IterationLimit {
                    iterations: guard.max_iterations(),
                });
            }
        }

        let result = self.collect_declared(ty, &info, out, seen, guard);
        guard.leave(&ty.symbol);
        result
    }

    fn collect_declared(
        &self,
        ty: &TypeRef,
        info: &SymbolInfo,
        out: &mut Vec<TypeRef>,
        seen: &mut FxHashSet<TypeRef>,
        guard: &mut RecursionGuard<TypeSymbol>,
    ) -> Result<(), UnifyError> {
        for declared in &info.interfaces {
            let interface = declared.substitute(ty.symbol, &ty.args);
            if seen.insert(interface.clone()) {
                out.push(interface.clone());
            }
            self.collect_interfaces(&interface, out, seen, guard)?;
        }
        if let Some(base) = &info.base {
            let base = base.substitute(ty.symbol, &ty.args);
            self.collect_interfaces(&base, out, seen, guard)?;
        }
        Ok(())
    }
}

impl TypeInfo for SymbolTable {
    fn arity(&self, symbol: TypeSymbol) -> Option<usize> {
        self.symbols.get(&symbol).map(|r| r.arity())
    }

    /// Unbounded flattening. Every expansion adds a distinct symbol to the
    /// active path, so the walk ends once the table's symbols run out.
    fn interfaces(&self, symbol: TypeSymbol) -> Vec<TypeRef> {
        let unbounded = RecursionProfile::Custom {
            max_depth: u32::MAX,
            max_iterations: u32::MAX,
        };
        self.interfaces_within(symbol, unbounded)
            .unwrap_or_default()
    }

    fn interfaces_within(
        &self,
        symbol: TypeSymbol,
        profile: RecursionProfile,
    ) -> Result<Vec<TypeRef>, UnifyError> {
        let Some(arity) = self.arity(symbol) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut guard = RecursionGuard::with_profile(profile);
        self.collect_interfaces(&TypeRef::open(symbol, arity), &mut out, &mut seen, &mut guard)?;
        Ok(out)
    }

    fn base_type(&self, symbol: TypeSymbol) -> Option<TypeRef> {
        self.symbols.get(&symbol).and_then(|r| r.base.clone())
    }

    fn is_root(&self, symbol: TypeSymbol) -> bool {
        self.symbols.get(&symbol).is_some_and(|r| r.is_root)
    }
}

#[cfg(test)]
#[path = "../tests/symbols_tests.rs"]
mod tests;
