//! Type universe files.
//!
//! A universe is a JSON list of declarations:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Enumerable", "namespace": "Collections", "kind": "interface", "params": ["T"] },
//!     { "name": "MyList", "namespace": "Collections", "kind": "class", "params": ["T"],
//!       "interfaces": ["Enumerable<T>"] },
//!     { "name": "IntList", "kind": "class", "base": "MyList<Int32>" }
//!   ]
//! }
//! ```
//!
//! `base` and `interfaces` are type expressions (see [`crate::type_expr`])
//! in which the declaration's own parameters are in scope. Declarations may
//! refer to each other in any order. The universal root `System.Object` is
//! always present and is the base of every class that names none.

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tkit_solver::{
    RecursionProfile, SymbolKind, SymbolTable, TypeInfo, TypeSymbol, supertypes_with_profile,
};
use tracing::{debug, info};

use crate::type_expr::TypeExprParser;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseFile {
    pub types: Vec<TypeDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
}

impl TypeDecl {
    pub fn qualified_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Core library declarations, used when no universe file is given.
pub const CORE_UNIVERSE: &str = r#"{
  "types": [
    { "name": "Equatable", "namespace": "System", "kind": "interface", "params": ["T"] },
    { "name": "Comparable", "namespace": "System", "kind": "interface", "params": ["T"] },
    { "name": "Boolean", "namespace": "System", "kind": "primitive",
      "interfaces": ["Equatable<Boolean>"] },
    { "name": "Char", "namespace": "System", "kind": "primitive",
      "interfaces": ["Equatable<Char>", "Comparable<Char>"] },
    { "name": "Int32", "namespace": "System", "kind": "primitive",
      "interfaces": ["Equatable<Int32>", "Comparable<Int32>"] },
    { "name": "Int64", "namespace": "System", "kind": "primitive",
      "interfaces": ["Equatable<Int64>", "Comparable<Int64>"] },
    { "name": "String", "namespace": "System", "kind": "class",
      "interfaces": ["Equatable<String>", "Comparable<String>", "Enumerable<Char>"] },
    { "name": "Enumerable", "namespace": "System.Collections.Generic", "kind": "interface",
      "params": ["T"] },
    { "name": "Collection", "namespace": "System.Collections.Generic", "kind": "interface",
      "params": ["T"], "interfaces": ["Enumerable<T>"] },
    { "name": "ReadOnlyList", "namespace": "System.Collections.Generic", "kind": "interface",
      "params": ["T"], "interfaces": ["Enumerable<T>"] },
    { "name": "List", "namespace": "System.Collections.Generic", "kind": "class",
      "params": ["T"], "interfaces": ["Collection<T>", "ReadOnlyList<T>"] },
    { "name": "KeyValuePair", "namespace": "System.Collections.Generic", "kind": "struct",
      "params": ["TKey", "TValue"] },
    { "name": "Dictionary", "namespace": "System.Collections.Generic", "kind": "class",
      "params": ["TKey", "TValue"],
      "interfaces": ["Collection<KeyValuePair<TKey, TValue>>"] }
  ]
}"#;

/// Parse universe JSON and build its symbol table.
pub fn parse_universe(json: &str) -> Result<SymbolTable> {
    let file: UniverseFile = serde_json::from_str(json).context("invalid universe JSON")?;
    build_table(&file)
}

/// Read and build the universe at `path`.
pub fn load_universe(path: &Path) -> Result<SymbolTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read universe {}", path.display()))?;
    parse_universe(&json).with_context(|| format!("failed to load universe {}", path.display()))
}

/// The builtin [`CORE_UNIVERSE`].
pub fn core_universe() -> Result<SymbolTable> {
    parse_universe(CORE_UNIVERSE).context("builtin core universe is malformed")
}

/// Build a table in two passes: declare every type, then resolve bases and
/// interfaces once all names are known.
pub fn build_table(file: &UniverseFile) -> Result<SymbolTable> {
    let table = SymbolTable::with_root();
    let root_name = table
        .root()
        .and_then(|root| table.name_of(root).zip(table.namespace_of(root)))
        .map(|(name, namespace)| format!("{namespace}.{name}"))
        .unwrap_or_default();

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut declared: Vec<TypeSymbol> = Vec::with_capacity(file.types.len());
    for decl in &file.types {
        let qualified = decl.qualified_name();
        check_declaration(decl, &qualified)?;
        if qualified == root_name {
            bail!("`{qualified}` is the builtin root and cannot be redeclared");
        }
        if !seen.insert(qualified.clone()) {
            bail!("type `{qualified}` is declared more than once");
        }
        let params: Vec<&str> = decl.params.iter().map(String::as_str).collect();
        let symbol = table.declare(decl.kind, &qualified, &params);
        debug!(%symbol, name = %qualified, arity = params.len(), "declared");
        declared.push(symbol);
    }

    for (decl, &symbol) in file.types.iter().zip(&declared) {
        let qualified = decl.qualified_name();
        let parser = TypeExprParser::new(&table).with_scope(symbol);

        if let Some(base) = &decl.base {
            if decl.kind == SymbolKind::Interface {
                bail!("interface `{qualified}` cannot have a base type; list `{base}` under interfaces");
            }
            let base_ref = parser
                .parse(base)
                .with_context(|| format!("in the base type of `{qualified}`"))?;
            if table.kind(base_ref.symbol) == Some(SymbolKind::Interface) {
                bail!("`{qualified}` names interface `{base}` as its base type; list it under interfaces");
            }
            table.set_base(symbol, Some(base_ref));
        }

        for interface in &decl.interfaces {
            let interface_ref = parser
                .parse(interface)
                .with_context(|| format!("in the interfaces of `{qualified}`"))?;
            if table.kind(interface_ref.symbol) != Some(SymbolKind::Interface) {
                bail!("`{qualified}` lists `{interface}` as an interface, but it is not one");
            }
            table.add_interface(symbol, interface_ref);
        }
    }

    // An acyclic hierarchy is never taller than the table, so these walks
    // only fail on a cycle.
    let height = u32::try_from(table.len() + 1).unwrap_or(u32::MAX);
    let whole_table = RecursionProfile::Custom {
        max_depth: height,
        max_iterations: u32::MAX,
    };
    for (decl, &symbol) in file.types.iter().zip(&declared) {
        let qualified = decl.qualified_name();
        supertypes_with_profile(&table, symbol, whole_table)
            .with_context(|| format!("invalid inheritance for `{qualified}`"))?;
        if table.interfaces(symbol).iter().any(|i| i.symbol == symbol) {
            bail!("interface inheritance of `{qualified}` loops back to itself");
        }
    }

    info!(types = declared.len(), "universe loaded");
    Ok(table)
}

fn check_declaration(decl: &TypeDecl, qualified: &str) -> Result<()> {
    if !is_identifier(&decl.name) {
        bail!("`{}` is not a valid type name", decl.name);
    }
    if let Some(namespace) = &decl.namespace {
        if !namespace.is_empty() && !namespace.split('.').all(is_identifier) {
            bail!("`{namespace}` is not a valid namespace for `{}`", decl.name);
        }
    }
    let mut params: FxHashSet<&str> = FxHashSet::default();
    for param in &decl.params {
        if !is_identifier(param) {
            bail!("`{param}` is not a valid type parameter name in `{qualified}`");
        }
        if !params.insert(param.as_str()) {
            bail!("type parameter `{param}` appears twice in `{qualified}`");
        }
    }
    if decl.kind == SymbolKind::Primitive && !decl.params.is_empty() {
        bail!("primitive `{qualified}` cannot be generic");
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "../tests/universe_tests.rs"]
mod tests;
