//! Human-readable names for type references.
//!
//! ```text
//! base_name(List<List<Int32>>)       = List
//! full_name(List<List<Int32>>)       = System.Collections.Generic.List
//! format(List<List<Int32>>)          = List<List<Int32>>
//! format(List<>)                     = List<T>
//! ```

use crate::symbols::SymbolTable;
use crate::types::{ParamRef, TypeArgument, TypeRef, TypeSymbol};
use std::sync::Arc;

/// Name lookups needed for rendering.
pub trait TypeNames {
    fn symbol_name(&self, symbol: TypeSymbol) -> Option<Arc<str>>;
    /// Dotted namespace, empty for the global namespace.
    fn symbol_namespace(&self, symbol: TypeSymbol) -> Option<Arc<str>>;
    fn param_name(&self, param: ParamRef) -> Option<Arc<str>>;
}

impl TypeNames for SymbolTable {
    fn symbol_name(&self, symbol: TypeSymbol) -> Option<Arc<str>> {
        self.name_of(symbol)
    }

    fn symbol_namespace(&self, symbol: TypeSymbol) -> Option<Arc<str>> {
        self.namespace_of(symbol)
    }

    fn param_name(&self, param: ParamRef) -> Option<Arc<str>> {
        SymbolTable::param_name(self, param)
    }
}

/// Renders references with angle-bracket generics.
pub struct TypeFormatter<'a, N: TypeNames + ?Sized> {
    names: &'a N,
    qualified: bool,
}

impl<'a, N: TypeNames + ?Sized> TypeFormatter<'a, N> {
    pub fn new(names: &'a N) -> Self {
        Self {
            names,
            qualified: false,
        }
    }

    /// Use namespace-qualified names throughout, arguments included.
    pub fn qualified(mut self, qualified: bool) -> Self {
        self.qualified = qualified;
        self
    }

    /// Declaration name without namespace or generic arguments.
    pub fn base_name(&self, symbol: TypeSymbol) -> String {
        match self.names.symbol_name(symbol) {
            Some(name) => name.to_string(),
            None => format!("<unknown {symbol}>"),
        }
    }

    /// Namespace-qualified declaration name without generic arguments.
    pub fn full_name(&self, symbol: TypeSymbol) -> String {
        let base = self.base_name(symbol);
        match self.names.symbol_namespace(symbol) {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}.{base}"),
            _ => base,
        }
    }

    pub fn format(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    pub fn format_argument(&self, arg: &TypeArgument) -> String {
        let mut out = String::new();
        self.write_argument(&mut out, arg);
        out
    }

    /// Comma-separated rendering of an argument list.
    pub fn format_arguments(&self, args: &[TypeArgument]) -> String {
        let mut out = String::new();
        self.write_list(&mut out, args);
        out
    }

    fn write_type(&self, out: &mut String, ty: &TypeRef) {
        if self.qualified {
            out.push_str(&self.full_name(ty.symbol));
        } else {
            out.push_str(&self.base_name(ty.symbol));
        }
        if ty.is_generic() {
            out.push('<');
            self.write_list(out, &ty.args);
            out.push('>');
        }
    }

    fn write_list(&self, out: &mut String, args: &[TypeArgument]) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_argument(out, arg);
        }
    }

    fn write_argument(&self, out: &mut String, arg: &TypeArgument) {
        match arg {
            TypeArgument::Type(ty) => self.write_type(out, ty),
            TypeArgument::Param(param) => match self.names.param_name(*param) {
                Some(name) => out.push_str(&name),
                None => out.push_str(&param.to_string()),
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
