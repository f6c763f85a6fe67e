//! Type references and generic placeholders.
//!
//! A [`TypeRef`] is a nominal [`TypeSymbol`] applied to an ordered argument
//! list. Each argument is either a concrete `TypeRef` or a [`ParamRef`]
//! placeholder naming an unbound generic slot by `(owner, index)`.
//!
//! Everything here is a plain value: equality and hashing are structural, so
//! two references built independently from different metadata sources compare
//! equal exactly when they denote the same instantiation.
//!
//! ## Open and closed references
//!
//! | Form | Arguments | Example |
//! |------|-----------|---------|
//! | Non-generic | none | `Int32` (both open and closed) |
//! | Open definition | `owner == symbol`, `index == position` for every slot | `List<>` |
//! | Closed | anything else | `List<Int32>`, `List<T>` where `T` belongs to `MyList` |

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TypeSymbol
// =============================================================================

/// Nominal identity of a declared class, interface, struct or primitive.
///
/// Independent of generic instantiation: `List<Int32>` and `List<>` share
/// the same `TypeSymbol`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeSymbol(pub u32);

impl TypeSymbol {
    /// Sentinel value for an unallocated symbol.
    pub const INVALID: Self = Self(0);

    /// First id handed out by a symbol table.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ParamRef
// =============================================================================

/// An unbound generic parameter slot: position `index` of `owner`'s
/// parameter list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamRef {
    pub owner: TypeSymbol,
    pub index: u32,
}

impl ParamRef {
    pub const fn new(owner: TypeSymbol, index: u32) -> Self {
        Self { owner, index }
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.owner, self.index)
    }
}

// =============================================================================
// TypeArgument
// =============================================================================

/// One slot of a generic argument list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeArgument {
    /// Unbound placeholder.
    Param(ParamRef),
    /// Fully resolved type (which may itself contain placeholders).
    Type(TypeRef),
}

impl TypeArgument {
    pub const fn param(owner: TypeSymbol, index: u32) -> Self {
        Self::Param(ParamRef::new(owner, index))
    }

    /// A concrete, non-generic argument.
    pub const fn simple(symbol: TypeSymbol) -> Self {
        Self::Type(TypeRef::simple(symbol))
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Type(ty) => Some(ty),
            Self::Param(_) => None,
        }
    }

    pub fn as_param(&self) -> Option<ParamRef> {
        match self {
            Self::Param(param) => Some(*param),
            Self::Type(_) => None,
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// Replace placeholders owned by `owner` with `replacements[index]`.
    ///
    /// Placeholders of other owners, and indices past the end of
    /// `replacements`, are left untouched.
    pub fn substitute(&self, owner: TypeSymbol, replacements: &[TypeArgument]) -> TypeArgument {
        match self {
            Self::Param(param) if param.owner == owner => replacements
                .get(param.index as usize)
                .cloned()
                .unwrap_or(Self::Param(*param)),
            Self::Param(param) => Self::Param(*param),
            Self::Type(ty) => Self::Type(ty.substitute(owner, replacements)),
        }
    }
}

impl From<TypeRef> for TypeArgument {
    fn from(ty: TypeRef) -> Self {
        Self::Type(ty)
    }
}

impl From<ParamRef> for TypeArgument {
    fn from(param: ParamRef) -> Self {
        Self::Param(param)
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(param) => param.fmt(f),
            Self::Type(ty) => ty.fmt(f),
        }
    }
}

// =============================================================================
// TypeRef
// =============================================================================

/// A symbol plus its generic argument list.
///
/// The argument count must equal the symbol's arity. `TypeRef` cannot check
/// that on its own; use [`validate_type_ref`](crate::validate_type_ref) against
/// a provider before handing references to the unifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub symbol: TypeSymbol,
    pub args: Vec<TypeArgument>,
}

impl TypeRef {
    /// A non-generic reference.
    pub const fn simple(symbol: TypeSymbol) -> Self {
        Self {
            symbol,
            args: Vec::new(),
        }
    }

    pub fn generic(symbol: TypeSymbol, args: impl IntoIterator<Item = TypeArgument>) -> Self {
        Self {
            symbol,
            args: args.into_iter().collect(),
        }
    }

    /// The open definition of `symbol`: every slot is its own placeholder.
    pub fn open(symbol: TypeSymbol, arity: usize) -> Self {
        Self {
            symbol,
            args: (0..arity as u32)
                .map(|index| TypeArgument::param(symbol, index))
                .collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// The argument list, empty for non-generic references.
    pub fn generic_arguments(&self) -> &[TypeArgument] {
        &self.args
    }

    /// True when every slot is the placeholder for that exact position of this
    /// exact symbol. Vacuously true for non-generic references.
    pub fn is_open_definition(&self) -> bool {
        self.args.iter().enumerate().all(|(position, arg)| {
            matches!(arg, TypeArgument::Param(p) if p.owner == self.symbol && p.index as usize == position)
        })
    }

    /// True for constructed references. Non-generic references are both open
    /// and closed.
    pub fn is_closed(&self) -> bool {
        !self.is_generic() || !self.is_open_definition()
    }

    /// True when the reference is generic and every argument is a placeholder,
    /// whichever declaration owns it.
    pub fn has_only_params(&self) -> bool {
        self.is_generic() && self.args.iter().all(TypeArgument::is_param)
    }

    /// True when a placeholder appears anywhere in the argument tree.
    pub fn contains_params(&self) -> bool {
        self.args.iter().any(|arg| match arg {
            TypeArgument::Param(_) => true,
            TypeArgument::Type(ty) => ty.contains_params(),
        })
    }

    /// The open definition of this reference's symbol. Non-generic references
    /// are their own definition.
    pub fn generic_definition(&self) -> TypeRef {
        Self::open(self.symbol, self.args.len())
    }

    /// Replace placeholders owned by `owner` throughout the argument tree.
    pub fn substitute(&self, owner: TypeSymbol, replacements: &[TypeArgument]) -> TypeRef {
        if self.args.is_empty() {
            return self.clone();
        }
        Self {
            symbol: self.symbol,
            args: self
                .args
                .iter()
                .map(|arg| arg.substitute(owner, replacements))
                .collect(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
