//! Generic-Aware Nominal Type Unification
//!
//! This crate answers one question over a nominal type system with generics:
//! can type reference `A` be treated as compatible with (an instance of, or
//! assignable to) type reference `B`?
//!
//! - **Data model** (`types`): `TypeSymbol` identities, `TypeRef` instantiations
//!   and `ParamRef` placeholders, all plain values with structural equality
//! - **Provider** (`provider`): the read-only `TypeInfo` seam that exposes arity,
//!   flattened interfaces and the base-type chain of a declaration
//! - **Symbol table** (`symbols`): a thread-safe in-process `TypeInfo` source
//! - **Supertype closure** (`supertypes`): normalized interfaces + base chain
//! - **Unification** (`unify`): the recursive case analysis over both
//! - **Recursion guard** (`recursion`): cycle, depth and work-budget limits
//!
//! Key properties:
//! - Pure and deterministic: no shared mutable state, safe to call in parallel
//! - Fails closed: runaway recursion becomes an explicit error, never a stack overflow

pub mod error;
pub mod format;
pub mod provider;
pub mod recursion;
pub mod supertypes;
pub mod symbols;
pub mod types;
pub mod unify;

#[cfg(test)]
mod test_fixtures;

pub use error::UnifyError;
pub use format::{TypeFormatter, TypeNames};
pub use provider::{TypeInfo, validate_type_ref};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use supertypes::{
    normalize_supertype, supertypes, supertypes_of, supertypes_of_with_profile,
    supertypes_with_profile,
};
pub use symbols::{SymbolInfo, SymbolKind, SymbolTable};
pub use types::{ParamRef, TypeArgument, TypeRef, TypeSymbol};
pub use unify::{Unification, Unifier, is_unifiable, unify};
