//! Supertype closure.
//!
//! Produces the flat list a unifier climbs when two references do not match
//! directly: every implemented interface (already flattened by the provider)
//! followed by the base-type chain, nearest ancestor first, stopping before
//! the universal root.
//!
//! Every entry is normalized: a generic supertype whose arguments are all
//! unbound placeholders is reported as its open definition, so
//! `MyList<T> : Enumerable<T>` yields `Enumerable<>` rather than an
//! `Enumerable` carrying `MyList`'s own `T`. Anything else keeps its
//! arguments as reported.
//!
//! The list is not deduplicated.

use crate::error::UnifyError;
use crate::provider::TypeInfo;
use crate::recursion::RecursionProfile;
use crate::types::{TypeRef, TypeSymbol};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Collapse a supertype whose arguments are all placeholders to its open
/// definition. Idempotent.
pub fn normalize_supertype(ty: TypeRef) -> TypeRef {
    if ty.has_only_params() {
        ty.generic_definition()
    } else {
        ty
    }
}

/// Supertypes of a declaration, viewed as its open definition.
///
/// Unknown symbols have no supertypes.
pub fn supertypes<P: TypeInfo + ?Sized>(
    provider: &P,
    symbol: TypeSymbol,
) -> Result<Vec<TypeRef>, UnifyError> {
    supertypes_with_profile(provider, symbol, RecursionProfile::SupertypeClosure)
}

/// [`supertypes`] under explicit limits.
pub fn supertypes_with_profile<P: TypeInfo + ?Sized>(
    provider: &P,
    symbol: TypeSymbol,
    profile: RecursionProfile,
) -> Result<Vec<TypeRef>, UnifyError> {
    let Some(arity) = provider.arity(symbol) else {
        return Ok(Vec::new());
    };
    supertypes_of_with_profile(provider, &TypeRef::open(symbol, arity), profile)
}

/// Supertypes of a possibly-constructed reference.
///
/// Interfaces and bases reported by the provider are instantiated with
/// `ty`'s arguments, so `Supertypes(MyList<Int32>)` contains
/// `Enumerable<Int32>`.
pub fn supertypes_of<P: TypeInfo + ?Sized>(
    provider: &P,
    ty: &TypeRef,
) -> Result<Vec<TypeRef>, UnifyError> {
    supertypes_of_with_profile(provider, ty, RecursionProfile::SupertypeClosure)
}

/// [`supertypes_of`] under explicit limits.
///
/// The profile's depth caps both the base-chain height and the nesting of
/// interface inheritance. Going past either is
/// [`UnifyError::DepthExceeded`]; nothing is silently dropped.
pub fn supertypes_of_with_profile<P: TypeInfo + ?Sized>(
    provider: &P,
    ty: &TypeRef,
    profile: RecursionProfile,
) -> Result<Vec<TypeRef>, UnifyError> {
    let mut result: Vec<TypeRef> = provider
        .interfaces_within(ty.symbol, profile)?
        .into_iter()
        .map(|interface| normalize_supertype(interface.substitute(ty.symbol, &ty.args)))
        .collect();
    let interface_count = result.len();

    let max_height = profile.max_depth() as usize;
    let mut visited: FxHashSet<TypeSymbol> = FxHashSet::default();
    visited.insert(ty.symbol);

    // Keep the un-normalized ancestor around: its arguments are what the
    // next level's placeholders are substituted with.
    let mut current = ty.clone();
    while let Some(base) = provider.base_type(current.symbol) {
        let base = base.substitute(current.symbol, &current.args);
        if provider.is_root(base.symbol) {
            break;
        }
        if !visited.insert(base.symbol) {
            return Err(UnifyError::InheritanceCycle(base.symbol));
        }
        if visited.len() > max_height {
            return Err(UnifyError::DepthExceeded {
                depth: profile.max_depth(),
            });
        }
        trace!(ancestor = %base, "supertypes_of: base");
        result.push(normalize_supertype(base.clone()));
        current = base;
    }

    debug!(
        ty = %ty,
        interfaces = interface_count,
        ancestors = result.len() - interface_count,
        "supertypes_of"
    );
    Ok(result)
}

#[cfg(test)]
#[path = "../tests/supertypes_tests.rs"]
mod tests;
