//! Type information provider abstraction.
//!
//! This trait isolates the supertype closure and the unifier from any
//! concrete metadata source (the in-process [`SymbolTable`], static analysis
//! output, a schema registry) so the algorithms never reach into storage
//! directly.
//!
//! Implementations must be read-only for the duration of a query. If the
//! implementation is also `Sync`, queries may run from any number of threads.
//!
//! [`SymbolTable`]: crate::SymbolTable

use crate::error::UnifyError;
use crate::recursion::RecursionProfile;
use crate::types::{TypeArgument, TypeRef, TypeSymbol};

/// Read-only reflection over declarations.
///
/// Interfaces and base types are expressed in terms of the declaring symbol's
/// own placeholders (`ParamRef { owner: symbol, .. }`); callers substitute
/// concrete arguments themselves.
pub trait TypeInfo {
    /// Number of generic parameters, or `None` for an unknown symbol.
    fn arity(&self, symbol: TypeSymbol) -> Option<usize>;

    /// Every interface the declaration implements, already flattened across
    /// the base-type chain and interface inheritance.
    fn interfaces(&self, symbol: TypeSymbol) -> Vec<TypeRef>;

    /// [`interfaces`](Self::interfaces), flattened within `profile`'s limits.
    ///
    /// Providers that flatten on demand override this and report
    /// [`UnifyError::DepthExceeded`] or [`UnifyError::IterationLimit`]
    /// instead of returning a truncated list. Providers holding a
    /// precomputed list keep the default.
    fn interfaces_within(
        &self,
        symbol: TypeSymbol,
        _profile: RecursionProfile,
    ) -> Result<Vec<TypeRef>, UnifyError> {
        Ok(self.interfaces(symbol))
    }

    /// Immediate base type. `None` for the universal root, interfaces and
    /// declarations without a base.
    fn base_type(&self, symbol: TypeSymbol) -> Option<TypeRef>;

    /// True for the universal root (e.g. `Object`), which the supertype
    /// closure never reports.
    fn is_root(&self, symbol: TypeSymbol) -> bool;

    fn generic_arguments<'t>(&self, ty: &'t TypeRef) -> &'t [TypeArgument] {
        ty.generic_arguments()
    }

    fn is_open_definition(&self, ty: &TypeRef) -> bool {
        ty.is_open_definition()
    }
}

/// Check that `ty` is well-formed against `provider`.
///
/// Every symbol in the argument tree must be known, every argument count
/// must equal its symbol's arity and every placeholder must name an existing
/// slot of its owner.
pub fn validate_type_ref<P: TypeInfo + ?Sized>(provider: &P, ty: &TypeRef) -> Result<(), UnifyError> {
    let arity = provider
        .arity(ty.symbol)
        .ok_or(UnifyError::UnknownSymbol(ty.symbol))?;
    if arity != ty.args.len() {
        return Err(UnifyError::ArityMismatch {
            symbol: ty.symbol,
            expected: arity,
            found: ty.args.len(),
        });
    }

    for arg in &ty.args {
        match arg {
            TypeArgument::Type(inner) => validate_type_ref(provider, inner)?,
            TypeArgument::Param(param) => {
                let owner_arity = provider
                    .arity(param.owner)
                    .ok_or(UnifyError::UnknownSymbol(param.owner))?;
                if param.index as usize >= owner_arity {
                    return Err(UnifyError::ParamOutOfRange {
                        owner: param.owner,
                        index: param.index,
                        arity: owner_arity,
                    });
                }
            }
        }
    }
    Ok(())
}
