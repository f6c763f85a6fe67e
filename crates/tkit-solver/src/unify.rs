//! Generic-aware unification of nominal type references.
//!
//! `Unify(A, B)` decides whether `A` can be treated as compatible with `B`
//! (B "is an" A), accounting for open generic definitions, constructed
//! instantiations, interface implementation and inheritance.
//!
//! ## Rules
//!
//! The first applicable case wins:
//!
//! | # | Condition | Result |
//! |---|-----------|--------|
//! | 1 | same symbol, A open, B open | match |
//! | 2 | same symbol, A closed, B open | match, instantiation = A's arguments |
//! | 3 | same symbol, equal arity, every argument pair unifies | match |
//! | 4 | A's open definition unifies with some supertype of B's symbol | match |
//! | 5 | A unifies with some supertype of B itself | match |
//! | - | otherwise | no match |
//!
//! Only the outermost call's instantiation is reported; nested calls are
//! asked for a yes/no answer.
//!
//! Placeholders unify only with the identical placeholder and have no
//! supertypes, so a placeholder argument blocks matching at its position.
//!
//! ## Termination
//!
//! Each `(A, B)` pair is tracked by a [`RecursionGuard`]. Re-entering a pair
//! already on the stack is a cycle and answers "no match" for that branch.
//! Exceeding the profile's depth or step budget aborts the whole query with
//! [`UnifyError::DepthExceeded`] / [`UnifyError::IterationLimit`]. Supertype
//! walks run under [`RecursionProfile::closure`] of the same profile, so
//! custom limits also raise the hierarchy height a query accepts.

use crate::error::UnifyError;
use crate::provider::{TypeInfo, validate_type_ref};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::supertypes::{supertypes_of_with_profile, supertypes_with_profile};
use crate::types::{TypeArgument, TypeRef};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace, trace_span, warn};

// =============================================================================
// Unification result
// =============================================================================

/// Outcome of a unification query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Unification {
    pub matched: bool,
    /// The arguments of the closed left side, when it matched an open right
    /// side of the same symbol.
    pub instantiation: Option<Vec<TypeArgument>>,
}

impl Unification {
    pub const fn no_match() -> Self {
        Self {
            matched: false,
            instantiation: None,
        }
    }

    pub const fn matched() -> Self {
        Self {
            matched: true,
            instantiation: None,
        }
    }

    pub const fn instantiated(args: Vec<TypeArgument>) -> Self {
        Self {
            matched: true,
            instantiation: Some(args),
        }
    }

    #[inline]
    pub fn is_match(&self) -> bool {
        self.matched
    }
}

// =============================================================================
// Unifier
// =============================================================================

type PairKey = (TypeRef, TypeRef);

/// Stateful unifier over one provider.
///
/// The provider is only read. Results of finished sub-queries are memoized
/// for the lifetime of the unifier; since the provider cannot change
/// underneath it, a memoized answer is always the answer a fresh run would
/// give.
pub struct Unifier<'a, P: TypeInfo + ?Sized> {
    provider: &'a P,
    guard: RecursionGuard<PairKey>,
    /// Limits for the supertype walks, derived from the query profile.
    closure: RecursionProfile,
    memo: FxHashMap<PairKey, Unification>,
    /// Cycles cut so far. A negative answer computed while a cycle was cut
    /// depends on the path that reached it and is not memoized.
    cycles: u64,
}

impl<'a, P: TypeInfo + ?Sized> Unifier<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self::with_profile(provider, RecursionProfile::Unification)
    }

    pub fn with_profile(provider: &'a P, profile: RecursionProfile) -> Self {
        Self {
            provider,
            guard: RecursionGuard::with_profile(profile),
            closure: profile.closure(),
            memo: FxHashMap::default(),
            cycles: 0,
        }
    }

    /// Unify `a` against `b`.
    ///
    /// Both references are validated before any work starts; a malformed
    /// reference is a contract violation and is reported as such.
    pub fn unify(&mut self, a: &TypeRef, b: &TypeRef) -> Result<Unification, UnifyError> {
        validate_type_ref(self.provider, a)?;
        validate_type_ref(self.provider, b)?;

        let _span = trace_span!("unify", %a, %b).entered();
        self.guard.reset();
        let result = self.unify_refs(a, b);
        match &result {
            Ok(unification) => debug!(
                matched = unification.matched,
                instantiated = unification.instantiation.is_some(),
                steps = self.guard.iterations(),
                "unify"
            ),
            Err(err) => debug!(%err, steps = self.guard.iterations(), "unify aborted"),
        }
        result
    }

    fn unify_refs(&mut self, a: &TypeRef, b: &TypeRef) -> Result<Unification, UnifyError> {
        let key = (a.clone(), b.clone());
        if let Some(hit) = self.memo.get(&key) {
            return Ok(hit.clone());
        }

        match self.guard.enter(key.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(%a, %b, "cycle, no match on this path");
                self.cycles += 1;
                return Ok(Unification::no_match());
            }
            RecursionResult::DepthExceeded => {
                return Err(UnifyError::DepthExceeded {
                    depth: self.guard.max_depth(),
                });
            }
            RecursionResult::IterationExceeded => {
                return Err(UnifyError::IterationLimit {
                    iterations: self.guard.max_iterations(),
                });
            }
        }

        let cycles_before = self.cycles;
        let result = self.unify_cases(a, b);
        self.guard.leave(&key);
        let result = result?;

        if result.matched || self.cycles == cycles_before {
            self.memo.insert(key, result.clone());
        }
        Ok(result)
    }

    fn unify_cases(&mut self, a: &TypeRef, b: &TypeRef) -> Result<Unification, UnifyError> {
        let same_symbol = a.symbol == b.symbol;
        let a_open = self.provider.is_open_definition(a);
        let b_open = self.provider.is_open_definition(b);

        // Case 1: open/open identity
        if same_symbol && a_open && b_open {
            trace!(%a, %b, "case 1: open/open");
            return Ok(Unification::matched());
        }

        // Case 2: closed left against its own open definition
        if same_symbol && !a_open && b_open {
            trace!(%a, %b, "case 2: closed/open");
            return Ok(Unification::instantiated(
                self.provider.generic_arguments(a).to_vec(),
            ));
        }

        // Case 3: argument-wise
        if same_symbol && a.arity() == b.arity() && self.unify_arguments(a, b)? {
            trace!(%a, %b, "case 3: arguments");
            return Ok(Unification::matched());
        }

        // Case 4: A's definition against the supertypes of B's definition
        let definition = a.generic_definition();
        for supertype in supertypes_with_profile(self.provider, b.symbol, self.closure)? {
            if self.unify_refs(&definition, &supertype)?.matched {
                trace!(%a, %b, via = %supertype, "case 4: open supertype");
                return Ok(Unification::matched());
            }
        }

        // Case 5: A against the supertypes of B as given
        for supertype in supertypes_of_with_profile(self.provider, b, self.closure)? {
            if self.unify_refs(a, &supertype)?.matched {
                trace!(%a, %b, via = %supertype, "case 5: supertype");
                return Ok(Unification::matched());
            }
        }

        Ok(Unification::no_match())
    }

    fn unify_arguments(&mut self, a: &TypeRef, b: &TypeRef) -> Result<bool, UnifyError> {
        let provider = self.provider;
        let pairs = provider
            .generic_arguments(a)
            .iter()
            .zip(provider.generic_arguments(b));
        for (left, right) in pairs {
            let matched = match (left, right) {
                (TypeArgument::Param(p), TypeArgument::Param(q)) => p == q,
                (TypeArgument::Type(x), TypeArgument::Type(y)) => self.unify_refs(x, y)?.matched,
                _ => false,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// =============================================================================
// Convenience entry points
// =============================================================================

/// One-shot unification with the default profile.
pub fn unify<P: TypeInfo + ?Sized>(
    provider: &P,
    a: &TypeRef,
    b: &TypeRef,
) -> Result<Unification, UnifyError> {
    Unifier::new(provider).unify(a, b)
}

/// Boolean form of [`unify`] that fails closed: a malformed input or an
/// exhausted limit answers `false`.
pub fn is_unifiable<P: TypeInfo + ?Sized>(provider: &P, a: &TypeRef, b: &TypeRef) -> bool {
    match unify(provider, a, b) {
        Ok(unification) => unification.matched,
        Err(err) => {
            warn!(%a, %b, %err, "unification failed closed");
            false
        }
    }
}

#[cfg(test)]
#[path = "../tests/unify_tests.rs"]
mod tests;
