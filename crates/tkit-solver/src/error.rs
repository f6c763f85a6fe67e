//! Errors reported by validation, the supertype closure and unification.
//!
//! Only two kinds of failure exist: a malformed input (rejected before any
//! work starts) and a recursion limit hit while working. Neither carries a
//! partial result.

use crate::types::TypeSymbol;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    /// A reference's argument count disagrees with its symbol's arity.
    #[error("type {symbol} expects {expected} generic argument(s) but {found} were supplied")]
    ArityMismatch {
        symbol: TypeSymbol,
        expected: usize,
        found: usize,
    },

    /// The provider has no declaration for this symbol.
    #[error("type {0} is not known to the type information provider")]
    UnknownSymbol(TypeSymbol),

    /// A placeholder names a slot its owner does not have.
    #[error("generic parameter {index} of {owner} is out of range (arity {arity})")]
    ParamOutOfRange {
        owner: TypeSymbol,
        index: u32,
        arity: usize,
    },

    /// Nesting of unification calls, or the height of a hierarchy being
    /// walked, hit the configured ceiling.
    #[error("unification is too deep (limit {depth})")]
    DepthExceeded { depth: u32 },

    /// Total unification steps, or declarations visited while flattening
    /// interfaces, hit the configured budget.
    #[error("unification exceeded its budget of {iterations} steps")]
    IterationLimit { iterations: u32 },

    /// The provider reported a base-type chain that loops back on itself.
    #[error("inheritance cycle through type {0}")]
    InheritanceCycle(TypeSymbol),
}

impl UnifyError {
    /// Limit errors: the inputs were well-formed but the search gave up.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded { .. } | Self::IterationLimit { .. } | Self::InheritanceCycle(_)
        )
    }

    /// Contract violations in the inputs.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let arity = UnifyError::ArityMismatch {
            symbol: TypeSymbol(3),
            expected: 1,
            found: 0,
        };
        assert!(arity.is_contract_violation());
        assert!(UnifyError::UnknownSymbol(TypeSymbol(9)).is_contract_violation());
        assert!(UnifyError::DepthExceeded { depth: 64 }.is_limit());
        assert!(UnifyError::IterationLimit { iterations: 10 }.is_limit());
        assert!(UnifyError::InheritanceCycle(TypeSymbol(2)).is_limit());
    }

    #[test]
    fn test_messages_name_the_symbol() {
        let err = UnifyError::ParamOutOfRange {
            owner: TypeSymbol(4),
            index: 2,
            arity: 1,
        };
        assert_eq!(
            err.to_string(),
            "generic parameter 2 of #4 is out of range (arity 1)"
        );
        assert_eq!(
            UnifyError::DepthExceeded { depth: 16 }.to_string(),
            "unification is too deep (limit 16)"
        );
    }
}
