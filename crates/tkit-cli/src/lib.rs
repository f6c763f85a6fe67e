//! Command-line front end for the tkit solver.
//!
//! Loads a type universe (a JSON declaration list, or the builtin core
//! library) into a [`tkit_solver::SymbolTable`] and answers queries over it:
//!
//! - `unify A B`: can `B` be treated as an `A`?
//! - `supertypes T`: the normalized supertype closure of `T`
//! - `show T`: a declaration's parameters, base and interfaces

pub mod args;
pub mod driver;
pub mod tracing_config;
pub mod type_expr;
pub mod universe;
