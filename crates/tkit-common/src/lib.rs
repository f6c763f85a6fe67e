//! Common types and utilities for the tkit generic type toolkit.
//!
//! This crate provides foundational types used across all tkit crates:
//! - Name interning (`Atom`, `NameInterner`) for declaration names and namespaces
//! - Qualified-name helpers (`QualifiedName`)

// Name interning for declaration names and namespaces
pub mod interner;
pub use interner::{Atom, NameInterner, QualifiedName};
