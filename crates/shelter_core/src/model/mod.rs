//! Pet domain model and write validation.
//!
//! # Responsibility
//! - Define the pet record, its columns and the write-request mapping.
//! - Enforce per-field invariants before any write reaches storage.

pub mod pet;
pub mod validation;
