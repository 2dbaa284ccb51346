//! Resource identifiers and their classification.
//!
//! # Responsibility
//! - Represent opaque resource identifiers for the pets collection.
//! - Classify identifiers structurally, without touching storage.

pub mod router;
pub mod uri;
