//! Record store access for the pets table.
//!
//! # Responsibility
//! - Isolate SQL generation and row decoding from gateway orchestration.
//!
//! # Invariants
//! - Repository APIs never validate write requests; the gateway does that
//!   before opening a write transaction.

pub mod pet_repo;
