//! Gateway façade over the pets store.
//!
//! # Responsibility
//! - Expose read/insert/update/delete keyed by resource identifier.
//! - Own the store connection, the router and the change notifier.
//!
//! # See also
//! - `crate::notify` for observer semantics.

pub mod cursor;
pub mod error;
pub mod pet_gateway;
