//! Change notification for the pets collection.
//!
//! # Responsibility
//! - Let any number of observers learn that the collection or one item changed.
//! - Keep publishers decoupled from observers: publish never waits on them.

pub mod notifier;
