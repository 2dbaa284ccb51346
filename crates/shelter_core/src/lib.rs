//! Core record-access gateway for the shelter pets collection.
//! This crate is the single source of truth for pet record invariants.

pub mod config;
pub mod contract;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod resource;

pub use config::{ConfigError, DatabaseLocation, ShelterConfig};
pub use db::{DbError, SchemaManager, SchemaOutcome};
pub use gateway::cursor::PetCursor;
pub use gateway::error::{GatewayError, GatewayResult, Operation};
pub use gateway::pet_gateway::PetGateway;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pet::{Column, Gender, Pet, PetField, PetId, PetValues};
pub use model::validation::{validate_for_insert, validate_for_update, PetValidationError};
pub use notify::notifier::{
    ChangeNotification, ChangeNotifier, NotifyScope, Subscription, SubscriptionId,
};
pub use repo::pet_repo::{
    PetQuery, PetRepository, PetRow, RepoError, RepoResult, Selection, SortDirection, SortOrder,
    SqlitePetRepository,
};
pub use resource::router::{ResourceRouter, ResourceType, Route};
pub use resource::uri::ResourceUri;
pub use rusqlite::types::Value;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
