//! Gateway error taxonomy.

use crate::config::ConfigError;
use crate::db::DbError;
use crate::model::validation::PetValidationError;
use crate::repo::pet_repo::RepoError;
use crate::resource::uri::ResourceUri;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway operation name, used in `UnsupportedOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Every failure a gateway operation can surface. None is retried internally.
#[derive(Debug)]
pub enum GatewayError {
    /// The identifier does not name the collection or an item.
    UnknownResource(ResourceUri),
    /// The identifier routed, but not to a target this operation accepts.
    UnsupportedOperation {
        operation: Operation,
        uri: ResourceUri,
    },
    /// A write request broke a field invariant; nothing was written.
    Validation(PetValidationError),
    /// The store did not create the row.
    InsertFailed { uri: ResourceUri, source: RepoError },
    /// The configuration can never produce a working gateway.
    Config(ConfigError),
    /// The store could not be opened; the gateway is unusable.
    StorageUnavailable(DbError),
    /// Any other store failure while executing an operation.
    Repo(RepoError),
}

impl GatewayError {
    /// Short human-readable message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) => "That record could not be found.",
            Self::UnsupportedOperation { .. } => "That action is not supported here.",
            Self::Validation(PetValidationError::InvalidName) => "Pet requires a name.",
            Self::Validation(PetValidationError::InvalidGender) => "Pet requires a valid gender.",
            Self::Validation(PetValidationError::InvalidWeight) => {
                "Pet requires a valid weight."
            }
            Self::Validation(PetValidationError::InvalidBreed) => "Pet breed is not valid.",
            Self::InsertFailed { .. } => "Error with saving pet.",
            Self::Config(_) | Self::StorageUnavailable(_) => "Pet storage is unavailable.",
            Self::Repo(_) => "Error accessing pet storage.",
        }
    }

    /// Stable machine-readable code, used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) => "unknown_resource",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::Validation(PetValidationError::InvalidName) => "invalid_name",
            Self::Validation(PetValidationError::InvalidGender) => "invalid_gender",
            Self::Validation(PetValidationError::InvalidWeight) => "invalid_weight",
            Self::Validation(PetValidationError::InvalidBreed) => "invalid_breed",
            Self::InsertFailed { .. } => "insert_failed",
            Self::Config(_) => "invalid_config",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Repo(_) => "storage_error",
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownResource(uri) => write!(f, "unknown resource: {uri}"),
            Self::UnsupportedOperation { operation, uri } => {
                write!(f, "{operation} is not supported for {uri}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::InsertFailed { uri, source } => write!(f, "insert into {uri} failed: {source}"),
            Self::Config(err) => write!(f, "invalid gateway configuration: {err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InsertFailed { source, .. } => Some(source),
            Self::Config(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UnknownResource(_) | Self::UnsupportedOperation { .. } => None,
        }
    }
}

impl From<ConfigError> for GatewayError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<PetValidationError> for GatewayError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for GatewayError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}
