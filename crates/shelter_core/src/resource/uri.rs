//! Opaque resource identifier.

use crate::model::pet::PetId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A resource identifier such as `content://org.shelter.pets/pets/3`.
///
/// Construction never fails; whether an identifier means anything is decided
/// by `ResourceRouter::classify`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUri(String);

impl ResourceUri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends `/<id>` to this identifier.
    pub fn with_appended_id(&self, id: PetId) -> Self {
        Self(format!("{}/{id}", self.0.trim_end_matches('/')))
    }
}

impl Display for ResourceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}
