//! Structural routing of resource identifiers.
//!
//! # Invariants
//! - `content://<authority>/pets` routes to `Route::Collection`.
//! - `content://<authority>/pets/<decimal id>` routes to `Route::Item`.
//! - Everything else, including ids that overflow `i64`, is `Route::Unmatched`.

use crate::contract::{self, PATH_PETS, SCHEME};
use crate::model::pet::PetId;
use crate::resource::uri::ResourceUri;
use once_cell::sync::Lazy;
use regex::Regex;

static RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z][a-z0-9+.-]*)://([^/?#]+)/([^/?#]+)(?:/([0-9]+))?$")
        .expect("valid resource regex")
});

/// Classification of one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Collection,
    Item(PetId),
    Unmatched,
}

/// Coarse resource-type tag reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Collection,
    Item,
}

/// Router bound to one authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRouter {
    authority: String,
}

impl ResourceRouter {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Classifies `uri`.
    pub fn classify(&self, uri: &ResourceUri) -> Route {
        let Some(captures) = RESOURCE_RE.captures(uri.as_str()) else {
            return Route::Unmatched;
        };
        let shape_matches = &captures[1] == SCHEME
            && &captures[2] == self.authority.as_str()
            && &captures[3] == PATH_PETS;
        if !shape_matches {
            return Route::Unmatched;
        }
        match captures.get(4) {
            None => Route::Collection,
            Some(id) => id
                .as_str()
                .parse::<PetId>()
                .map_or(Route::Unmatched, Route::Item),
        }
    }

    pub fn collection_uri(&self) -> ResourceUri {
        ResourceUri::new(contract::collection_uri(&self.authority))
    }

    pub fn item_uri(&self, id: PetId) -> ResourceUri {
        self.collection_uri().with_appended_id(id)
    }

    /// MIME-style type tag for `resource_type`.
    pub fn mime_type(&self, resource_type: ResourceType) -> String {
        match resource_type {
            ResourceType::Collection => contract::collection_mime_type(&self.authority),
            ResourceType::Item => contract::item_mime_type(&self.authority),
        }
    }
}

impl Default for ResourceRouter {
    fn default() -> Self {
        Self::new(contract::DEFAULT_AUTHORITY)
    }
}

impl Route {
    pub fn resource_type(self) -> Option<ResourceType> {
        match self {
            Self::Collection => Some(ResourceType::Collection),
            Self::Item(_) => Some(ResourceType::Item),
            Self::Unmatched => None,
        }
    }
}
