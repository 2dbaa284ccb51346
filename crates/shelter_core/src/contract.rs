//! Stable names shared by every layer of the pets store.
//!
//! # Responsibility
//! - Define the resource addressing constants (scheme, authority, path).
//! - Define table/column names and the gender codes persisted on disk.
//!
//! # Invariants
//! - Column names here are the only names ever interpolated into SQL.
//! - Gender codes are part of the persisted layout and must never be renumbered.

/// URI scheme used by every resource identifier.
pub const SCHEME: &str = "content";

/// Authority used when the configuration does not override it.
pub const DEFAULT_AUTHORITY: &str = "org.shelter.pets";

/// Path segment naming the pets collection.
pub const PATH_PETS: &str = "pets";

/// SQLite database file name used by file-backed stores.
pub const DATABASE_NAME: &str = "shelter.db";

/// Schema version shipped with this build.
pub const DATABASE_VERSION: u32 = 1;

/// The single table holding pet records.
pub const TABLE_PETS: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

const MIME_DIR_PREFIX: &str = "vnd.shelter.cursor.dir";
const MIME_ITEM_PREFIX: &str = "vnd.shelter.cursor.item";

/// Builds the collection identifier for `authority`.
///
/// Example: `content://org.shelter.pets/pets`.
pub fn collection_uri(authority: &str) -> String {
    format!("{SCHEME}://{authority}/{PATH_PETS}")
}

/// Type tag reported for collection identifiers.
pub fn collection_mime_type(authority: &str) -> String {
    format!("{MIME_DIR_PREFIX}/{authority}/{PATH_PETS}")
}

/// Type tag reported for single-item identifiers.
pub fn item_mime_type(authority: &str) -> String {
    format!("{MIME_ITEM_PREFIX}/{authority}/{PATH_PETS}")
}
