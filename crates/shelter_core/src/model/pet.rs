//! Pet record model and write-request mapping.
//!
//! # Responsibility
//! - Define the canonical `Pet` record and its `Gender` enumeration.
//! - Model write requests as a field → value mapping with explicit presence.
//!
//! # Invariants
//! - `PetId` is assigned by the store and never supplied by callers; the
//!   writable field set (`PetField`) has no id member.
//! - A field absent from `PetValues` is distinct from one present as `Null`
//!   or as an empty string.

use crate::contract::{
    COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT, GENDER_FEMALE,
    GENDER_MALE, GENDER_UNKNOWN,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store-assigned row id.
pub type PetId = i64;

/// Gender enumeration persisted as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Returns the persisted integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    /// Maps a persisted code back to the enum; any other integer is `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }
}

/// One stored pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

/// Readable columns of the pets table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Name,
        Column::Breed,
        Column::Gender,
        Column::Weight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_NAME,
            Self::Breed => COLUMN_BREED,
            Self::Gender => COLUMN_GENDER,
            Self::Weight => COLUMN_WEIGHT,
        }
    }
}

/// Caller-writable fields. The id is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PetField {
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetField {
    pub fn column(self) -> Column {
        match self {
            Self::Name => Column::Name,
            Self::Breed => Column::Breed,
            Self::Gender => Column::Gender,
            Self::Weight => Column::Weight,
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }
}

/// Write request: the set of fields an insert or update supplies.
///
/// Values are raw SQLite values so callers can express wrong-typed or null
/// input; the validator decides what is acceptable per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetValues {
    values: BTreeMap<PetField, Value>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.with(PetField::Name, Value::Text(name.into()))
    }

    /// Sets the breed; `None` stores SQL `NULL`.
    pub fn breed(self, breed: Option<&str>) -> Self {
        let value = breed.map_or(Value::Null, |breed| Value::Text(breed.to_string()));
        self.with(PetField::Breed, value)
    }

    pub fn gender(self, gender: Gender) -> Self {
        self.gender_code(gender.code())
    }

    /// Sets the raw gender code, including codes outside the enumeration.
    pub fn gender_code(self, code: i64) -> Self {
        self.with(PetField::Gender, Value::Integer(code))
    }

    pub fn weight(self, weight: i64) -> Self {
        self.with(PetField::Weight, Value::Integer(weight))
    }

    /// Builder form of `put`.
    pub fn with(mut self, field: PetField, value: Value) -> Self {
        self.put(field, value);
        self
    }

    /// Sets `field` to `value`, replacing any earlier value.
    pub fn put(&mut self, field: PetField, value: Value) {
        self.values.insert(field, value);
    }

    pub fn remove(&mut self, field: PetField) -> Option<Value> {
        self.values.remove(&field)
    }

    pub fn get(&self, field: PetField) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: PetField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Supplied fields in stable column order.
    pub fn iter(&self) -> impl Iterator<Item = (PetField, &Value)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

impl From<&Pet> for PetValues {
    fn from(pet: &Pet) -> Self {
        PetValues::new()
            .name(pet.name.clone())
            .breed(pet.breed.as_deref())
            .gender(pet.gender)
            .weight(pet.weight)
    }
}
