//! Write-request validation for pet records.
//!
//! # Invariants
//! - Insert requires `name` (non-empty after trim) and `gender` (a known code).
//! - Every supplied field obeys its rule on both insert and update.
//! - Validation never touches storage.

use crate::model::pet::{Gender, PetField, PetValues};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level rejection of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    /// Name missing, null, not text, or blank after trimming.
    InvalidName,
    /// Gender missing, not an integer, or outside the enumeration.
    InvalidGender,
    /// Weight null, not an integer, or negative.
    InvalidWeight,
    /// Breed supplied with a non-text value.
    InvalidBreed,
}

impl PetValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> PetField {
        match self {
            Self::InvalidName => PetField::Name,
            Self::InvalidGender => PetField::Gender,
            Self::InvalidWeight => PetField::Weight,
            Self::InvalidBreed => PetField::Breed,
        }
    }
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "pet requires a non-empty name"),
            Self::InvalidGender => write!(f, "pet requires a valid gender"),
            Self::InvalidWeight => write!(f, "pet weight must be a non-negative integer"),
            Self::InvalidBreed => write!(f, "pet breed must be text"),
        }
    }
}

impl Error for PetValidationError {}

/// Validates a complete new record.
///
/// An absent weight is accepted; the store supplies the default.
pub fn validate_for_insert(values: &PetValues) -> Result<(), PetValidationError> {
    if !values.contains(PetField::Name) {
        return Err(PetValidationError::InvalidName);
    }
    if !values.contains(PetField::Gender) {
        return Err(PetValidationError::InvalidGender);
    }
    validate_supplied(values)
}

/// Validates a partial update. Absent fields are not checked.
pub fn validate_for_update(values: &PetValues) -> Result<(), PetValidationError> {
    validate_supplied(values)
}

fn validate_supplied(values: &PetValues) -> Result<(), PetValidationError> {
    for (field, value) in values.iter() {
        check_field(field, value)?;
    }
    Ok(())
}

fn check_field(field: PetField, value: &Value) -> Result<(), PetValidationError> {
    match (field, value) {
        (PetField::Name, Value::Text(name)) if !name.trim().is_empty() => Ok(()),
        (PetField::Name, _) => Err(PetValidationError::InvalidName),
        (PetField::Gender, Value::Integer(code)) if Gender::from_code(*code).is_some() => Ok(()),
        (PetField::Gender, _) => Err(PetValidationError::InvalidGender),
        (PetField::Weight, Value::Integer(weight)) if *weight >= 0 => Ok(()),
        (PetField::Weight, _) => Err(PetValidationError::InvalidWeight),
        (PetField::Breed, Value::Text(_) | Value::Null) => Ok(()),
        (PetField::Breed, _) => Err(PetValidationError::InvalidBreed),
    }
}
