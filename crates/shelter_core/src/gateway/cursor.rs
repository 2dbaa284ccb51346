//! Read results handed back by the gateway.

use crate::model::pet::Pet;
use crate::repo::pet_repo::PetRow;

/// Forward-only, single-pass sequence of result rows.
///
/// Rows are loaded eagerly while the store lock is held, so a cursor never
/// observes a half-applied write. Re-issue the read to see later changes.
#[derive(Debug)]
pub struct PetCursor {
    rows: std::vec::IntoIter<PetRow>,
}

impl PetCursor {
    pub(crate) fn new(rows: Vec<PetRow>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Consumes the cursor, keeping only rows that carry a full record.
    pub fn into_pets(self) -> Vec<Pet> {
        self.rows.filter_map(PetRow::into_pet).collect()
    }
}

impl Iterator for PetCursor {
    type Item = PetRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PetCursor {}
