//! Pet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Execute filtered scans, inserts, updates and deletes on the `pets` table.
//! - Decode rows into `PetRow`, rejecting persisted state that breaks the model.
//!
//! # Invariants
//! - Column names in generated SQL come only from `Column`; caller input is
//!   limited to the selection clause and its bound arguments.
//! - Write requests are validated by the caller before reaching this layer.
//! - Selection clauses use anonymous `?` placeholders, bound after any `SET`
//!   values.

use crate::contract::{COLUMN_ID, TABLE_PETS};
use crate::db::DbError;
use crate::model::pet::{Column, Gender, Pet, PetId, PetValues};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The insert statement completed without creating a row.
    NothingInserted,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NothingInserted => write!(f, "insert did not create a row"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NothingInserted | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Caller-supplied row filter: a SQL boolean expression plus bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    clause: String,
    args: Vec<Value>,
}

impl Selection {
    pub fn new(clause: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// Exact-match predicate on the row id.
    pub fn by_id(id: PetId) -> Self {
        Self::new(format!("{COLUMN_ID} = ?"), vec![Value::Integer(id)])
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Read request options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetQuery {
    /// Columns to return; `None` returns every column.
    pub projection: Option<Vec<Column>>,
    /// Row filter. Ignored for item-scoped reads.
    pub selection: Option<Selection>,
    /// Sort keys in priority order; empty leaves store order.
    pub sort_order: Vec<SortOrder>,
}

impl PetQuery {
    pub fn columns(&self) -> &[Column] {
        match self.projection.as_deref() {
            Some(columns) if !columns.is_empty() => columns,
            _ => &Column::ALL,
        }
    }
}

/// One result row. Columns outside the projection are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetRow {
    pub id: Option<PetId>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub weight: Option<i64>,
}

impl PetRow {
    /// Converts to a full record; `None` unless id, name, gender and weight
    /// were all read.
    pub fn into_pet(self) -> Option<Pet> {
        Some(Pet {
            id: self.id?,
            name: self.name?,
            breed: self.breed,
            gender: self.gender?,
            weight: self.weight?,
        })
    }
}

/// Repository interface over the `pets` table.
pub trait PetRepository {
    fn query_pets(
        &self,
        columns: &[Column],
        selection: Option<&Selection>,
        sort_order: &[SortOrder],
    ) -> RepoResult<Vec<PetRow>>;
    fn insert_pet(&self, values: &PetValues) -> RepoResult<PetId>;
    fn update_pets(&self, values: &PetValues, selection: Option<&Selection>)
        -> RepoResult<usize>;
    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize>;
    fn count_pets(&self) -> RepoResult<u64>;
}

/// SQLite-backed pet repository. Works on a plain connection or inside a
/// transaction (via deref).
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn query_pets(
        &self,
        columns: &[Column],
        selection: Option<&Selection>,
        sort_order: &[SortOrder],
    ) -> RepoResult<Vec<PetRow>> {
        let column_list = columns
            .iter()
            .map(|column| column.name())
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {column_list} FROM {TABLE_PETS}");
        let mut bind_values: Vec<Value> = Vec::new();
        push_where(&mut sql, &mut bind_values, selection);

        if !sort_order.is_empty() {
            let keys = sort_order
                .iter()
                .map(|order| {
                    let direction = match order.direction {
                        SortDirection::Ascending => "ASC",
                        SortDirection::Descending => "DESC",
                    };
                    format!("{} {direction}", order.column.name())
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row, columns)?);
        }

        Ok(pets)
    }

    fn insert_pet(&self, values: &PetValues) -> RepoResult<PetId> {
        let (names, bind_values): (Vec<&str>, Vec<Value>) = values
            .iter()
            .map(|(field, value)| (field.name(), value.clone()))
            .unzip();

        let changed = if names.is_empty() {
            self.conn
                .execute(&format!("INSERT INTO {TABLE_PETS} DEFAULT VALUES;"), [])?
        } else {
            let placeholders = vec!["?"; names.len()].join(", ");
            self.conn.execute(
                &format!(
                    "INSERT INTO {TABLE_PETS} ({}) VALUES ({placeholders});",
                    names.join(", ")
                ),
                params_from_iter(bind_values),
            )?
        };

        if changed == 0 {
            return Err(RepoError::NothingInserted);
        }
        Ok(self.conn.last_insert_rowid())
    }

    fn update_pets(
        &self,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> RepoResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }

        let mut bind_values: Vec<Value> = Vec::with_capacity(values.len());
        let assignments = values
            .iter()
            .map(|(field, value)| {
                bind_values.push(value.clone());
                format!("{} = ?", field.name())
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {TABLE_PETS} SET {assignments}");
        push_where(&mut sql, &mut bind_values, selection);

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_PETS}");
        let mut bind_values: Vec<Value> = Vec::new();
        push_where(&mut sql, &mut bind_values, selection);

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn count_pets(&self) -> RepoResult<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE_PETS};"),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn push_where(sql: &mut String, bind_values: &mut Vec<Value>, selection: Option<&Selection>) {
    let Some(selection) = selection else {
        return;
    };
    if selection.clause().trim().is_empty() {
        return;
    }
    sql.push_str(" WHERE (");
    sql.push_str(selection.clause());
    sql.push(')');
    bind_values.extend(selection.args().iter().cloned());
}

fn parse_pet_row(row: &Row<'_>, columns: &[Column]) -> RepoResult<PetRow> {
    let mut pet = PetRow::default();
    for column in columns {
        let name = column.name();
        match column {
            Column::Id => pet.id = Some(row.get(name)?),
            Column::Name => pet.name = Some(row.get(name)?),
            Column::Breed => pet.breed = row.get(name)?,
            Column::Weight => pet.weight = Some(row.get(name)?),
            Column::Gender => {
                let code: i64 = row.get(name)?;
                let gender = Gender::from_code(code).ok_or_else(|| {
                    RepoError::InvalidData(format!("invalid gender `{code}` in pets.gender"))
                })?;
                pet.gender = Some(gender);
            }
        }
    }
    Ok(pet)
}
