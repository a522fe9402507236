//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per record type.
//! - Map records to rows through the declarations in `db::schema`.
//!
//! # Invariants
//! - Book writes call `Book::validate()` before any SQL mutation.
//! - Referenced records must already carry a storage id.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::book::BookValidationError;
use crate::model::identity::{EntityId, IdentityError};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;
pub mod shelf_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every record type.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    /// A create call received a record that already has an id.
    AlreadyPersisted(EntityId),
    /// A record references (or is) a record without a storage id.
    UnpersistedReference(&'static str),
    /// A unique name is already taken.
    Conflict(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::AlreadyPersisted(id) => write!(f, "record already persisted with id {id}"),
            Self::UnpersistedReference(what) => write!(f, "{what} has not been persisted yet"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
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

impl From<IdentityError> for RepoError {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::AlreadyAssigned { current } => Self::AlreadyPersisted(current),
        }
    }
}

pub(crate) fn parse_id(value: &str, column: &str) -> RepoResult<EntityId> {
    EntityId::parse(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid id `{value}` in {column}")))
}

pub(crate) fn parse_optional_id(value: Option<String>, column: &str) -> RepoResult<Option<EntityId>> {
    value.map(|text| parse_id(&text, column)).transpose()
}

pub(crate) fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

pub(crate) fn integer_value(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
