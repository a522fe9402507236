//! Shelf repository contract and SQLite implementation.
//!
//! # Invariants
//! - Predefined shelves are read-only; their rows are seeded by migrations.
//! - Custom shelf names are unique, compared case-insensitively.

use crate::db::schema::{self, CUSTOM_SHELVES, PREDEFINED_SHELVES};
use crate::model::identity::EntityId;
use crate::model::shelf::{CustomShelf, PredefinedShelf, PredefinedShelfName};
use crate::repo::{is_unique_violation, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait ShelfRepository {
    /// Returns the seeded shelf for `name`.
    fn get_predefined_shelf(&self, name: PredefinedShelfName) -> RepoResult<PredefinedShelf>;
    fn list_predefined_shelves(&self) -> RepoResult<Vec<PredefinedShelf>>;
    fn create_custom_shelf(&self, shelf: &mut CustomShelf) -> RepoResult<EntityId>;
    fn find_custom_shelf_by_name(&self, name: &str) -> RepoResult<Option<CustomShelf>>;
    fn list_custom_shelves(&self) -> RepoResult<Vec<CustomShelf>>;
}

pub struct SqliteShelfRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShelfRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        schema::verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ShelfRepository for SqliteShelfRepository<'_> {
    fn get_predefined_shelf(&self, name: PredefinedShelfName) -> RepoResult<PredefinedShelf> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE shelf_name = ?1;", PREDEFINED_SHELVES.select_sql()),
                [name.as_str()],
                read_shelf_columns,
            )
            .optional()?;
        match row {
            Some(columns) => into_predefined_shelf(columns),
            None => Err(RepoError::InvalidData(format!(
                "predefined shelf `{}` is not seeded",
                name.as_str()
            ))),
        }
    }

    fn list_predefined_shelves(&self) -> RepoResult<Vec<PredefinedShelf>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY shelf_name ASC;",
            PREDEFINED_SHELVES.select_sql()
        ))?;
        let rows = stmt.query_map([], read_shelf_columns)?;
        let mut shelves = Vec::new();
        for row in rows {
            shelves.push(into_predefined_shelf(row?)?);
        }
        shelves.sort_by_key(|shelf| shelf.shelf_name);
        Ok(shelves)
    }

    fn create_custom_shelf(&self, shelf: &mut CustomShelf) -> RepoResult<EntityId> {
        if let Some(id) = shelf.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }
        let name = shelf.shelf_name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::InvalidData(
                "custom shelf name must not be blank".to_string(),
            ));
        }

        let id = EntityId::generate();
        self.conn
            .execute(
                &CUSTOM_SHELVES.insert_sql(),
                params![id.to_string(), name.as_str()],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::Conflict(format!("custom shelf `{name}` already exists"))
                } else {
                    err.into()
                }
            })?;

        shelf.shelf_name = name;
        shelf.assign_id(id)?;
        Ok(id)
    }

    fn find_custom_shelf_by_name(&self, name: &str) -> RepoResult<Option<CustomShelf>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "{} WHERE shelf_name = ?1 COLLATE NOCASE;",
                    CUSTOM_SHELVES.select_sql()
                ),
                [name.trim()],
                read_shelf_columns,
            )
            .optional()?;
        row.map(into_custom_shelf).transpose()
    }

    fn list_custom_shelves(&self) -> RepoResult<Vec<CustomShelf>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY shelf_name COLLATE NOCASE ASC;",
            CUSTOM_SHELVES.select_sql()
        ))?;
        let rows = stmt.query_map([], read_shelf_columns)?;
        let mut shelves = Vec::new();
        for row in rows {
            shelves.push(into_custom_shelf(row?)?);
        }
        Ok(shelves)
    }
}

pub(crate) fn load_predefined_shelf(
    conn: &Connection,
    id: EntityId,
) -> RepoResult<Option<PredefinedShelf>> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1;", PREDEFINED_SHELVES.select_sql()),
            [id.to_string()],
            read_shelf_columns,
        )
        .optional()?;
    row.map(into_predefined_shelf).transpose()
}

pub(crate) fn load_custom_shelf(conn: &Connection, id: EntityId) -> RepoResult<Option<CustomShelf>> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1;", CUSTOM_SHELVES.select_sql()),
            [id.to_string()],
            read_shelf_columns,
        )
        .optional()?;
    row.map(into_custom_shelf).transpose()
}

type ShelfColumns = (String, String);

fn read_shelf_columns(row: &Row<'_>) -> rusqlite::Result<ShelfColumns> {
    Ok((row.get("id")?, row.get("shelf_name")?))
}

fn into_predefined_shelf((id, name): ShelfColumns) -> RepoResult<PredefinedShelf> {
    let shelf_name = PredefinedShelfName::parse(&name).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid shelf name `{name}` in predefined_shelves.shelf_name"
        ))
    })?;
    Ok(PredefinedShelf::restore(
        parse_id(&id, "predefined_shelves.id")?,
        shelf_name,
    ))
}

fn into_custom_shelf((id, shelf_name): ShelfColumns) -> RepoResult<CustomShelf> {
    Ok(CustomShelf::restore(
        parse_id(&id, "custom_shelves.id")?,
        shelf_name,
    ))
}
