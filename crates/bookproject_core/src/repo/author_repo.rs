//! Author repository contract and SQLite implementation.

use crate::db::schema::{self, AUTHORS};
use crate::model::author::Author;
use crate::model::identity::EntityId;
use crate::repo::{is_unique_violation, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait AuthorRepository {
    /// Inserts an unsaved author and assigns its id.
    fn create_author(&self, author: &mut Author) -> RepoResult<EntityId>;
    fn get_author(&self, id: EntityId) -> RepoResult<Option<Author>>;
    /// Exact match on first and last name.
    fn find_author_by_name(&self, first_name: &str, last_name: &str)
        -> RepoResult<Option<Author>>;
}

pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        schema::verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &mut Author) -> RepoResult<EntityId> {
        if let Some(id) = author.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }

        let id = EntityId::generate();
        self.conn
            .execute(
                &AUTHORS.insert_sql(),
                params![
                    id.to_string(),
                    author.first_name.as_str(),
                    author.last_name.as_str()
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::Conflict(format!("author `{author}` already exists"))
                } else {
                    err.into()
                }
            })?;

        author.assign_id(id)?;
        Ok(id)
    }

    fn get_author(&self, id: EntityId) -> RepoResult<Option<Author>> {
        load_author(self.conn, id)
    }

    fn find_author_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Author>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "{} WHERE first_name = ?1 AND last_name = ?2;",
                    AUTHORS.select_sql()
                ),
                params![first_name, last_name],
                read_author_columns,
            )
            .optional()?;
        row.map(into_author).transpose()
    }
}

pub(crate) fn load_author(conn: &Connection, id: EntityId) -> RepoResult<Option<Author>> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1;", AUTHORS.select_sql()),
            [id.to_string()],
            read_author_columns,
        )
        .optional()?;
    row.map(into_author).transpose()
}

type AuthorColumns = (String, String, String);

fn read_author_columns(row: &Row<'_>) -> rusqlite::Result<AuthorColumns> {
    Ok((row.get("id")?, row.get("first_name")?, row.get("last_name")?))
}

fn into_author((id, first_name, last_name): AuthorColumns) -> RepoResult<Author> {
    Ok(Author::restore(
        parse_id(&id, "authors.id")?,
        first_name,
        last_name,
    ))
}
