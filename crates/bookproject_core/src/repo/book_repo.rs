//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist `Book` rows together with their `book_tag` links.
//! - Rebuild full `Book` values, including author, shelves and tags.
//!
//! # Invariants
//! - Row writes and tag-link replacement happen in one transaction.
//! - Tag names are normalized through `Tag::new` before they are written;
//!   a blank name fails the whole write.
//! - Read paths reject unknown enum text instead of masking it.

use crate::db::schema::{self, BOOKS, BOOK_TAG};
use crate::model::book::{Book, BookValidationError};
use crate::model::genre::Genre;
use crate::model::identity::{EntityId, Identity};
use crate::model::rating::RatingScale;
use crate::model::shelf::PredefinedShelfName;
use crate::model::tag::Tag;
use crate::repo::author_repo::load_author;
use crate::repo::shelf_repo::{load_custom_shelf, load_predefined_shelf};
use crate::repo::{
    integer_value, parse_id, parse_optional_id, text_value, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

/// Query options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListQuery {
    pub predefined_shelf: Option<PredefinedShelfName>,
    pub custom_shelf: Option<EntityId>,
    /// Exact, case-insensitive tag name.
    pub tag: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for book persistence.
pub trait BookRepository {
    /// Inserts an unsaved book, assigns its id and persists its tags.
    fn create_book(&self, book: &mut Book) -> RepoResult<EntityId>;
    /// Overwrites every column and the tag set of a stored book.
    fn update_book(&self, book: &mut Book) -> RepoResult<()>;
    fn get_book(&self, id: EntityId) -> RepoResult<Option<Book>>;
    /// Lists books ordered by `title COLLATE NOCASE ASC, id ASC`.
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>>;
    /// Replaces all tags for one book. Names are trimmed, lowercased and
    /// deduplicated; a blank name is a validation error.
    fn set_book_tags(&self, id: EntityId, tags: &[String]) -> RepoResult<()>;
    fn delete_book(&self, id: EntityId) -> RepoResult<()>;
    /// Returns every known tag name, sorted.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        schema::verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &mut Book) -> RepoResult<EntityId> {
        book.validate()?;
        if let Some(id) = book.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }

        let id = EntityId::generate();
        let row = book_row_values(id, book)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&BOOKS.insert_sql(), params_from_iter(row))?;
        let tags = write_tag_links(&tx, id, tag_names(book))?;
        tx.commit()?;

        book.assign_id(id)?;
        book.set_tags(tags);
        Ok(id)
    }

    fn update_book(&self, book: &mut Book) -> RepoResult<()> {
        book.validate()?;
        let id = book.id().ok_or(RepoError::UnpersistedReference("book"))?;
        let row = book_row_values(id, book)?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(&BOOKS.update_sql(), params_from_iter(row))?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "book", id });
        }
        tx.execute(&BOOK_TAG.delete_for_owner_sql(), [id.to_string()])?;
        let tags = write_tag_links(&tx, id, tag_names(book))?;
        tx.commit()?;

        book.set_tags(tags);
        Ok(())
    }

    fn get_book(&self, id: EntityId) -> RepoResult<Option<Book>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1;", BOOKS.select_sql()),
                [id.to_string()],
                read_book_columns,
            )
            .optional()?;
        match row {
            Some(columns) => Ok(Some(self.assemble(columns)?)),
            None => Ok(None),
        }
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let mut sql = format!("{} WHERE 1 = 1", BOOKS.select_sql());
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(shelf) = query.predefined_shelf {
            sql.push_str(
                " AND predefined_shelf_id = (
                    SELECT id FROM predefined_shelves WHERE shelf_name = ?
                )",
            );
            bind_values.push(Value::Text(shelf.as_str().to_string()));
        }

        if let Some(shelf_id) = query.custom_shelf {
            sql.push_str(" AND custom_shelf_id = ?");
            bind_values.push(Value::Text(shelf_id.to_string()));
        }

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM book_tag bt
                    INNER JOIN tags t ON t.id = bt.tag_id
                    WHERE bt.book_id = books.id
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.trim().to_string()));
        }

        sql.push_str(" ORDER BY title COLLATE NOCASE ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            let columns = read_book_columns(row)?;
            books.push(self.assemble(columns)?);
        }
        Ok(books)
    }

    fn set_book_tags(&self, id: EntityId, tags: &[String]) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound { entity: "book", id });
        }

        tx.execute(&BOOK_TAG.delete_for_owner_sql(), [id_text.as_str()])?;
        write_tag_links(&tx, id, tags.iter().map(String::as_str))?;
        tx.execute(
            "UPDATE books SET updated_at = (strftime('%s', 'now') * 1000) WHERE id = ?1;",
            [id_text.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_book(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&BOOKS.delete_sql(), [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "book", id });
        }
        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get::<_, String>(0)?);
        }
        Ok(tags)
    }
}

impl SqliteBookRepository<'_> {
    fn assemble(&self, columns: BookColumns) -> RepoResult<Book> {
        let id = parse_id(&columns.id, "books.id")?;
        let author_id = parse_id(&columns.author_id, "books.author_id")?;
        let author = load_author(self.conn, author_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("book {id} references missing author {author_id}"))
        })?;

        let mut book = Book::without_shelf(columns.title, author);
        book.restore_identity(Identity::assigned(id));

        if let Some(shelf_id) =
            parse_optional_id(columns.predefined_shelf_id, "books.predefined_shelf_id")?
        {
            let shelf = load_predefined_shelf(self.conn, shelf_id)?.ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "book {id} references missing predefined shelf {shelf_id}"
                ))
            })?;
            book.set_predefined_shelf(Some(shelf));
        }
        if let Some(shelf_id) = parse_optional_id(columns.custom_shelf_id, "books.custom_shelf_id")?
        {
            let shelf = load_custom_shelf(self.conn, shelf_id)?.ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "book {id} references missing custom shelf {shelf_id}"
                ))
            })?;
            book.set_custom_shelf(Some(shelf));
        }

        book.set_number_of_pages(columns.number_of_pages);
        book.set_pages_read(columns.pages_read);
        book.set_genre(parse_genre(columns.genre)?);
        book.set_series_position(columns.series_position);
        book.restore_edition(columns.edition);
        book.set_book_recommended_by(columns.book_recommended_by);
        book.set_rating(parse_rating(columns.rating)?);
        book.set_date_started_reading(columns.date_started_reading);
        book.set_date_finished_reading(columns.date_finished_reading);
        book.set_book_review(columns.book_review);
        book.set_tags(load_tags_for_book(self.conn, id)?);

        book.validate()?;
        Ok(book)
    }
}

struct BookColumns {
    id: String,
    title: String,
    number_of_pages: Option<u32>,
    pages_read: Option<u32>,
    genre: Option<String>,
    series_position: Option<i32>,
    edition: Option<String>,
    book_recommended_by: Option<String>,
    author_id: String,
    predefined_shelf_id: Option<String>,
    custom_shelf_id: Option<String>,
    rating: Option<String>,
    date_started_reading: Option<NaiveDate>,
    date_finished_reading: Option<NaiveDate>,
    book_review: Option<String>,
}

fn read_book_columns(row: &Row<'_>) -> rusqlite::Result<BookColumns> {
    Ok(BookColumns {
        id: row.get("id")?,
        title: row.get("title")?,
        number_of_pages: row.get("number_of_pages")?,
        pages_read: row.get("pages_read")?,
        genre: row.get("genre")?,
        series_position: row.get("series_position")?,
        edition: row.get("edition")?,
        book_recommended_by: row.get("book_recommended_by")?,
        author_id: row.get("author_id")?,
        predefined_shelf_id: row.get("predefined_shelf_id")?,
        custom_shelf_id: row.get("custom_shelf_id")?,
        rating: row.get("rating")?,
        date_started_reading: row.get("date_started_reading")?,
        date_finished_reading: row.get("date_finished_reading")?,
        book_review: row.get("book_review")?,
    })
}

/// Binds every `BOOKS` column in declaration order.
fn book_row_values(id: EntityId, book: &Book) -> RepoResult<Vec<Value>> {
    let author_id = book
        .author()
        .id()
        .ok_or(RepoError::UnpersistedReference("author"))?;
    let predefined_shelf_id = match book.predefined_shelf() {
        Some(shelf) => Some(
            shelf
                .id()
                .ok_or(RepoError::UnpersistedReference("predefined shelf"))?,
        ),
        None => None,
    };
    let custom_shelf_id = match book.custom_shelf() {
        Some(shelf) => Some(
            shelf
                .id()
                .ok_or(RepoError::UnpersistedReference("custom shelf"))?,
        ),
        None => None,
    };

    Ok(vec![
        Value::Text(id.to_string()),
        Value::Text(book.title().to_string()),
        integer_value(book.number_of_pages().map(i64::from)),
        integer_value(book.pages_read().map(i64::from)),
        text_value(book.genre().map(Genre::as_str)),
        integer_value(book.series_position().map(i64::from)),
        text_value(book.edition()),
        text_value(book.book_recommended_by()),
        Value::Text(author_id.to_string()),
        text_value(predefined_shelf_id.map(|id| id.to_string()).as_deref()),
        text_value(custom_shelf_id.map(|id| id.to_string()).as_deref()),
        text_value(book.rating().map(RatingScale::as_str)),
        text_value(format_date(book.date_started_reading()).as_deref()),
        text_value(format_date(book.date_finished_reading()).as_deref()),
        text_value(book.book_review()),
    ])
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|value| value.format("%Y-%m-%d").to_string())
}

fn tag_names(book: &Book) -> Vec<String> {
    book.tags().iter().map(|tag| tag.name().to_string()).collect()
}

/// Normalizes `names`, creates missing tags and links each one to `book_id`.
fn write_tag_links<S: AsRef<str>>(
    conn: &Connection,
    book_id: EntityId,
    names: impl IntoIterator<Item = S>,
) -> RepoResult<BTreeSet<Tag>> {
    let tags = names
        .into_iter()
        .map(|name| Tag::new(name.as_ref()).ok_or(BookValidationError::BlankTag))
        .collect::<Result<BTreeSet<_>, _>>()?;

    let book_id_text = book_id.to_string();
    let mut linked = BTreeSet::new();
    for mut tag in tags {
        conn.execute(
            "INSERT OR IGNORE INTO tags (id, name) VALUES (?1, ?2);",
            params![EntityId::generate().to_string(), tag.name()],
        )?;
        let tag_id_text: String = conn.query_row(
            "SELECT id FROM tags WHERE name = ?1 COLLATE NOCASE;",
            [tag.name()],
            |row| row.get(0),
        )?;
        conn.execute(
            &BOOK_TAG.insert_sql(),
            params![book_id_text.as_str(), tag_id_text.as_str()],
        )?;
        tag.assign_id(parse_id(&tag_id_text, "tags.id")?)?;
        linked.insert(tag);
    }
    Ok(linked)
}

fn load_tags_for_book(conn: &Connection, book_id: EntityId) -> RepoResult<BTreeSet<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM book_tag bt
         INNER JOIN tags t ON t.id = bt.tag_id
         WHERE bt.book_id = ?1;",
    )?;
    let mut rows = stmt.query([book_id.to_string()])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get(0)?;
        let name: String = row.get(1)?;
        tags.insert(Tag::restore(parse_id(&id_text, "tags.id")?, name));
    }
    Ok(tags)
}

fn parse_genre(value: Option<String>) -> RepoResult<Option<Genre>> {
    value
        .map(|text| {
            Genre::parse(&text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid genre `{text}` in books.genre"))
            })
        })
        .transpose()
}

fn parse_rating(value: Option<String>) -> RepoResult<Option<RatingScale>> {
    value
        .map(|text| {
            RatingScale::parse(&text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid rating `{text}` in books.rating"))
            })
        })
        .transpose()
}
