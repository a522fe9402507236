//! Reading-list use-case service.
//!
//! # Responsibility
//! - Turn user-level requests (add a book, move it, finish it) into entity
//!   mutations and repository calls.
//! - Resolve authors and shelves so books only reference stored records.
//!
//! # Invariants
//! - Entity fields are changed through `Book` mutators only, so derived
//!   fields (edition) keep their rules.
//! - Tag names are normalized to lowercase and deduplicated.
//! - Finished dates are stored as given; no ordering check against the
//!   start date is applied.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::genre::Genre;
use crate::model::identity::EntityId;
use crate::model::rating::RatingScale;
use crate::model::shelf::{CustomShelf, PredefinedShelfName};
use crate::model::tag::{normalize_tag, normalize_tags, Tag};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
use crate::repo::shelf_repo::{ShelfRepository, SqliteShelfRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for reading-list use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// Author name is blank after trim.
    InvalidAuthor,
    /// Tag input contains a blank value.
    InvalidTag(String),
    /// Target book does not exist.
    BookNotFound(EntityId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAuthor => write!(f, "author name must not be blank"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity: "book", id } => Self::BookNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for adding a book to the reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    /// Full display name; split into first/last on the last space.
    pub author_name: String,
    pub shelf: PredefinedShelfName,
    /// Raw edition number, formatted by `Book::set_edition`.
    pub edition: Option<i32>,
    pub number_of_pages: Option<u32>,
    pub genre: Option<Genre>,
    pub series_position: Option<i32>,
    pub book_recommended_by: Option<String>,
    pub tags: Vec<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author_name: impl Into<String>,
        shelf: PredefinedShelfName,
    ) -> Self {
        Self {
            title: title.into(),
            author_name: author_name.into(),
            shelf,
            edition: None,
            number_of_pages: None,
            genre: None,
            series_position: None,
            book_recommended_by: None,
            tags: Vec::new(),
        }
    }
}

/// Data recorded when a book is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedReading {
    pub finished_on: NaiveDate,
    pub rating: Option<RatingScale>,
    pub review: Option<String>,
}

/// Reading-list service facade over repository implementations.
pub struct BookService<B, A, S> {
    books: B,
    authors: A,
    shelves: S,
}

impl<'conn>
    BookService<
        SqliteBookRepository<'conn>,
        SqliteAuthorRepository<'conn>,
        SqliteShelfRepository<'conn>,
    >
{
    /// Builds a service whose repositories share one migrated connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteBookRepository::try_new(conn)?,
            SqliteAuthorRepository::try_new(conn)?,
            SqliteShelfRepository::try_new(conn)?,
        ))
    }
}

impl<B, A, S> BookService<B, A, S>
where
    B: BookRepository,
    A: AuthorRepository,
    S: ShelfRepository,
{
    pub fn new(books: B, authors: A, shelves: S) -> Self {
        Self {
            books,
            authors,
            shelves,
        }
    }

    /// Adds a book, creating its author on first use.
    pub fn add_book(&self, request: NewBook) -> Result<Book, BookServiceError> {
        let tags = validated_tags(&request.tags)?;
        let author = self.resolve_author(&request.author_name)?;
        let shelf = self.shelves.get_predefined_shelf(request.shelf)?;

        let mut book = Book::new(request.title, author, shelf);
        book.set_edition(request.edition);
        book.set_number_of_pages(request.number_of_pages);
        book.set_genre(request.genre);
        book.set_series_position(request.series_position);
        book.set_book_recommended_by(request.book_recommended_by);
        for name in tags {
            if let Some(tag) = Tag::new(&name) {
                book.add_tag(tag);
            }
        }

        let id = self.books.create_book(&mut book).inspect_err(|err| {
            warn!("event=book_create module=service status=error error={err}");
        })?;
        info!(
            "event=book_create module=service status=ok shelf={} tag_count={}",
            request.shelf.as_str(),
            book.tags().len()
        );
        self.read_back(id, "created book not found in read-back")
    }

    pub fn get_book(&self, id: EntityId) -> RepoResult<Option<Book>> {
        self.books.get_book(id)
    }

    /// Lists books on one predefined shelf, ordered by title.
    pub fn list_shelf(&self, shelf: PredefinedShelfName) -> RepoResult<Vec<Book>> {
        self.books.list_books(&BookListQuery {
            predefined_shelf: Some(shelf),
            ..BookListQuery::default()
        })
    }

    pub fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let mut query = query.clone();
        query.tag = query.tag.and_then(|tag| normalize_tag(&tag));
        self.books.list_books(&query)
    }

    /// Moves a book to another predefined shelf.
    pub fn move_to_shelf(
        &self,
        id: EntityId,
        shelf: PredefinedShelfName,
    ) -> Result<Book, BookServiceError> {
        let shelf = self.shelves.get_predefined_shelf(shelf)?;
        self.modify(id, |book| book.set_predefined_shelf(Some(shelf)))
    }

    /// Places a book on a custom shelf, creating the shelf on first use.
    pub fn put_on_custom_shelf(
        &self,
        id: EntityId,
        shelf_name: &str,
    ) -> Result<Book, BookServiceError> {
        let shelf = match self.shelves.find_custom_shelf_by_name(shelf_name)? {
            Some(shelf) => shelf,
            None => {
                let mut shelf = CustomShelf::new(shelf_name);
                self.shelves.create_custom_shelf(&mut shelf)?;
                shelf
            }
        };
        self.modify(id, |book| book.set_custom_shelf(Some(shelf)))
    }

    /// Moves a book to `Reading` and records the start date.
    pub fn start_reading(
        &self,
        id: EntityId,
        started_on: NaiveDate,
    ) -> Result<Book, BookServiceError> {
        let shelf = self.shelves.get_predefined_shelf(PredefinedShelfName::Reading)?;
        self.modify(id, |book| {
            book.set_predefined_shelf(Some(shelf));
            book.set_date_started_reading(Some(started_on));
        })
    }

    pub fn record_progress(&self, id: EntityId, pages_read: u32) -> Result<Book, BookServiceError> {
        self.modify(id, |book| book.set_pages_read(Some(pages_read)))
    }

    /// Moves a book to `Read` and stores the finish date, rating and review.
    pub fn finish_reading(
        &self,
        id: EntityId,
        finished: FinishedReading,
    ) -> Result<Book, BookServiceError> {
        let shelf = self.shelves.get_predefined_shelf(PredefinedShelfName::Read)?;
        self.modify(id, |book| {
            book.set_predefined_shelf(Some(shelf));
            book.set_date_finished_reading(Some(finished.finished_on));
            book.set_rating(finished.rating);
            book.set_book_review(finished.review);
        })
    }

    /// Atomically replaces the full tag set for one book.
    pub fn set_tags(&self, id: EntityId, tags: Vec<String>) -> Result<Book, BookServiceError> {
        let normalized = validated_tags(&tags)?;
        self.books.set_book_tags(id, &normalized)?;
        self.read_back(id, "book missing after tag replacement")
    }

    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.books.list_tags()
    }

    pub fn delete_book(&self, id: EntityId) -> Result<(), BookServiceError> {
        self.books.delete_book(id)?;
        info!("event=book_delete module=service status=ok");
        Ok(())
    }

    fn resolve_author(&self, full_name: &str) -> Result<Author, BookServiceError> {
        let mut author = Author::from_full_name(full_name);
        if author.last_name.is_empty() {
            return Err(BookServiceError::InvalidAuthor);
        }
        if let Some(existing) = self
            .authors
            .find_author_by_name(&author.first_name, &author.last_name)?
        {
            return Ok(existing);
        }
        self.authors.create_author(&mut author)?;
        Ok(author)
    }

    fn modify(
        &self,
        id: EntityId,
        change: impl FnOnce(&mut Book),
    ) -> Result<Book, BookServiceError> {
        let mut book = self
            .books
            .get_book(id)?
            .ok_or(BookServiceError::BookNotFound(id))?;
        change(&mut book);
        self.books.update_book(&mut book)?;
        Ok(book)
    }

    fn read_back(&self, id: EntityId, details: &'static str) -> Result<Book, BookServiceError> {
        self.books
            .get_book(id)?
            .ok_or(BookServiceError::InconsistentState(details))
    }
}

fn validated_tags(tags: &[String]) -> Result<Vec<String>, BookServiceError> {
    if let Some(blank) = tags.iter().find(|tag| tag.trim().is_empty()) {
        return Err(BookServiceError::InvalidTag(blank.clone()));
    }
    Ok(normalize_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::{validated_tags, BookServiceError};

    #[test]
    fn validated_tags_rejects_blank_values() {
        let err = validated_tags(&["ok".to_string(), " ".to_string()]).unwrap_err();
        assert!(matches!(err, BookServiceError::InvalidTag(value) if value == " "));
    }

    #[test]
    fn validated_tags_normalizes_and_dedups() {
        let tags = validated_tags(&["Sci-Fi".to_string(), "sci-fi ".to_string()]).unwrap();
        assert_eq!(tags, vec!["sci-fi".to_string()]);
    }
}
