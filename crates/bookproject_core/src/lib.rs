//! Core domain logic for the book project reading list.
//! This crate is the single source of truth for book invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{bootstrap, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::author::Author;
pub use model::book::{ordinal_suffix, Book, BookValidationError};
pub use model::genre::Genre;
pub use model::identity::{EntityId, Identity, IdentityError};
pub use model::rating::RatingScale;
pub use model::shelf::{CustomShelf, PredefinedShelf, PredefinedShelfName};
pub use model::tag::Tag;
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
pub use repo::shelf_repo::{ShelfRepository, SqliteShelfRepository};
pub use repo::{RepoError, RepoResult};
pub use service::book_service::{BookService, BookServiceError, FinishedReading, NewBook};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
