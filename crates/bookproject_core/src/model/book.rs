//! Book domain model.
//!
//! # Responsibility
//! - Hold the metadata of one entry in a reading list.
//! - Derive the display form of an edition from its number.
//!
//! # Invariants
//! - `title` must be non-empty before the record is persisted. Construction
//!   does not check it; the persistence boundary calls `validate()`.
//! - `edition` is only ever produced by `set_edition` (or restored verbatim
//!   from storage or a decoded record) and is never parsed back into a number.
//! - Decoding runs `validate()`, so a decoded book meets the same rules as a
//!   loaded one.
//! - `tags` take no part in equality or hashing.
//! - `date_finished_reading` is not checked against `date_started_reading`.

use crate::model::author::Author;
use crate::model::genre::Genre;
use crate::model::identity::{EntityId, Identity, IdentityError};
use crate::model::rating::RatingScale;
use crate::model::shelf::{CustomShelf, PredefinedShelf};
use crate::model::tag::Tag;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Validation failures for book records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    /// A tag name is blank after trimming.
    BlankTag,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title must not be empty"),
            Self::BlankTag => write!(f, "tag name must not be blank"),
        }
    }
}

impl Error for BookValidationError {}

/// One tracked book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BookRecord")]
pub struct Book {
    #[serde(rename = "id")]
    identity: Identity,
    title: String,
    number_of_pages: Option<u32>,
    pages_read: Option<u32>,
    genre: Option<Genre>,
    series_position: Option<i32>,
    edition: Option<String>,
    book_recommended_by: Option<String>,
    author: Author,
    predefined_shelf: Option<PredefinedShelf>,
    custom_shelf: Option<CustomShelf>,
    tags: BTreeSet<Tag>,
    rating: Option<RatingScale>,
    date_started_reading: Option<NaiveDate>,
    date_finished_reading: Option<NaiveDate>,
    book_review: Option<String>,
}

/// Wire shape of a `Book`; decoded fields are kept verbatim, like a row.
#[derive(Deserialize)]
struct BookRecord {
    id: Identity,
    title: String,
    number_of_pages: Option<u32>,
    pages_read: Option<u32>,
    genre: Option<Genre>,
    series_position: Option<i32>,
    edition: Option<String>,
    book_recommended_by: Option<String>,
    author: Author,
    predefined_shelf: Option<PredefinedShelf>,
    custom_shelf: Option<CustomShelf>,
    #[serde(default)]
    tags: BTreeSet<Tag>,
    rating: Option<RatingScale>,
    date_started_reading: Option<NaiveDate>,
    date_finished_reading: Option<NaiveDate>,
    book_review: Option<String>,
}

impl TryFrom<BookRecord> for Book {
    type Error = BookValidationError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let book = Self {
            identity: record.id,
            title: record.title,
            number_of_pages: record.number_of_pages,
            pages_read: record.pages_read,
            genre: record.genre,
            series_position: record.series_position,
            edition: record.edition,
            book_recommended_by: record.book_recommended_by,
            author: record.author,
            predefined_shelf: record.predefined_shelf,
            custom_shelf: record.custom_shelf,
            tags: record.tags,
            rating: record.rating,
            date_started_reading: record.date_started_reading,
            date_finished_reading: record.date_finished_reading,
            book_review: record.book_review,
        };
        book.validate()?;
        Ok(book)
    }
}

impl Book {
    /// Creates an unsaved book placed on `predefined_shelf`.
    ///
    /// Every other field starts empty.
    pub fn new(title: impl Into<String>, author: Author, predefined_shelf: PredefinedShelf) -> Self {
        let mut book = Self::without_shelf(title, author);
        book.predefined_shelf = Some(predefined_shelf);
        book
    }

    pub(crate) fn without_shelf(title: impl Into<String>, author: Author) -> Self {
        Self {
            identity: Identity::unassigned(),
            title: title.into(),
            number_of_pages: None,
            pages_read: None,
            genre: None,
            series_position: None,
            edition: None,
            book_recommended_by: None,
            author,
            predefined_shelf: None,
            custom_shelf: None,
            tags: BTreeSet::new(),
            rating: None,
            date_started_reading: None,
            date_finished_reading: None,
            book_review: None,
        }
    }

    /// Checks field invariants required before persistence.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Derives the edition label from an edition number.
    ///
    /// `None` leaves the current label untouched. The new label is the
    /// previously stored label followed by `" <suffix> edition"`, where the
    /// suffix depends only on the last decimal digit (`11` gives `st`).
    pub fn set_edition(&mut self, edition: Option<i32>) {
        let Some(edition) = edition else {
            return;
        };
        // TODO: prefix with `edition` itself instead of the stored label once
        // the intended label format ("2nd edition") is confirmed.
        let previous = self.edition.as_deref().unwrap_or_default();
        self.edition = Some(format!("{previous} {} edition", ordinal_suffix(edition)));
    }

    /// True when a strictly positive series position is set.
    pub fn series_position_exists(&self) -> bool {
        matches!(self.series_position, Some(position) if position > 0)
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn id(&self) -> Option<EntityId> {
        self.identity.id()
    }

    /// Records the storage-assigned id. Fails if one is already set.
    pub fn assign_id(&mut self, id: EntityId) -> Result<(), IdentityError> {
        self.identity.assign(id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn number_of_pages(&self) -> Option<u32> {
        self.number_of_pages
    }

    pub fn set_number_of_pages(&mut self, number_of_pages: Option<u32>) {
        self.number_of_pages = number_of_pages;
    }

    pub fn pages_read(&self) -> Option<u32> {
        self.pages_read
    }

    pub fn set_pages_read(&mut self, pages_read: Option<u32>) {
        self.pages_read = pages_read;
    }

    pub fn genre(&self) -> Option<Genre> {
        self.genre
    }

    pub fn set_genre(&mut self, genre: Option<Genre>) {
        self.genre = genre;
    }

    pub fn series_position(&self) -> Option<i32> {
        self.series_position
    }

    pub fn set_series_position(&mut self, series_position: Option<i32>) {
        self.series_position = series_position;
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    pub fn book_recommended_by(&self) -> Option<&str> {
        self.book_recommended_by.as_deref()
    }

    pub fn set_book_recommended_by(&mut self, book_recommended_by: Option<String>) {
        self.book_recommended_by = book_recommended_by;
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn set_author(&mut self, author: Author) {
        self.author = author;
    }

    pub fn predefined_shelf(&self) -> Option<&PredefinedShelf> {
        self.predefined_shelf.as_ref()
    }

    pub fn set_predefined_shelf(&mut self, predefined_shelf: Option<PredefinedShelf>) {
        self.predefined_shelf = predefined_shelf;
    }

    pub fn custom_shelf(&self) -> Option<&CustomShelf> {
        self.custom_shelf.as_ref()
    }

    pub fn set_custom_shelf(&mut self, custom_shelf: Option<CustomShelf>) {
        self.custom_shelf = custom_shelf;
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: BTreeSet<Tag>) {
        self.tags = tags;
    }

    /// Adds a tag; returns `false` when a tag with the same name exists.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    pub fn rating(&self) -> Option<RatingScale> {
        self.rating
    }

    pub fn set_rating(&mut self, rating: Option<RatingScale>) {
        self.rating = rating;
    }

    pub fn date_started_reading(&self) -> Option<NaiveDate> {
        self.date_started_reading
    }

    pub fn set_date_started_reading(&mut self, date: Option<NaiveDate>) {
        self.date_started_reading = date;
    }

    pub fn date_finished_reading(&self) -> Option<NaiveDate> {
        self.date_finished_reading
    }

    pub fn set_date_finished_reading(&mut self, date: Option<NaiveDate>) {
        self.date_finished_reading = date;
    }

    pub fn book_review(&self) -> Option<&str> {
        self.book_review.as_deref()
    }

    pub fn set_book_review(&mut self, book_review: Option<String>) {
        self.book_review = book_review;
    }

    pub(crate) fn restore_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub(crate) fn restore_edition(&mut self, edition: Option<String>) {
        self.edition = edition;
    }
}

/// English ordinal suffix chosen from the last decimal digit only.
///
/// Uses Rust's truncating remainder, so every negative number maps to `th`.
pub fn ordinal_suffix(number: i32) -> &'static str {
    match number % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.title == other.title
            && self.number_of_pages == other.number_of_pages
            && self.pages_read == other.pages_read
            && self.genre == other.genre
            && self.series_position == other.series_position
            && self.edition == other.edition
            && self.book_recommended_by == other.book_recommended_by
            && self.author == other.author
            && self.predefined_shelf == other.predefined_shelf
            && self.custom_shelf == other.custom_shelf
            && self.rating == other.rating
            && self.date_started_reading == other.date_started_reading
            && self.date_finished_reading == other.date_finished_reading
            && self.book_review == other.book_review
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.title.hash(state);
        self.number_of_pages.hash(state);
        self.pages_read.hash(state);
        self.genre.hash(state);
        self.series_position.hash(state);
        self.edition.hash(state);
        self.book_recommended_by.hash(state);
        self.author.hash(state);
        self.predefined_shelf.hash(state);
        self.custom_shelf.hash(state);
        self.rating.hash(state);
        self.date_started_reading.hash(state);
        self.date_finished_reading.hash(state);
        self.book_review.hash(state);
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Book{{title='{}'}}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::ordinal_suffix;

    #[test]
    fn suffix_ignores_teen_exception() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(11), "st");
        assert_eq!(ordinal_suffix(12), "nd");
        assert_eq!(ordinal_suffix(13), "rd");
        assert_eq!(ordinal_suffix(14), "th");
        assert_eq!(ordinal_suffix(20), "th");
    }

    #[test]
    fn suffix_for_negative_numbers_is_th() {
        assert_eq!(ordinal_suffix(-1), "th");
        assert_eq!(ordinal_suffix(-22), "th");
        assert_eq!(ordinal_suffix(i32::MIN), "th");
    }
}
