//! Domain model for the reading list.
//!
//! # Responsibility
//! - Define the records tracked by the application and their invariants.
//! - Stay free of storage concerns; table mapping lives in `db::schema`.
//!
//! # Invariants
//! - Every persisted record embeds an `Identity` assigned by storage.
//! - Equality is written per type instead of being inherited.

pub mod author;
pub mod book;
pub mod genre;
pub mod identity;
pub mod rating;
pub mod shelf;
pub mod tag;
