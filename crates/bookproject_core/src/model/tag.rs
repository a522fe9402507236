//! Free-form labels attached to books.
//!
//! # Invariants
//! - Tag names are trimmed and lowercased on construction.
//! - Equality and ordering use the normalized name only, so a tag set cannot
//!   hold two tags with the same name.
//! - Decoding goes through the same normalization; a blank name is rejected.

use crate::model::book::BookValidationError;
use crate::model::identity::{EntityId, Identity, IdentityError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TagRecord")]
pub struct Tag {
    #[serde(rename = "id")]
    identity: Identity,
    name: String,
}

#[derive(Deserialize)]
struct TagRecord {
    id: Identity,
    name: String,
}

impl TryFrom<TagRecord> for Tag {
    type Error = BookValidationError;

    fn try_from(record: TagRecord) -> Result<Self, Self::Error> {
        let mut tag = Tag::new(&record.name).ok_or(BookValidationError::BlankTag)?;
        tag.identity = record.id;
        Ok(tag)
    }
}

impl Tag {
    /// Builds a tag from user input.
    ///
    /// Returns `None` when the value is blank after trimming.
    pub fn new(name: &str) -> Option<Self> {
        normalize_tag(name).map(|name| Self {
            identity: Identity::unassigned(),
            name,
        })
    }

    pub(crate) fn restore(id: EntityId, name: String) -> Self {
        Self {
            identity: Identity::assigned(id),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<EntityId> {
        self.identity.id()
    }

    /// Records the storage-assigned id. Fails if one is already set.
    pub fn assign_id(&mut self, id: EntityId) -> Result<(), IdentityError> {
        self.identity.assign(id)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Normalizes one tag value.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values, dropping blanks.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| normalize_tag(tag))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
