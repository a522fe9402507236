//! Author record referenced by books.

use crate::model::identity::{EntityId, Identity, IdentityError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Person credited for a book. Many books may share one author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "id")]
    identity: Identity,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            identity: Identity::unassigned(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Splits a display name on its last whitespace into first/last parts.
    ///
    /// A single word is treated as the last name.
    pub fn from_full_name(full_name: &str) -> Self {
        let trimmed = full_name.trim();
        match trimmed.rsplit_once(char::is_whitespace) {
            Some((first, last)) => Self::new(first.trim(), last.trim()),
            None => Self::new("", trimmed),
        }
    }

    pub(crate) fn restore(id: EntityId, first_name: String, last_name: String) -> Self {
        Self {
            identity: Identity::assigned(id),
            first_name,
            last_name,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.identity.id()
    }

    /// Records the storage-assigned id. Fails if one is already set.
    pub fn assign_id(&mut self, id: EntityId) -> Result<(), IdentityError> {
        self.identity.assign(id)
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.first_name.is_empty() {
            write!(f, "{}", self.last_name)
        } else {
            write!(f, "{} {}", self.first_name, self.last_name)
        }
    }
}
