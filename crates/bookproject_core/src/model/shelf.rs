//! Shelf records a book can be organized on.
//!
//! # Invariants
//! - Predefined shelves form a closed set seeded by migrations.
//! - Custom shelf names are unique per library.

use crate::model::identity::{EntityId, Identity, IdentityError};
use serde::{Deserialize, Serialize};

/// Fixed reading-status categories provided by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedShelfName {
    ToRead,
    Reading,
    Read,
}

impl PredefinedShelfName {
    pub const ALL: [PredefinedShelfName; 3] = [Self::ToRead, Self::Reading, Self::Read];

    /// Stable storage text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to_read",
            Self::Reading => "reading",
            Self::Read => "read",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "to_read" => Some(Self::ToRead),
            "reading" => Some(Self::Reading),
            "read" => Some(Self::Read),
            _ => None,
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ToRead => "To Read",
            Self::Reading => "Reading",
            Self::Read => "Read",
        }
    }
}

/// System shelf row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredefinedShelf {
    #[serde(rename = "id")]
    identity: Identity,
    pub shelf_name: PredefinedShelfName,
}

impl PredefinedShelf {
    pub fn new(shelf_name: PredefinedShelfName) -> Self {
        Self {
            identity: Identity::unassigned(),
            shelf_name,
        }
    }

    pub(crate) fn restore(id: EntityId, shelf_name: PredefinedShelfName) -> Self {
        Self {
            identity: Identity::assigned(id),
            shelf_name,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.identity.id()
    }
}

/// User-defined shelf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomShelf {
    #[serde(rename = "id")]
    identity: Identity,
    pub shelf_name: String,
}

impl CustomShelf {
    pub fn new(shelf_name: impl Into<String>) -> Self {
        Self {
            identity: Identity::unassigned(),
            shelf_name: shelf_name.into(),
        }
    }

    pub(crate) fn restore(id: EntityId, shelf_name: String) -> Self {
        Self {
            identity: Identity::assigned(id),
            shelf_name,
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
