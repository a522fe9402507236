//! Shared identity value embedded in every persisted record.
//!
//! # Responsibility
//! - Hold the storage-assigned identifier of a record.
//! - Guard the "assigned once, never changed" lifecycle of that identifier.
//!
//! # Invariants
//! - A fresh record has no id until the storage layer assigns one.
//! - Once assigned, an id can never be replaced or cleared.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier assigned by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its canonical text form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value)
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for EntityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error raised when an identity would be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    AlreadyAssigned { current: EntityId },
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAssigned { current } => {
                write!(f, "identity already assigned: {current}")
            }
        }
    }
}

impl Error for IdentityError {}

/// Identity slot composed into domain records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity {
    id: Option<EntityId>,
}

impl Identity {
    /// Identity of a record that has not been stored yet.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Identity of a record loaded from storage.
    pub fn assigned(id: EntityId) -> Self {
        Self { id: Some(id) }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn is_assigned(&self) -> bool {
        self.id.is_some()
    }

    /// Records the storage-assigned id.
    ///
    /// # Errors
    /// - Returns `IdentityError::AlreadyAssigned` when an id is already present.
    pub fn assign(&mut self, id: EntityId) -> Result<(), IdentityError> {
        if let Some(current) = self.id {
            return Err(IdentityError::AlreadyAssigned { current });
        }
        self.id = Some(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityId, Identity, IdentityError};

    #[test]
    fn assign_sets_id_once() {
        let mut identity = Identity::unassigned();
        assert!(!identity.is_assigned());

        let first = EntityId::generate();
        identity.assign(first).unwrap();
        assert_eq!(identity.id(), Some(first));

        let err = identity.assign(EntityId::generate()).unwrap_err();
        assert_eq!(err, IdentityError::AlreadyAssigned { current: first });
        assert_eq!(identity.id(), Some(first));
    }

    #[test]
    fn parse_rejects_nil_and_garbage() {
        assert!(EntityId::parse("00000000-0000-0000-0000-000000000000").is_none());
        assert!(EntityId::parse("not-a-uuid").is_none());

        let id = EntityId::generate();
        assert_eq!(EntityId::parse(&id.to_string()), Some(id));
    }
}
