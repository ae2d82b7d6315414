//! Association Kinds - The supported declaration cardinalities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines the kind of association between models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    /// Many-to-one relationship (the foreign key lives on the owner)
    BelongsTo,
    /// One-to-one relationship (the foreign key lives on the related model)
    HasOne,
    /// One-to-many relationship (the foreign key lives on the related model)
    HasMany,
}

impl AssociationKind {
    /// Returns true if this kind resolves to a collection of records
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany)
    }

    /// Returns true if this kind resolves to at most one record
    pub fn is_singular(self) -> bool {
        !self.is_collection()
    }

    /// Returns true if the foreign key is stored on the owning model
    pub fn foreign_key_on_owner(self) -> bool {
        matches!(self, Self::BelongsTo)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::BelongsTo => write!(f, "belongs_to"),
            AssociationKind::HasOne => write!(f, "has_one"),
            AssociationKind::HasMany => write!(f, "has_many"),
        }
    }
}
