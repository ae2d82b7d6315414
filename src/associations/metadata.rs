//! Association Metadata - Immutable declaration-time records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::query::{QueryOperator, WhereCondition};

use super::types::AssociationKind;

/// Declaration-time filter applied on top of an association query.
///
/// The counterpart of an inline scope on the declaration; conditions are
/// appended to every load of the association, scoped or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    conditions: Vec<WhereCondition>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain to rows where the column equals the value
    pub fn where_eq<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::Equal,
            value: Some(value.into()),
            values: Vec::new(),
        });
        self
    }

    /// Constrain to rows where the column does not equal the value
    pub fn where_ne<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::NotEqual,
            value: Some(value.into()),
            values: Vec::new(),
        });
        self
    }

    /// Constrain to rows where the column is one of the values
    pub fn where_in<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The scope's conditions
    pub fn conditions(&self) -> &[WhereCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Association metadata containing everything an accessor needs to load.
///
/// Created once at declaration time and immutable afterwards; the registry
/// hands it out behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationMetadata {
    /// The kind of association
    pub kind: AssociationKind,

    /// Name of the association (accessor name on the owner)
    pub name: String,

    /// The related model's table name
    pub related_table: String,

    /// The related model's type name
    pub related_model: String,

    /// Foreign key column (on the owner for belongs_to, on the related
    /// table otherwise)
    pub foreign_key: String,

    /// Local key matched against the foreign key (defaults to "id")
    pub local_key: String,

    /// Declaration-time filter conditions
    pub scope: Scope,

    /// Whether accessors load with the related model's default scope
    /// suppressed
    pub unscoped: bool,
}

impl AssociationMetadata {
    /// Create a new AssociationMetadata instance
    pub fn new(
        kind: AssociationKind,
        name: String,
        related_table: String,
        related_model: String,
        foreign_key: String,
    ) -> Self {
        Self {
            kind,
            name,
            related_table,
            related_model,
            foreign_key,
            local_key: "id".to_string(),
            scope: Scope::default(),
            unscoped: false,
        }
    }

    /// Set the local key
    pub fn with_local_key(mut self, local_key: String) -> Self {
        self.local_key = local_key;
        self
    }

    /// Set the declaration scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Register the association as unscoped
    pub fn with_unscoped(mut self, unscoped: bool) -> Self {
        self.unscoped = unscoped;
        self
    }

    /// Validate the metadata for consistency
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::Configuration(
                "Association name cannot be empty".to_string(),
            ));
        }

        if self.related_table.is_empty() {
            return Err(ModelError::Configuration(format!(
                "Association '{}' must specify a related table",
                self.name
            )));
        }

        if self.foreign_key.is_empty() {
            return Err(ModelError::Configuration(format!(
                "Association '{}' must specify a foreign key",
                self.name
            )));
        }

        if self.local_key.is_empty() {
            return Err(ModelError::Configuration(format!(
                "Association '{}' must specify a local key",
                self.name
            )));
        }

        Ok(())
    }
}
