//! Core Model Trait - Base definition for persisted entities
//!
//! Defines the Model trait with table metadata, primary key handling, the
//! serialization contract used for hydration, and the `default_scope` hook
//! that unscoped association loading bypasses.

use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::backends::DatabaseRow;
use crate::error::{ModelError, ModelResult};
use crate::query::QueryBuilder;

/// Core trait for persisted models
pub trait Model: Send + Sync + Debug + Serialize + for<'de> Deserialize<'de> {
    /// The type used for this model's primary key
    type PrimaryKey: Clone + Send + Sync + Debug + std::fmt::Display;

    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key field name
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// Get the primary key value for this model instance
    fn primary_key(&self) -> Option<Self::PrimaryKey>;

    /// Convert model to field-value pairs for key extraction and persistence
    fn to_fields(&self) -> HashMap<String, serde_json::Value>;

    /// Default query scope for this model.
    ///
    /// Every query executed through the builder passes through this hook
    /// unless the builder was marked `unscoped()`. The default is identity;
    /// models override it to constrain their visible record set, e.g.
    /// `query.where_eq("published", true)`.
    fn default_scope(query: QueryBuilder<Self>) -> QueryBuilder<Self>
    where
        Self: Sized,
    {
        query
    }

    /// Create a model instance from a database row
    fn from_row(row: &dyn DatabaseRow) -> ModelResult<Self>
    where
        Self: Sized,
    {
        let json = row.to_json()?;
        serde_json::from_value(json).map_err(|e| {
            ModelError::Serialization(format!(
                "failed to hydrate '{}' row: {}",
                Self::table_name(),
                e
            ))
        })
    }
}
