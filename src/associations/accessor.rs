//! Association Accessors - Loading with per-instance memoization
//!
//! Each accessor owns its owner instance, the association metadata, and a
//! single cache slot. `get` returns the cached value unless `force_reload`
//! is passed; a load executes with the related model's default scope
//! suppressed when the association was declared unscoped.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::backends::Database;
use crate::error::{AssociationError, ModelResult};
use crate::model::Model;
use crate::query::QueryBuilder;

use super::metadata::AssociationMetadata;
use super::types::AssociationKind;

/// Non-null field value used as the key side of the association condition
fn field_value(fields: &HashMap<String, Value>, key: &str) -> Option<Value> {
    fields.get(key).filter(|value| !value.is_null()).cloned()
}

fn expect_kind(metadata: &AssociationMetadata, expected: AssociationKind) -> ModelResult<()> {
    if metadata.kind != expected {
        return Err(AssociationError::InvalidConfiguration(format!(
            "association '{}' is declared as {}, not {}",
            metadata.name, metadata.kind, expected
        ))
        .into());
    }
    Ok(())
}

/// Build the association query for the related model: key condition plus
/// declaration-scope conditions, unscoped when the metadata says so
fn association_query<R: Model>(
    metadata: &AssociationMetadata,
    key_column: &str,
    key_value: Value,
) -> QueryBuilder<R> {
    let mut query = QueryBuilder::new()
        .from(&metadata.related_table)
        .where_eq(key_column, key_value);

    for condition in metadata.scope.conditions() {
        query = query.where_condition(condition.clone());
    }

    if metadata.unscoped {
        query = query.unscoped();
    }

    query
}

/// BelongsTo accessor - the owner holds the foreign key
#[derive(Debug)]
pub struct BelongsToAssociation<O, R>
where
    O: Model,
    R: Model,
{
    owner: O,
    metadata: Arc<AssociationMetadata>,
    parent: Option<R>,
    loaded: bool,
}

impl<O, R> BelongsToAssociation<O, R>
where
    O: Model,
    R: Model,
{
    /// Create an accessor for a belongs_to declaration
    pub fn new(owner: O, metadata: Arc<AssociationMetadata>) -> ModelResult<Self> {
        expect_kind(&metadata, AssociationKind::BelongsTo)?;
        Ok(Self {
            owner,
            metadata,
            parent: None,
            loaded: false,
        })
    }

    /// The owning model instance
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// The association metadata
    pub fn metadata(&self) -> &AssociationMetadata {
        &self.metadata
    }

    /// Whether the cache slot is populated
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cached parent, if any load has happened
    pub fn cached(&self) -> Option<&R> {
        if self.loaded {
            self.parent.as_ref()
        } else {
            None
        }
    }

    /// Clear the cache slot
    pub fn reset(&mut self) {
        self.parent = None;
        self.loaded = false;
    }

    /// The owner's foreign key value, if present and non-null
    pub fn foreign_key_value(&self) -> Option<Value> {
        field_value(&self.owner.to_fields(), &self.metadata.foreign_key)
    }

    /// Build the query this accessor executes on load
    pub fn query(&self) -> QueryBuilder<R> {
        let key_value = self.foreign_key_value().unwrap_or(Value::Null);
        association_query(&self.metadata, &self.metadata.local_key, key_value)
    }

    /// Return the parent, loading it on first access or when
    /// `force_reload` is set
    pub async fn get(&mut self, db: &dyn Database, force_reload: bool) -> ModelResult<Option<&R>> {
        if !force_reload && self.loaded {
            tracing::debug!(
                "association '{}' resolved from instance cache",
                self.metadata.name
            );
            return Ok(self.parent.as_ref());
        }

        self.parent = match self.foreign_key_value() {
            Some(_) => {
                tracing::debug!(
                    "loading association '{}' (unscoped: {})",
                    self.metadata.name,
                    self.metadata.unscoped
                );
                self.query().first(db).await?
            }
            None => None,
        };
        self.loaded = true;
        Ok(self.parent.as_ref())
    }
}

/// HasOne accessor - the related model holds the foreign key
#[derive(Debug)]
pub struct HasOneAssociation<O, R>
where
    O: Model,
    R: Model,
{
    owner: O,
    metadata: Arc<AssociationMetadata>,
    related: Option<R>,
    loaded: bool,
}

impl<O, R> HasOneAssociation<O, R>
where
    O: Model,
    R: Model,
{
    /// Create an accessor for a has_one declaration
    pub fn new(owner: O, metadata: Arc<AssociationMetadata>) -> ModelResult<Self> {
        expect_kind(&metadata, AssociationKind::HasOne)?;
        Ok(Self {
            owner,
            metadata,
            related: None,
            loaded: false,
        })
    }

    /// The owning model instance
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// The association metadata
    pub fn metadata(&self) -> &AssociationMetadata {
        &self.metadata
    }

    /// Whether the cache slot is populated
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cached record, if any load has happened
    pub fn cached(&self) -> Option<&R> {
        if self.loaded {
            self.related.as_ref()
        } else {
            None
        }
    }

    /// Clear the cache slot
    pub fn reset(&mut self) {
        self.related = None;
        self.loaded = false;
    }

    fn owner_key_value(&self) -> Option<Value> {
        field_value(&self.owner.to_fields(), &self.metadata.local_key)
    }

    /// Build the query this accessor executes on load
    pub fn query(&self) -> QueryBuilder<R> {
        let key_value = self.owner_key_value().unwrap_or(Value::Null);
        association_query(&self.metadata, &self.metadata.foreign_key, key_value)
    }

    /// Return the record, loading it on first access or when
    /// `force_reload` is set
    pub async fn get(&mut self, db: &dyn Database, force_reload: bool) -> ModelResult<Option<&R>> {
        if !force_reload && self.loaded {
            tracing::debug!(
                "association '{}' resolved from instance cache",
                self.metadata.name
            );
            return Ok(self.related.as_ref());
        }

        self.related = match self.owner_key_value() {
            Some(_) => {
                tracing::debug!(
                    "loading association '{}' (unscoped: {})",
                    self.metadata.name,
                    self.metadata.unscoped
                );
                self.query().first(db).await?
            }
            None => None,
        };
        self.loaded = true;
        Ok(self.related.as_ref())
    }
}

/// HasMany accessor - collection of related models
#[derive(Debug)]
pub struct HasManyAssociation<O, R>
where
    O: Model,
    R: Model,
{
    owner: O,
    metadata: Arc<AssociationMetadata>,
    related: Vec<R>,
    loaded: bool,
}

impl<O, R> HasManyAssociation<O, R>
where
    O: Model,
    R: Model,
{
    /// Create an accessor for a has_many declaration
    pub fn new(owner: O, metadata: Arc<AssociationMetadata>) -> ModelResult<Self> {
        expect_kind(&metadata, AssociationKind::HasMany)?;
        Ok(Self {
            owner,
            metadata,
            related: Vec::new(),
            loaded: false,
        })
    }

    /// The owning model instance
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// The association metadata
    pub fn metadata(&self) -> &AssociationMetadata {
        &self.metadata
    }

    /// Whether the cache slot is populated
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cached collection, if any load has happened
    pub fn cached(&self) -> Option<&[R]> {
        if self.loaded {
            Some(&self.related)
        } else {
            None
        }
    }

    /// Clear the cache slot
    pub fn reset(&mut self) {
        self.related = Vec::new();
        self.loaded = false;
    }

    fn owner_key_value(&self) -> Option<Value> {
        field_value(&self.owner.to_fields(), &self.metadata.local_key)
    }

    /// Build the query this accessor executes on load
    pub fn query(&self) -> QueryBuilder<R> {
        let key_value = self.owner_key_value().unwrap_or(Value::Null);
        association_query(&self.metadata, &self.metadata.foreign_key, key_value)
    }

    /// Return the collection, loading it on first access or when
    /// `force_reload` is set
    pub async fn get(&mut self, db: &dyn Database, force_reload: bool) -> ModelResult<&[R]> {
        if !force_reload && self.loaded {
            tracing::debug!(
                "association '{}' resolved from instance cache",
                self.metadata.name
            );
            return Ok(&self.related);
        }

        self.related = match self.owner_key_value() {
            Some(_) => {
                tracing::debug!(
                    "loading association '{}' (unscoped: {})",
                    self.metadata.name,
                    self.metadata.unscoped
                );
                self.query().get(db).await?
            }
            None => Vec::new(),
        };
        self.loaded = true;
        Ok(&self.related)
    }

    /// Number of cached related models; zero until a load happens
    pub fn len(&self) -> usize {
        self.cached().map_or(0, <[R]>::len)
    }

    /// Whether the cached collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the cached collection; empty until a load happens
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.cached().unwrap_or_default().iter()
    }
}

impl<O, R> IntoIterator for HasManyAssociation<O, R>
where
    O: Model,
    R: Model,
{
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        let related = if self.loaded { self.related } else { Vec::new() };
        related.into_iter()
    }
}

impl<'a, O, R> IntoIterator for &'a HasManyAssociation<O, R>
where
    O: Model,
    R: Model,
{
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
