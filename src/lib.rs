//! # unscoped-associations: Default-Scope Bypass for Model Associations
//!
//! Association layer with belongs_to / has_one / has_many declarations that
//! can opt into **unscoped** loading: the generated accessor queries the
//! related model with its default scope suppressed and memoizes the result
//! in a per-instance cache slot, invalidated only by an explicit reload.
//!
//! The crate provides the Model trait with a `default_scope` hook, a query
//! builder with an `unscoped()` switch, an abstract database backend with an
//! in-memory implementation, and the association metadata, registry, and
//! accessor machinery.

pub mod associations;
pub mod backends;
pub mod error;
pub mod model;
pub mod query;

// Re-export core traits and types
pub use associations::accessor::{BelongsToAssociation, HasManyAssociation, HasOneAssociation};
pub use associations::declaration::{IntoDeclarationArgs, ModelAssociations};
pub use associations::metadata::{AssociationMetadata, Scope};
pub use associations::options::AssociationOptions;
pub use associations::registry::AssociationRegistry;
pub use associations::types::AssociationKind;
pub use backends::core::{Database, DatabaseRow, DatabaseValue};
pub use backends::memory::MemoryDatabase;
pub use error::{AssociationError, ModelError, ModelResult, OrmError, OrmResult};
pub use model::Model;
pub use query::builder::QueryBuilder;
pub use query::types::{OrderDirection, QueryOperator, SelectQuery, WhereCondition};
