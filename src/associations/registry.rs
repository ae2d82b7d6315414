//! Association Registry - Runtime metadata storage and access
//!
//! Registries are explicit instances created by the application and passed
//! to the declaration surface; there is no process-global registry.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{AssociationError, ModelResult};

use super::metadata::AssociationMetadata;

/// Thread-safe association registry
#[derive(Debug, Clone, Default)]
pub struct AssociationRegistry {
    /// Map of model name -> association name -> metadata
    associations: Arc<DashMap<String, HashMap<String, Arc<AssociationMetadata>>>>,

    /// Names of unscoped associations per model
    unscoped_index: Arc<DashMap<String, Vec<String>>>,
}

impl AssociationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an association for a model, replacing any previous
    /// declaration of the same name
    pub fn register(
        &self,
        model_name: &str,
        metadata: AssociationMetadata,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        metadata.validate()?;
        let metadata = Arc::new(metadata);

        let mut model_associations = self
            .associations
            .entry(model_name.to_string())
            .or_default();
        model_associations.insert(metadata.name.clone(), Arc::clone(&metadata));
        drop(model_associations);

        // Redeclaration may flip the unscoped flag either way
        let mut unscoped = self
            .unscoped_index
            .entry(model_name.to_string())
            .or_default();
        unscoped.retain(|name| name != &metadata.name);
        if metadata.unscoped {
            unscoped.push(metadata.name.clone());
        }

        Ok(metadata)
    }

    /// Get association metadata by model and association name
    pub fn get(&self, model_name: &str, association_name: &str) -> Option<Arc<AssociationMetadata>> {
        self.associations
            .get(model_name)?
            .get(association_name)
            .cloned()
    }

    /// Get association metadata or fail with a not-found error
    pub fn get_or_err(
        &self,
        model_name: &str,
        association_name: &str,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        self.get(model_name, association_name).ok_or_else(|| {
            AssociationError::NotFound(format!("{}.{}", model_name, association_name)).into()
        })
    }

    /// Check if an association is registered
    pub fn has_association(&self, model_name: &str, association_name: &str) -> bool {
        self.associations
            .get(model_name)
            .map(|associations| associations.contains_key(association_name))
            .unwrap_or(false)
    }

    /// Get all association names for a model
    pub fn association_names(&self, model_name: &str) -> Vec<String> {
        self.associations
            .get(model_name)
            .map(|associations| associations.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Get the names of associations registered as unscoped for a model
    pub fn unscoped_associations(&self, model_name: &str) -> Vec<String> {
        self.unscoped_index
            .get(model_name)
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    /// Check whether a specific association is registered as unscoped
    pub fn is_unscoped(&self, model_name: &str, association_name: &str) -> bool {
        self.get(model_name, association_name)
            .map(|metadata| metadata.unscoped)
            .unwrap_or(false)
    }
}
