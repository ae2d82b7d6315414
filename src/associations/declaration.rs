//! Association Declarations - belongs_to / has_one / has_many
//!
//! `ModelAssociations<Owner>` is the declaration surface. Each declaration
//! accepts the association name plus scope and/or options; an `unscoped`
//! option registers the association for default-scope-bypassing accessors.
//! Scope and options may swap positions the way they can in declaration
//! DSLs: passing options alone where a scope would go is understood as
//! "no scope, these are the options".

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ModelResult;
use crate::model::Model;

use super::metadata::{AssociationMetadata, Scope};
use super::options::AssociationOptions;
use super::registry::AssociationRegistry;
use super::types::AssociationKind;

/// Arguments accepted after the association name: scope and/or options,
/// in flexible positions
pub trait IntoDeclarationArgs {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)>;
}

impl IntoDeclarationArgs for () {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((None, AssociationOptions::default()))
    }
}

impl IntoDeclarationArgs for Scope {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((Some(self), AssociationOptions::default()))
    }
}

// Options where the scope would go: understood as options, no scope
impl IntoDeclarationArgs for AssociationOptions {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((None, self))
    }
}

impl IntoDeclarationArgs for (Scope, AssociationOptions) {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((Some(self.0), self.1))
    }
}

impl IntoDeclarationArgs for HashMap<String, Value> {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((None, AssociationOptions::from_map(self)?))
    }
}

impl IntoDeclarationArgs for (Scope, HashMap<String, Value>) {
    fn into_declaration_args(self) -> ModelResult<(Option<Scope>, AssociationOptions)> {
        Ok((Some(self.0), AssociationOptions::from_map(self.1)?))
    }
}

/// Declaration surface for one owning model
#[derive(Debug)]
pub struct ModelAssociations<'a, O: Model> {
    registry: &'a AssociationRegistry,
    _owner: PhantomData<O>,
}

impl<'a, O: Model> ModelAssociations<'a, O> {
    /// Create a declaration surface backed by the given registry
    pub fn new(registry: &'a AssociationRegistry) -> Self {
        Self {
            registry,
            _owner: PhantomData,
        }
    }

    /// Declare a belongs_to association with the related model
    pub fn belongs_to<R: Model>(
        &self,
        name: &str,
        args: impl IntoDeclarationArgs,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        self.declare::<R>(AssociationKind::BelongsTo, name, args)
    }

    /// Declare a has_one association with the related model
    pub fn has_one<R: Model>(
        &self,
        name: &str,
        args: impl IntoDeclarationArgs,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        self.declare::<R>(AssociationKind::HasOne, name, args)
    }

    /// Declare a has_many association with the related model
    pub fn has_many<R: Model>(
        &self,
        name: &str,
        args: impl IntoDeclarationArgs,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        self.declare::<R>(AssociationKind::HasMany, name, args)
    }

    fn declare<R: Model>(
        &self,
        kind: AssociationKind,
        name: &str,
        args: impl IntoDeclarationArgs,
    ) -> ModelResult<Arc<AssociationMetadata>> {
        let (scope, options) = args.into_declaration_args()?;

        // The unscoped flag is lifted off the options here; the metadata
        // build below only ever sees the remaining declaration options.
        let unscoped = options.unscoped;

        let foreign_key = options
            .foreign_key
            .unwrap_or_else(|| default_foreign_key::<O>(kind, name));
        let local_key = options.local_key.unwrap_or_else(|| match kind {
            AssociationKind::BelongsTo => R::primary_key_name().to_string(),
            AssociationKind::HasOne | AssociationKind::HasMany => {
                O::primary_key_name().to_string()
            }
        });

        let mut metadata = AssociationMetadata::new(
            kind,
            name.to_string(),
            R::table_name().to_string(),
            model_type_name::<R>(),
            foreign_key,
        )
        .with_local_key(local_key)
        .with_unscoped(unscoped);

        if let Some(scope) = scope {
            metadata = metadata.with_scope(scope);
        }

        let metadata = self.registry.register(O::table_name(), metadata)?;
        if metadata.unscoped {
            tracing::debug!(
                "registered unscoped {} association '{}' on '{}'",
                metadata.kind,
                metadata.name,
                O::table_name()
            );
        }
        Ok(metadata)
    }
}

/// Conventional underscore foreign key: `{name}_id` on the owner for
/// belongs_to, `{owner_singular}_id` on the related table otherwise
fn default_foreign_key<O: Model>(kind: AssociationKind, name: &str) -> String {
    if kind.foreign_key_on_owner() {
        format!("{}_id", name)
    } else {
        format!("{}_id", singularize(O::table_name()))
    }
}

fn singularize(table: &str) -> &str {
    table.strip_suffix('s').unwrap_or(table)
}

fn model_type_name<M: Model>() -> String {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}
