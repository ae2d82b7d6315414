//! Association Options - Typed declaration options
//!
//! The `unscoped` flag carries a boolean-only contract: when parsing a
//! loose options mapping, only a literal JSON `true` opts the association
//! into unscoped loading, and the entry is stripped before the remaining
//! options are validated.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// Options accepted by the three association declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationOptions {
    /// Override the conventional foreign key column
    pub foreign_key: Option<String>,

    /// Override the conventional local key column
    pub local_key: Option<String>,

    /// Load this association with the target's default scope suppressed
    pub unscoped: bool,
}

impl AssociationOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the foreign key column
    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    /// Override the local key column
    pub fn local_key(mut self, local_key: impl Into<String>) -> Self {
        self.local_key = Some(local_key.into());
        self
    }

    /// Opt into unscoped loading
    pub fn unscoped(mut self, unscoped: bool) -> Self {
        self.unscoped = unscoped;
        self
    }

    /// Parse options from a loose JSON mapping.
    ///
    /// The `unscoped` entry is removed before anything else looks at the
    /// map, and reads as true only for a literal `true`; any other value
    /// (including `false`, strings, and numbers) reads as false. Remaining
    /// unrecognized keys are rejected, as the underlying declaration would
    /// reject an unknown option.
    pub fn from_map(mut map: HashMap<String, Value>) -> ModelResult<Self> {
        let unscoped = matches!(map.remove("unscoped"), Some(Value::Bool(true)));

        let foreign_key = take_string_option(&mut map, "foreign_key")?;
        let local_key = take_string_option(&mut map, "local_key")?;

        if !map.is_empty() {
            let mut unknown: Vec<String> = map.into_keys().collect();
            unknown.sort();
            return Err(ModelError::Configuration(format!(
                "unknown association option(s): {}",
                unknown.join(", ")
            )));
        }

        Ok(Self {
            foreign_key,
            local_key,
            unscoped,
        })
    }
}

fn take_string_option(
    map: &mut HashMap<String, Value>,
    key: &str,
) -> ModelResult<Option<String>> {
    match map.remove(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ModelError::Configuration(format!(
            "association option '{}' must be a string, got {}",
            key, other
        ))),
    }
}
