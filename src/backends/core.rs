//! Core Database Backend Traits
//!
//! Defines the traits and value types for database backend abstraction.
//! Backends receive the structured `SelectQuery` produced by the query
//! builder and return abstract rows, keeping the storage engine swappable.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::OrmResult;
use crate::query::SelectQuery;

/// Abstract database backend
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a select query and return all matching rows
    async fn fetch_all(&self, query: &SelectQuery) -> OrmResult<Vec<Box<dyn DatabaseRow>>>;

    /// Execute a select query and return the first matching row
    async fn fetch_optional(&self, query: &SelectQuery) -> OrmResult<Option<Box<dyn DatabaseRow>>>;
}

/// Abstract database row trait
pub trait DatabaseRow: Send + Sync {
    /// Get a column value by name
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue>;

    /// Get column names
    fn column_names(&self) -> Vec<String>;

    /// Convert row to JSON value
    fn to_json(&self) -> OrmResult<JsonValue>;
}

/// Database value enumeration for type-safe column access
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Uuid(uuid::Uuid),
    DateTime(chrono::DateTime<chrono::Utc>),
    Json(JsonValue),
    Array(Vec<DatabaseValue>),
}

impl DatabaseValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DatabaseValue::Null)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            DatabaseValue::Null => JsonValue::Null,
            DatabaseValue::Bool(b) => JsonValue::Bool(*b),
            DatabaseValue::Int64(i) => JsonValue::Number(serde_json::Number::from(*i)),
            DatabaseValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DatabaseValue::String(s) => JsonValue::String(s.clone()),
            DatabaseValue::Uuid(u) => JsonValue::String(u.to_string()),
            DatabaseValue::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            DatabaseValue::Json(j) => j.clone(),
            DatabaseValue::Array(arr) => JsonValue::Array(arr.iter().map(|v| v.to_json()).collect()),
        }
    }

    /// Create DatabaseValue from JSON value
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => DatabaseValue::Null,
            JsonValue::Bool(b) => DatabaseValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DatabaseValue::Int64(i)
                } else if let Some(f) = n.as_f64() {
                    DatabaseValue::Float64(f)
                } else {
                    DatabaseValue::Null
                }
            }
            JsonValue::String(s) => {
                // Try to parse as UUID first, then as an RFC 3339 timestamp
                if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    DatabaseValue::Uuid(uuid)
                } else if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    DatabaseValue::DateTime(dt.with_timezone(&chrono::Utc))
                } else {
                    DatabaseValue::String(s)
                }
            }
            JsonValue::Array(arr) => {
                DatabaseValue::Array(arr.into_iter().map(DatabaseValue::from_json).collect())
            }
            JsonValue::Object(_) => DatabaseValue::Json(json),
        }
    }
}

impl From<bool> for DatabaseValue {
    fn from(value: bool) -> Self {
        DatabaseValue::Bool(value)
    }
}

impl From<i32> for DatabaseValue {
    fn from(value: i32) -> Self {
        DatabaseValue::Int64(value as i64)
    }
}

impl From<i64> for DatabaseValue {
    fn from(value: i64) -> Self {
        DatabaseValue::Int64(value)
    }
}

impl From<f64> for DatabaseValue {
    fn from(value: f64) -> Self {
        DatabaseValue::Float64(value)
    }
}

impl From<String> for DatabaseValue {
    fn from(value: String) -> Self {
        DatabaseValue::String(value)
    }
}

impl From<&str> for DatabaseValue {
    fn from(value: &str) -> Self {
        DatabaseValue::String(value.to_string())
    }
}

impl From<uuid::Uuid> for DatabaseValue {
    fn from(value: uuid::Uuid) -> Self {
        DatabaseValue::Uuid(value)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for DatabaseValue {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        DatabaseValue::DateTime(value)
    }
}

impl<T> From<Option<T>> for DatabaseValue
where
    T: Into<DatabaseValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DatabaseValue::Null,
        }
    }
}
