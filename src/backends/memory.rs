//! In-Memory Database Backend
//!
//! Table-name to JSON-row store that evaluates where-conditions in process.
//! Backs the test suite and embedded use; semantics are single-threaded and
//! synchronous, the backend never suspends.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ModelError, OrmResult};
use crate::query::{OrderDirection, QueryOperator, SelectQuery, WhereCondition};

use super::core::{Database, DatabaseRow, DatabaseValue};

type JsonRow = Map<String, Value>;

/// In-memory database keyed by table name
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<HashMap<String, Vec<JsonRow>>>,
}

impl MemoryDatabase {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a single JSON-object row into a table
    pub fn insert(&self, table: &str, row: Value) -> OrmResult<()> {
        let row = match row {
            Value::Object(map) => map,
            other => {
                return Err(ModelError::Database(format!(
                    "row for table '{}' must be a JSON object, got {}",
                    table, other
                )))
            }
        };

        let mut tables = self.lock_write()?;
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    /// Insert several rows at once
    pub fn insert_all(&self, table: &str, rows: Vec<Value>) -> OrmResult<()> {
        for row in rows {
            self.insert(table, row)?;
        }
        Ok(())
    }

    /// Remove all rows from a table
    pub fn truncate(&self, table: &str) -> OrmResult<()> {
        let mut tables = self.lock_write()?;
        tables.remove(table);
        Ok(())
    }

    /// Number of rows currently stored in a table
    pub fn row_count(&self, table: &str) -> OrmResult<usize> {
        let tables = self.lock_read()?;
        Ok(tables.get(table).map(Vec::len).unwrap_or(0))
    }

    fn lock_read(&self) -> OrmResult<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<JsonRow>>>> {
        self.tables
            .read()
            .map_err(|_| ModelError::Database("memory store lock poisoned".to_string()))
    }

    fn lock_write(
        &self,
    ) -> OrmResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<JsonRow>>>> {
        self.tables
            .write()
            .map_err(|_| ModelError::Database("memory store lock poisoned".to_string()))
    }

    fn select(&self, query: &SelectQuery) -> OrmResult<Vec<JsonRow>> {
        let tables = self.lock_read()?;
        let mut rows: Vec<JsonRow> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.conditions.iter().all(|c| condition_matches(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for (column, direction) in query.order_by.iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = compare_values(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }

        Ok(rows)
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn fetch_all(&self, query: &SelectQuery) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        let rows = self.select(query)?;
        Ok(rows
            .into_iter()
            .map(|row| Box::new(MemoryRow::new(row)) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn fetch_optional(&self, query: &SelectQuery) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        let mut rows = self.fetch_all(query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }
}

/// Row returned by the in-memory backend
#[derive(Debug, Clone)]
pub struct MemoryRow {
    fields: JsonRow,
}

impl MemoryRow {
    pub fn new(fields: JsonRow) -> Self {
        Self { fields }
    }
}

impl DatabaseRow for MemoryRow {
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        self.fields
            .get(name)
            .map(|value| DatabaseValue::from_json(value.clone()))
            .ok_or_else(|| ModelError::Database(format!("column '{}' not found", name)))
    }

    fn column_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn to_json(&self) -> OrmResult<Value> {
        Ok(Value::Object(self.fields.clone()))
    }
}

fn condition_matches(row: &JsonRow, condition: &WhereCondition) -> bool {
    let actual = row.get(&condition.column).unwrap_or(&Value::Null);
    let expected = condition.value.as_ref().unwrap_or(&Value::Null);

    match condition.operator {
        QueryOperator::Equal => values_equal(actual, expected),
        QueryOperator::NotEqual => !values_equal(actual, expected),
        QueryOperator::GreaterThan => compare_values(actual, expected) == Ordering::Greater,
        QueryOperator::GreaterThanOrEqual => compare_values(actual, expected) != Ordering::Less,
        QueryOperator::LessThan => compare_values(actual, expected) == Ordering::Less,
        QueryOperator::LessThanOrEqual => compare_values(actual, expected) != Ordering::Greater,
        QueryOperator::Like => like_matches(actual, expected),
        QueryOperator::NotLike => !like_matches(actual, expected),
        QueryOperator::In => condition.values.iter().any(|v| values_equal(actual, v)),
        QueryOperator::NotIn => !condition.values.iter().any(|v| values_equal(actual, v)),
        QueryOperator::IsNull => actual.is_null(),
        QueryOperator::IsNotNull => !actual.is_null(),
    }
}

/// Equality with numeric coercion, so `1` and `1.0` compare equal
fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    a == b
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return x.cmp(y);
    }
    Ordering::Equal
}

/// Minimal LIKE support: leading/trailing `%` wildcards only
fn like_matches(actual: &Value, pattern: &Value) -> bool {
    let (Some(actual), Some(pattern)) = (actual.as_str(), pattern.as_str()) else {
        return false;
    };

    match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
        (Some(infix), Some(_)) => {
            let needle = infix.strip_suffix('%').unwrap_or(infix);
            actual.contains(needle)
        }
        (Some(suffix), None) => actual.ends_with(suffix),
        (None, Some(prefix)) => actual.starts_with(prefix),
        (None, None) => actual == pattern,
    }
}
