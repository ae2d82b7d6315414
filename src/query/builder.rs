//! Query Builder - Core builder implementation

use std::marker::PhantomData;

use super::types::*;

/// Query builder for constructing select queries against a model's table.
///
/// Carries an `apply_default_scope` switch: unless `unscoped()` is called,
/// the target model's default scope is applied once at execution time.
#[derive(Debug)]
pub struct QueryBuilder<M = ()> {
    pub(crate) table: Option<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) apply_default_scope: bool,
    _phantom: PhantomData<M>,
}

impl<M> Clone for QueryBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            where_conditions: self.where_conditions.clone(),
            order_by: self.order_by.clone(),
            limit_count: self.limit_count,
            apply_default_scope: self.apply_default_scope,
            _phantom: PhantomData,
        }
    }
}

impl<M> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> QueryBuilder<M> {
    /// Create a new query builder
    pub fn new() -> Self {
        Self {
            table: None,
            where_conditions: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            apply_default_scope: true,
            _phantom: PhantomData,
        }
    }

    /// Set the table to query from
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Add an ORDER BY clause
    pub fn order_by(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order_by.push((column.to_string(), direction));
        self
    }

    /// Limit the number of returned rows
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    /// Suppress default-scope application for this query.
    ///
    /// The query runs against the full backing table instead of the target
    /// model's normally-scoped subset.
    pub fn unscoped(mut self) -> Self {
        self.apply_default_scope = false;
        self
    }

    /// Whether this builder will skip default-scope application
    pub fn is_unscoped(&self) -> bool {
        !self.apply_default_scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let query: QueryBuilder = QueryBuilder::new();
        assert!(query.table.is_none());
        assert!(query.where_conditions.is_empty());
        assert!(!query.is_unscoped());
    }

    #[test]
    fn test_unscoped_switch() {
        let query: QueryBuilder = QueryBuilder::new().from("comments").unscoped();
        assert!(query.is_unscoped());
        assert_eq!(query.table.as_deref(), Some("comments"));
    }
}
