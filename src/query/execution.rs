//! Query Builder execution for Model types
//!
//! Applies the target model's default scope exactly once, at execution time,
//! unless the builder was marked `unscoped()`.

use crate::backends::Database;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;

use super::builder::QueryBuilder;
use super::types::SelectQuery;

impl<M: Model> QueryBuilder<M> {
    /// Create a query builder targeting the model's table
    pub fn for_model() -> Self {
        Self::new().from(M::table_name())
    }

    /// Resolve this builder into an executable query.
    ///
    /// Default-scope conditions are merged in here unless the builder is
    /// unscoped, so a plan is the final word on what the backend sees.
    pub fn plan(self) -> SelectQuery {
        let builder = if self.apply_default_scope {
            M::default_scope(self)
        } else {
            self
        };

        SelectQuery {
            table: builder
                .table
                .unwrap_or_else(|| M::table_name().to_string()),
            conditions: builder.where_conditions,
            order_by: builder.order_by,
            limit: builder.limit_count,
        }
    }

    /// Execute query and return models
    pub async fn get(self, db: &dyn Database) -> ModelResult<Vec<M>> {
        let query = self.plan();
        tracing::debug!("Executing query: {}", query.to_sql());

        let rows = db.fetch_all(&query).await?;
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(M::from_row(row.as_ref())?);
        }

        Ok(models)
    }

    /// Execute query and return first model
    pub async fn first(self, db: &dyn Database) -> ModelResult<Option<M>> {
        let query = self.limit(1);
        let mut results = query.get(db).await?;
        Ok(results.pop())
    }

    /// Execute query and return first model or error
    pub async fn first_or_fail(self, db: &dyn Database) -> ModelResult<M> {
        self.first(db)
            .await?
            .ok_or_else(|| ModelError::NotFound(M::table_name().to_string()))
    }

    /// Count query results
    pub async fn count(self, db: &dyn Database) -> ModelResult<i64> {
        let query = self.plan();
        let rows = db.fetch_all(&query).await?;
        Ok(rows.len() as i64)
    }
}
