//! Query Builder SQL generation
//!
//! Renders queries as SQL text for debug logging and inspection. Backends
//! receive the structured `SelectQuery`, not this text.

use serde_json::Value;

use super::builder::QueryBuilder;
use super::types::*;

impl SelectQuery {
    /// Render this query as SQL text
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);

        if !self.conditions.is_empty() {
            let rendered: Vec<String> = self.conditions.iter().map(render_condition).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&rendered.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let rendered: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&rendered.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }
}

impl<M> QueryBuilder<M> {
    /// Render the builder's current state as SQL text, without applying
    /// any default scope
    pub fn to_sql(&self) -> String {
        SelectQuery {
            table: self.table.clone().unwrap_or_default(),
            conditions: self.where_conditions.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit_count,
        }
        .to_sql()
    }
}

fn render_condition(condition: &WhereCondition) -> String {
    match condition.operator {
        QueryOperator::IsNull | QueryOperator::IsNotNull => {
            format!("{} {}", condition.column, condition.operator)
        }
        QueryOperator::In | QueryOperator::NotIn => {
            let values: Vec<String> = condition.values.iter().map(render_value).collect();
            format!(
                "{} {} ({})",
                condition.column,
                condition.operator,
                values.join(", ")
            )
        }
        _ => {
            let value = condition
                .value
                .as_ref()
                .map(render_value)
                .unwrap_or_else(|| "NULL".to_string());
            format!("{} {} {}", condition.column, condition.operator, value)
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rendering() {
        let query: QueryBuilder = QueryBuilder::new()
            .from("comments")
            .where_eq("user_id", 1)
            .where_eq("published", true)
            .order_by("id", OrderDirection::Asc)
            .limit(10);

        assert_eq!(
            query.to_sql(),
            "SELECT * FROM comments WHERE user_id = 1 AND published = TRUE ORDER BY id ASC LIMIT 10"
        );
    }

    #[test]
    fn test_in_and_null_rendering() {
        let query: QueryBuilder = QueryBuilder::new()
            .from("users")
            .where_in("id", vec![1, 2])
            .where_null("deleted_at");

        assert_eq!(
            query.to_sql(),
            "SELECT * FROM users WHERE id IN (1, 2) AND deleted_at IS NULL"
        );
    }

    #[test]
    fn test_string_escaping() {
        let query: QueryBuilder = QueryBuilder::new().from("users").where_eq("name", "O'Brien");
        assert_eq!(
            query.to_sql(),
            "SELECT * FROM users WHERE name = 'O''Brien'"
        );
    }
}
