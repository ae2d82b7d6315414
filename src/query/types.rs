//! Query Builder Types - Core types and enums for query building

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query operator types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::NotLike => write!(f, "NOT LIKE"),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::NotIn => write!(f, "NOT IN"),
            QueryOperator::IsNull => write!(f, "IS NULL"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    pub values: Vec<Value>, // For IN, NOT IN
}

/// Order by direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// A fully-resolved select query, ready for a backend to execute.
///
/// Produced by `QueryBuilder::plan()`; the default scope of the target
/// model has already been applied (or deliberately skipped) by that point.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub conditions: Vec<WhereCondition>,
    pub order_by: Vec<(String, OrderDirection)>,
    pub limit: Option<i64>,
}
