//! Query Module - Builder, conditions, SQL rendering, and execution

pub mod builder;
pub mod execution;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::*;
pub use types::*;
