//! Database Backends - Abstract storage interface and implementations

pub mod core;
pub mod memory;

pub use self::core::*;
pub use self::memory::*;
