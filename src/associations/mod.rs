//! Associations Module - Declarations, metadata, registry, and accessors
//!
//! The declaration surface registers belongs_to / has_one / has_many
//! metadata; accessors load related records, optionally with the target
//! model's default scope suppressed, and memoize per owning instance.

pub mod accessor;
pub mod declaration;
pub mod metadata;
pub mod options;
pub mod registry;
pub mod types;

pub use accessor::*;
pub use declaration::*;
pub use metadata::*;
pub use options::*;
pub use registry::*;
pub use types::*;
