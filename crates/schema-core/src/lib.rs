//! Core schema types for schema-proptest.
//!
//! This crate provides the declarative schema model that strategy registries
//! translate into proptest strategies:
//!
//! - [`SchemaType`] - One schema node with its category and validators
//! - [`Validator`] - Declarative constraints (range, length, membership, ...)
//! - [`Value`] - Dynamic values produced by generated strategies
//! - [`Context`] - Read-only settings passed to validators and transforms
//!
//! # Architecture
//!
//! ```text
//! schema-core (this crate)
//!    │
//!    └─── strategy-registry  (converts SchemaType trees into strategies)
//! ```
//!
//! # Example
//!
//! ```rust
//! use schema_core::{Context, SchemaType, Validator, Value};
//!
//! let age = SchemaType::integer().validate(Validator::range(18, 120));
//!
//! assert!(age.validators()[0].validate(&Value::Int(42), &Context::new()).is_ok());
//! ```

pub mod types;
pub mod validators;
pub mod values;

// Re-exports for convenience
pub use types::{Category, Constructor, PostLoad, SchemaType, TypeId, TypeKind};
pub use validators::{Check, KeyFn, Predicate, ValidationError, Validator, ValidatorKind};
pub use values::{Context, Value};
