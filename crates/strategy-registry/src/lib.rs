//! Schema-to-strategy bridge for schema-proptest.
//!
//! This crate turns [`SchemaType`](schema_core::SchemaType) descriptions into
//! proptest strategies that produce values the schema accepts. Conversion is
//! driven by a [`Registry`] of rules: per-instance overrides first, then
//! selector rules newest-first, with the type's validators translated into
//! the strategy or applied as rejection filters.
//!
//! # Architecture
//!
//! ```text
//! SchemaType + Context
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │       Registry       │
//! │                      │
//! │  1. instance override│
//! │  2. AnyOf shortcut   │
//! │  3. selector rules   │
//! │  4. validator filters│
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      ValueStrategy ──► Sampler (seeded) ──► Value
//! ```
//!
//! # Example
//!
//! ```rust
//! use schema_core::{SchemaType, Validator};
//! use strategy_registry::{Registry, Sampler};
//!
//! let user = SchemaType::object([
//!     ("name", SchemaType::text().validate(Validator::min_length(1))),
//!     ("age", SchemaType::integer().validate(Validator::range(18, 99))),
//! ]);
//!
//! let registry = Registry::with_defaults();
//! let strategy = registry.strategy(&user).unwrap();
//! let value = Sampler::new(42).sample(&strategy).unwrap();
//! println!("Generated user: {:?}", value);
//! ```
//!
//! # Features
//!
//! - `regex` (default) - generate text directly from `Regexp` validators
//!   instead of filtering arbitrary text

pub mod config;
pub mod constraints;
pub mod error;
pub mod registry;
pub mod rules;
pub mod sampler;

use proptest::strategy::BoxedStrategy;
use schema_core::Value;

/// Strategy producing schema values.
pub type ValueStrategy = BoxedStrategy<Value>;

// Re-exports for convenience
pub use config::{ConfigError, SamplerConfig};
pub use error::{ConversionError, ErrorKind, SampleError};
pub use registry::{ConversionRule, ConversionSettings, Registry, RuleKey, Selector};
pub use sampler::{SampleIter, Sampler};
