//! schema-proptest
//!
//! Property-based test data from declarative schemas. A schema is a tree of
//! [`SchemaType`](schema_core::SchemaType) nodes with validators attached;
//! the [`Registry`](strategy_registry::Registry) turns it into a proptest
//! strategy whose values the schema accepts.
//!
//! # Crates
//!
//! - `schema_core` - schema types, validators, values and load context
//! - `strategy_registry` - conversion rules, registry and seeded sampler
//!
//! # CLI Usage
//!
//! ```bash
//! # Five demo users as JSON lines
//! schema-proptest sample --seed 42 --count 5
//!
//! # Settings from a YAML file, seed from the environment
//! SCHEMA_PROPTEST_SEED=7 schema-proptest sample --config sampler.yaml
//! ```

use clap::Parser;
use std::path::PathBuf;
use strategy_registry::{ConfigError, SamplerConfig};

pub mod demo;

pub use schema_core;
pub use strategy_registry;

/// Sampler options. Flags override values read from `--config`.
#[derive(Parser, Clone, Debug, Default)]
pub struct SampleOpts {
    /// YAML file with sampler settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, env = "SCHEMA_PROPTEST_SEED")]
    pub seed: Option<u64>,

    /// Number of values to generate
    #[arg(long)]
    pub count: Option<usize>,

    /// Rejected draws tolerated per value
    #[arg(long)]
    pub max_local_rejects: Option<u32>,

    /// Size limit for text and collections without a maximum length
    #[arg(long)]
    pub max_size: Option<usize>,
}

impl SampleOpts {
    /// Resolve the effective sampler settings.
    pub fn resolve(&self) -> Result<SamplerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SamplerConfig::from_file(path)?,
            None => SamplerConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(max_local_rejects) = self.max_local_rejects {
            config.max_local_rejects = max_local_rejects;
        }
        if let Some(max_size) = self.max_size {
            config.max_size = max_size;
        }
        config.validate()?;
        Ok(config)
    }
}
