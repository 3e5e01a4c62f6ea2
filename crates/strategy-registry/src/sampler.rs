//! Deterministic sampling from value strategies.

use crate::config::SamplerConfig;
use crate::error::SampleError;
use crate::ValueStrategy;
use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use schema_core::Value;

/// Draws values from strategies with a seeded RNG.
///
/// The same seed and strategy always produce the same sequence of values.
/// Each draw runs on its own forked runner, so the rejection limit applies
/// per value.
pub struct Sampler {
    runner: TestRunner,
    runner_config: Config,
    seed: u64,
    index: u64,
}

impl Sampler {
    /// Create a sampler with default rejection limits.
    pub fn new(seed: u64) -> Self {
        Self::with_config(&SamplerConfig {
            seed,
            ..SamplerConfig::default()
        })
    }

    pub fn with_config(config: &SamplerConfig) -> Self {
        let runner_config = Config {
            max_local_rejects: config.max_local_rejects,
            ..Config::default()
        };
        let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &seed_bytes(config.seed));
        Self {
            runner: TestRunner::new_with_rng(runner_config.clone(), rng),
            runner_config,
            seed: config.seed,
            index: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Draw one value.
    ///
    /// Fails when the strategy's filters reject more draws than the
    /// configured limit.
    pub fn sample(&mut self, strategy: &ValueStrategy) -> Result<Value, SampleError> {
        let rng = self.runner.new_rng();
        let mut runner = TestRunner::new_with_rng(self.runner_config.clone(), rng);
        let tree = strategy
            .new_tree(&mut runner)
            .map_err(|reason| SampleError::Rejected {
                reason: reason.message().to_string(),
            })?;
        self.index += 1;
        Ok(tree.current())
    }

    /// Lazily draw `count` values.
    pub fn samples<'a>(&'a mut self, strategy: &'a ValueStrategy, count: usize) -> SampleIter<'a> {
        SampleIter {
            sampler: self,
            strategy,
            remaining: count,
        }
    }
}

/// Iterator that lazily draws values.
pub struct SampleIter<'a> {
    sampler: &'a mut Sampler,
    strategy: &'a ValueStrategy,
    remaining: usize,
}

impl Iterator for SampleIter<'_> {
    type Item = Result<Value, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.sampler.sample(self.strategy))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SampleIter<'_> {}

/// Expand a 64-bit seed into the 32 bytes ChaCha needs.
fn seed_bytes(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    let mut state = seed;
    for chunk in bytes.chunks_exact_mut(8) {
        chunk.copy_from_slice(&state.to_le_bytes());
        state = state.wrapping_add(0x9E3779B97F4A7C15);
    }
    bytes
}
