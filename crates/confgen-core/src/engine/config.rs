use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_NUM_CONFORMERS: usize = 5000;
pub const DEFAULT_PRUNE_RMS_THRESHOLD: f64 = 0.5;
pub const DEFAULT_RANDOM_SEED: u64 = 0xf00d;
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Number of embedding slots; the run may return fewer conformers.
    pub num_conformers: usize,
    /// Heavy-atom RMSD (Angstroms) below which a new conformer counts as a
    /// duplicate. Zero or negative disables pruning.
    pub prune_rms_threshold: f64,
    pub random_seed: u64,
    /// Embedding tries per slot before the slot is given up.
    pub max_attempts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig {
    pub enabled: bool,
    pub max_iterations: usize,
    /// Parameter file replacing the built-in force field table.
    pub forcefield_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub embedding: EmbeddingConfig,
    pub optimization: OptimizationConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig {
                num_conformers: DEFAULT_NUM_CONFORMERS,
                prune_rms_threshold: DEFAULT_PRUNE_RMS_THRESHOLD,
                random_seed: DEFAULT_RANDOM_SEED,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            },
            optimization: OptimizationConfig {
                enabled: true,
                max_iterations: DEFAULT_MAX_ITERATIONS,
                forcefield_path: None,
            },
        }
    }
}

/// Builds a [`GenerationConfig`]; every field left unset takes its default.
#[derive(Default)]
pub struct GenerationConfigBuilder {
    num_conformers: Option<usize>,
    prune_rms_threshold: Option<f64>,
    random_seed: Option<u64>,
    max_attempts: Option<usize>,
    optimize: Option<bool>,
    max_iterations: Option<usize>,
    forcefield_path: Option<PathBuf>,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_conformers(mut self, n: usize) -> Self {
        self.num_conformers = Some(n);
        self
    }
    pub fn prune_rms_threshold(mut self, threshold: f64) -> Self {
        self.prune_rms_threshold = Some(threshold);
        self
    }
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
    pub fn optimize(mut self, enabled: bool) -> Self {
        self.optimize = Some(enabled);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn forcefield_path(mut self, path: PathBuf) -> Self {
        self.forcefield_path = Some(path);
        self
    }

    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        let defaults = GenerationConfig::default();

        let prune_rms_threshold = self
            .prune_rms_threshold
            .unwrap_or(defaults.embedding.prune_rms_threshold);
        if !prune_rms_threshold.is_finite() {
            return Err(ConfigError::InvalidParameter {
                parameter: "prune_rms_threshold",
                reason: "must be a finite number",
            });
        }

        let max_attempts = self
            .max_attempts
            .unwrap_or(defaults.embedding.max_attempts);
        if max_attempts == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_attempts",
                reason: "must be at least 1",
            });
        }

        let embedding = EmbeddingConfig {
            num_conformers: self
                .num_conformers
                .unwrap_or(defaults.embedding.num_conformers),
            prune_rms_threshold,
            random_seed: self.random_seed.unwrap_or(defaults.embedding.random_seed),
            max_attempts,
        };
        let optimization = OptimizationConfig {
            enabled: self.optimize.unwrap_or(defaults.optimization.enabled),
            max_iterations: self
                .max_iterations
                .unwrap_or(defaults.optimization.max_iterations),
            forcefield_path: self.forcefield_path,
        };
        Ok(GenerationConfig {
            embedding,
            optimization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_yields_defaults() {
        let config = GenerationConfigBuilder::new().build().unwrap();
        assert_eq!(config, GenerationConfig::default());
        assert_eq!(config.embedding.num_conformers, 5000);
        assert_eq!(config.embedding.random_seed, 0xf00d);
        assert_eq!(config.embedding.prune_rms_threshold, 0.5);
        assert!(config.optimization.enabled);
        assert_eq!(config.optimization.max_iterations, 200);
        assert!(config.optimization.forcefield_path.is_none());
    }

    #[test]
    fn setters_override_defaults() {
        let config = GenerationConfigBuilder::new()
            .num_conformers(12)
            .prune_rms_threshold(0.0)
            .random_seed(42)
            .max_attempts(3)
            .optimize(false)
            .max_iterations(50)
            .forcefield_path(PathBuf::from("ff.toml"))
            .build()
            .unwrap();
        assert_eq!(config.embedding.num_conformers, 12);
        assert_eq!(config.embedding.prune_rms_threshold, 0.0);
        assert_eq!(config.embedding.random_seed, 42);
        assert_eq!(config.embedding.max_attempts, 3);
        assert!(!config.optimization.enabled);
        assert_eq!(config.optimization.max_iterations, 50);
        assert_eq!(
            config.optimization.forcefield_path.as_deref(),
            Some(std::path::Path::new("ff.toml"))
        );
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = GenerationConfigBuilder::new()
            .max_attempts(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                parameter: "max_attempts",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_threshold() {
        assert!(
            GenerationConfigBuilder::new()
                .prune_rms_threshold(f64::NAN)
                .build()
                .is_err()
        );
    }
}
