use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use confgen::engine::config::{GenerationConfig, GenerationConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialEmbeddingConfig {
    num_conformers: Option<usize>,
    prune_rms_threshold: Option<f64>,
    random_seed: Option<u64>,
    max_attempts: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOptimizationConfig {
    enabled: Option<bool>,
    max_iterations: Option<usize>,
    forcefield_path: Option<PathBuf>,
}

/// Settings read from a TOML configuration file. Every key is optional; what
/// is absent falls through to the command line or the built-in defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGenerationConfig {
    #[serde(default)]
    embedding: PartialEmbeddingConfig,
    #[serde(default)]
    optimization: PartialOptimizationConfig,
}

impl PartialGenerationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut partial: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        // Relative force-field paths are taken relative to the config file.
        if let (Some(ff), Some(base)) = (
            partial.optimization.forcefield_path.as_mut(),
            path.parent(),
        ) {
            if ff.is_relative() {
                *ff = base.join(&*ff);
            }
        }
        Ok(partial)
    }

    /// Loads `args.config` when present, otherwise starts from an empty file.
    pub fn load(args: &GenerateArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration with precedence CLI > file > defaults.
    pub fn merge_with_cli(self, args: &GenerateArgs) -> Result<GenerationConfig> {
        let embedding = self.embedding;
        let optimization = self.optimization;

        let mut builder = GenerationConfigBuilder::new();

        if let Some(n) = args.num_conformers.or(embedding.num_conformers) {
            builder = builder.num_conformers(n);
        }
        if let Some(threshold) = args.prune_rms_threshold.or(embedding.prune_rms_threshold) {
            builder = builder.prune_rms_threshold(threshold);
        }
        if let Some(seed) = args.seed.or(embedding.random_seed) {
            builder = builder.random_seed(seed);
        }
        if let Some(attempts) = args.max_attempts.or(embedding.max_attempts) {
            builder = builder.max_attempts(attempts);
        }

        if args.no_optimize {
            builder = builder.optimize(false);
        } else if let Some(enabled) = optimization.enabled {
            builder = builder.optimize(enabled);
        }
        if let Some(iterations) = args.max_iterations.or(optimization.max_iterations) {
            builder = builder.max_iterations(iterations);
        }
        if let Some(path) = args.forcefield.clone().or(optimization.forcefield_path) {
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Force-field file does not exist: {}", path.display()),
                )));
            }
            builder = builder.forcefield_path(path);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }
}
