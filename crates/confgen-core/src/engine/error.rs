use thiserror::Error;

use super::config::ConfigError;
use super::embedding::EmbeddingError;
use crate::core::forcefield::parameterization::ParameterizationError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::hydrogens::HydrogenError;
use crate::core::models::molecule::MoleculeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Hydrogen completion failed: {source}")]
    Hydrogens {
        #[from]
        source: HydrogenError,
    },

    #[error("Failed to load force field parameters: {source}")]
    ForcefieldLoad {
        #[from]
        source: ParamLoadError,
    },

    #[error("Force field cannot describe this molecule: {source}")]
    Parameterization {
        #[from]
        source: ParameterizationError,
    },

    #[error("Distance geometry setup failed: {source}")]
    Embedding {
        #[from]
        source: EmbeddingError,
    },

    #[error("Molecule update failed: {source}")]
    Molecule {
        #[from]
        source: MoleculeError,
    },
}
