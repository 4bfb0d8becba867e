use crate::core::forcefield::parameterization::{ForcefieldModel, Parameterizer};
use crate::core::forcefield::params::Forcefield;
use crate::core::hydrogens::add_hydrogens;
use crate::core::models::molecule::Molecule;
use crate::engine::config::GenerationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use crate::engine::tasks::embedding::EmbeddingStats;
use crate::engine::tasks::optimization::OptimizationOutcome;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub hydrogens_added: usize,
    pub embedding: EmbeddingStats,
    /// One entry per optimized conformer, empty when optimization is disabled.
    pub optimization: Vec<OptimizationOutcome>,
}

impl GenerationSummary {
    pub fn conformer_count(&self) -> usize {
        self.embedding.accepted
    }
}

/// Generates conformers for `molecule` in place.
///
/// Existing conformers are discarded, missing hydrogens are made explicit,
/// then up to `config.embedding.num_conformers` distinct conformers are
/// embedded and, when enabled, relaxed under the force field. The force field
/// is prepared before embedding starts so that an unsupported molecule fails
/// fast.
///
/// # Errors
///
/// Fails when hydrogens cannot be added, when the force field cannot be
/// loaded or does not cover every element, or when the distance bounds of the
/// molecule are inconsistent. Failing to embed some or all slots is not an
/// error; the summary reports how many conformers were accepted.
#[instrument(skip_all, name = "generation_workflow", fields(molecule = molecule.name()))]
pub fn run(
    molecule: &mut Molecule,
    config: &GenerationConfig,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, EngineError> {
    // === Phase 0: Preparation ===
    let (hydrogens_added, model) = reporter.phase("Preparation", || {
        info!("Completing hydrogens and preparing the force field.");
        molecule.clear_conformers();
        let added = add_hydrogens(molecule)?;
        let model = if config.optimization.enabled {
            Some(prepare_forcefield(molecule, config)?)
        } else {
            None
        };
        info!(
            hydrogens_added = added,
            atoms = molecule.atom_count(),
            "Molecule prepared."
        );
        Ok::<_, EngineError>((added, model))
    })?;

    // === Phase 1: Distance-geometry embedding ===
    let embedding = reporter.phase("Conformer Embedding", || {
        tasks::embedding::run(molecule, &config.embedding, reporter)
    })?;
    if embedding.accepted == 0 && embedding.requested > 0 {
        reporter.report(Progress::Message(format!(
            "No conformer could be embedded in {} slots; the output will be empty.",
            embedding.requested
        )));
    }

    // === Phase 2: Force field optimization (optional) ===
    let optimization = match &model {
        Some(model) => reporter.phase("Force Field Optimization", || {
            Ok::<_, EngineError>(tasks::optimization::run(
                molecule,
                model,
                config.optimization.max_iterations,
                reporter,
            ))
        })?,
        None => {
            info!("Force field optimization disabled; keeping embedded coordinates.");
            Vec::new()
        }
    };

    let summary = GenerationSummary {
        hydrogens_added,
        embedding,
        optimization,
    };
    info!(
        conformers = summary.conformer_count(),
        requested = config.embedding.num_conformers,
        "Workflow complete."
    );
    Ok(summary)
}

fn prepare_forcefield(
    molecule: &Molecule,
    config: &GenerationConfig,
) -> Result<ForcefieldModel, EngineError> {
    let forcefield = match &config.optimization.forcefield_path {
        Some(path) => {
            info!(path = %path.display(), "Loading force field parameters.");
            Forcefield::load(path)?
        }
        None => Forcefield::builtin()?,
    };
    Ok(Parameterizer::new(&forcefield).parameterize(molecule)?)
}
