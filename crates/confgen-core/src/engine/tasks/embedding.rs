use crate::core::models::conformer::{Conformer, ConformerId};
use crate::core::models::molecule::Molecule;
use crate::engine::config::EmbeddingConfig;
use crate::engine::embedding::Embedder;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::pruning::RmsdPruner;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, trace, warn};

/// Tally of what happened to the embedding slots of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddingStats {
    pub requested: usize,
    pub accepted: usize,
    pub pruned: usize,
    pub failed: usize,
}

/// Replaces the conformers of `molecule` with freshly embedded ones.
///
/// Slots are filled in order from one RNG seeded with `config.random_seed`.
/// A slot whose every attempt fails is skipped; a successful embedding that
/// duplicates an accepted conformer is discarded without a retry. Accepted
/// conformers are numbered from zero in acceptance order.
#[instrument(skip_all, name = "embedding_task", fields(slots = config.num_conformers))]
pub fn run(
    molecule: &mut Molecule,
    config: &EmbeddingConfig,
    reporter: &ProgressReporter,
) -> Result<EmbeddingStats, EngineError> {
    let embedder = Embedder::new(molecule)?;
    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let mut pruner = RmsdPruner::new(molecule, config.prune_rms_threshold);
    let mut stats = EmbeddingStats {
        requested: config.num_conformers,
        ..Default::default()
    };

    molecule.clear_conformers();
    info!(
        seed = config.random_seed,
        prune_threshold = config.prune_rms_threshold,
        "Embedding conformers."
    );
    reporter.report(Progress::TaskStart {
        total_steps: config.num_conformers as u64,
    });

    for slot in 0..config.num_conformers {
        let embedded = (0..config.max_attempts).find_map(|attempt| {
            match embedder.embed(&mut rng) {
                Ok(positions) => Some(positions),
                Err(reason) => {
                    trace!(slot, attempt, %reason, "Embedding attempt rejected.");
                    None
                }
            }
        });

        match embedded {
            None => {
                stats.failed += 1;
                debug!(slot, attempts = config.max_attempts, "Slot gave up.");
            }
            Some(positions) if pruner.accept(&positions) => {
                let id = ConformerId(stats.accepted as u32);
                molecule.add_conformer(Conformer::new(id, positions))?;
                stats.accepted += 1;
                debug!(slot, %id, "Conformer accepted.");
            }
            Some(_) => {
                stats.pruned += 1;
                debug!(slot, "Conformer pruned as a duplicate.");
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    if stats.accepted == 0 && stats.requested > 0 {
        warn!(failed = stats.failed, "No conformer could be embedded.");
    }
    info!(
        accepted = stats.accepted,
        pruned = stats.pruned,
        failed = stats.failed,
        "Embedding finished."
    );
    Ok(stats)
}
