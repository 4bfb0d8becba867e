use crate::core::forcefield::parameterization::ForcefieldModel;
use crate::core::minimizer::{MinimizerSettings, flatten_positions, minimize, unflatten_positions};
use crate::core::models::conformer::ConformerId;
use crate::core::models::molecule::Molecule;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of relaxing one conformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationOutcome {
    pub id: ConformerId,
    pub initial_energy: f64,
    pub energy: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn relax(
    model: &ForcefieldModel,
    id: ConformerId,
    positions: &[Point3<f64>],
    settings: &MinimizerSettings,
) -> (OptimizationOutcome, Vec<Point3<f64>>) {
    let mut x = flatten_positions(positions);
    let report = minimize(model, &mut x, settings);
    let outcome = OptimizationOutcome {
        id,
        initial_energy: report.initial_energy,
        energy: report.final_energy,
        iterations: report.iterations,
        converged: report.converged,
    };
    (outcome, unflatten_positions(&x))
}

/// Minimizes every conformer of `molecule` under `model`, in place.
///
/// Each conformer is relaxed independently and receives its final energy.
/// Running out of iterations is not an error: the partially relaxed
/// coordinates are kept and the outcome is marked as not converged.
#[instrument(skip_all, name = "optimization_task", fields(conformers = molecule.conformer_count()))]
pub fn run(
    molecule: &mut Molecule,
    model: &ForcefieldModel,
    max_iterations: usize,
    reporter: &ProgressReporter,
) -> Vec<OptimizationOutcome> {
    let settings = MinimizerSettings {
        max_iterations,
        ..Default::default()
    };
    let work: Vec<(ConformerId, Vec<Point3<f64>>)> = molecule
        .conformers()
        .map(|c| (c.id(), c.positions().to_vec()))
        .collect();

    info!(max_iterations, "Optimizing conformers with the force field.");
    reporter.report(Progress::TaskStart {
        total_steps: work.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = work.iter();

    #[cfg(feature = "parallel")]
    let iterator = work.par_iter();

    let relaxed: Vec<(OptimizationOutcome, Vec<Point3<f64>>)> = iterator
        .map(|(id, positions)| {
            let result = relax(model, *id, positions, &settings);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut outcomes = Vec::with_capacity(relaxed.len());
    for (outcome, positions) in relaxed {
        let Some(conformer) = molecule.conformer_mut(outcome.id) else {
            continue;
        };
        if outcome.energy.is_finite() {
            conformer.positions_mut().copy_from_slice(&positions);
            conformer.set_energy(outcome.energy);
        } else {
            warn!(id = %outcome.id, "Force field energy is not finite; keeping embedded coordinates.");
        }
        if !outcome.converged {
            debug!(
                id = %outcome.id,
                iterations = outcome.iterations,
                energy = outcome.energy,
                "Minimization stopped before convergence."
            );
        }
        outcomes.push(outcome);
    }

    let converged = outcomes.iter().filter(|o| o.converged).count();
    info!(
        converged,
        total = outcomes.len(),
        "Optimization finished."
    );
    outcomes
}
