//! Distance-geometry embedding of a molecular graph into 3D coordinates.
//!
//! Setup happens once per molecule: hybridization perception, the bounds
//! matrix with triangle smoothing, and chiral constraints from the input
//! coordinates. Every attempt then samples a distance matrix inside the
//! bounds, turns it into coordinates through the metric matrix, fixes the
//! overall handedness and refines the result against the distance-geometry
//! error function before checking it against acceptance tolerances.

pub mod bounds;
pub mod chirality;
mod metric;
mod refine;

use self::bounds::BoundsMatrix;
use self::chirality::ChiralConstraint;
use self::refine::{DistanceGeometryError, DistanceWindow};
use crate::core::minimizer::{MinimizerSettings, flatten_positions, minimize, unflatten_positions};
use crate::core::models::molecule::Molecule;
use crate::core::topology::hybridization;
use crate::core::utils::geometry::centroid;
use nalgebra::Point3;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument, trace};

const REFINEMENT: MinimizerSettings = MinimizerSettings {
    max_iterations: 1000,
    gradient_tolerance: 1e-4,
    energy_tolerance: 1e-10,
    max_step: 0.3,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("Distance bounds are inconsistent even without van der Waals lower bounds")]
    InconsistentBounds,
}

/// Why a single embedding attempt was discarded.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AttemptFailure {
    #[error("metric matrix has no positive eigenvalue")]
    DegenerateMetric,
    #[error("refinement produced a non-finite error")]
    NonFinite,
    #[error("distance {i}-{j} misses its bounds by {violation:.3} A")]
    BoundsViolated { i: usize, j: usize, violation: f64 },
    #[error("chiral center {center} has the wrong handedness")]
    ChiralityInverted { center: usize },
}

/// Reusable embedding state for one molecule.
#[derive(Debug, Clone)]
pub struct Embedder {
    bounds: BoundsMatrix,
    windows: Vec<DistanceWindow>,
    chiral: Vec<ChiralConstraint>,
}

impl Embedder {
    /// Prepares smoothed bounds and chiral constraints for `molecule`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InconsistentBounds`] when the bounds violate
    /// the triangle inequality even after the van der Waals lower bounds are
    /// dropped.
    #[instrument(skip_all, name = "embedder_setup", fields(atoms = molecule.atom_count()))]
    pub fn new(molecule: &Molecule) -> Result<Self, EmbeddingError> {
        let hybridization = hybridization::perceive(molecule);

        let mut bounds = BoundsMatrix::build(molecule, &hybridization, true);
        if !bounds.smooth() {
            debug!("Van der Waals lower bounds are inconsistent; rebuilding without them.");
            bounds = BoundsMatrix::build(molecule, &hybridization, false);
            if !bounds.smooth() {
                return Err(EmbeddingError::InconsistentBounds);
            }
        }

        let chiral = chirality::perceive(molecule, &hybridization);
        debug!(chiral_centers = chiral.len(), "Distance bounds ready.");

        Ok(Self {
            windows: refine::windows(&bounds),
            bounds,
            chiral,
        })
    }

    pub fn chiral_constraints(&self) -> &[ChiralConstraint] {
        &self.chiral
    }

    /// Runs one embedding attempt, consuming randomness from `rng`.
    ///
    /// The returned coordinates are centered on their centroid.
    pub fn embed<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Point3<f64>>, AttemptFailure> {
        match self.bounds.len() {
            0 => return Ok(Vec::new()),
            1 => return Ok(vec![Point3::origin()]),
            _ => {}
        }

        let distances = metric::sample_distances(&self.bounds, rng);
        let mut positions = metric::coordinates_from_distances(&distances)
            .ok_or(AttemptFailure::DegenerateMetric)?;

        let inverted = self
            .chiral
            .iter()
            .filter(|c| !c.is_satisfied(&positions))
            .count();
        if 2 * inverted > self.chiral.len() {
            for p in &mut positions {
                p.z = -p.z;
            }
        }

        let objective = DistanceGeometryError::new(&self.windows, &self.chiral);
        let mut x = flatten_positions(&positions);
        let report = minimize(&objective, &mut x, &REFINEMENT);
        if !report.final_energy.is_finite() {
            return Err(AttemptFailure::NonFinite);
        }
        trace!(
            error = report.final_energy,
            iterations = report.iterations,
            "Refined embedding."
        );

        let mut positions = unflatten_positions(&x);
        refine::check(&self.windows, &self.chiral, &positions)?;

        let center = centroid(&positions).coords;
        for p in &mut positions {
            *p -= center;
        }
        Ok(positions)
    }
}
