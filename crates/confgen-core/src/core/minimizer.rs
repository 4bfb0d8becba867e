use nalgebra::{DVector, Point3, Vector3};
use tracing::trace;

const ARMIJO_C1: f64 = 1e-4;
const BACKTRACK_FACTOR: f64 = 0.5;
const MIN_DISPLACEMENT: f64 = 1e-12;

/// A differentiable scalar function of a flat coordinate vector.
pub trait Objective {
    /// Evaluates the function at `x`, writing the gradient into `gradient`.
    fn evaluate(&self, x: &DVector<f64>, gradient: &mut DVector<f64>) -> f64;

    fn value(&self, x: &DVector<f64>) -> f64 {
        let mut scratch = DVector::zeros(x.len());
        self.evaluate(x, &mut scratch)
    }
}

/// Packs positions into `[x0, y0, z0, x1, ...]`.
pub fn flatten_positions(positions: &[Point3<f64>]) -> DVector<f64> {
    DVector::from_iterator(
        positions.len() * 3,
        positions.iter().flat_map(|p| [p.x, p.y, p.z]),
    )
}

pub fn unflatten_positions(x: &DVector<f64>) -> Vec<Point3<f64>> {
    x.as_slice()
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect()
}

/// Copies per-atom gradient vectors into a flat gradient of matching length.
pub fn write_flat_gradient(per_atom: &[Vector3<f64>], flat: &mut DVector<f64>) {
    for (atom, g) in per_atom.iter().enumerate() {
        flat[3 * atom] = g.x;
        flat[3 * atom + 1] = g.y;
        flat[3 * atom + 2] = g.z;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerSettings {
    pub max_iterations: usize,
    /// Convergence threshold on the root-mean-square gradient component.
    pub gradient_tolerance: f64,
    /// Convergence threshold on the relative energy change of one step.
    pub energy_tolerance: f64,
    /// Largest displacement of any single coordinate in one line-search trial.
    pub max_step: f64,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            gradient_tolerance: 1e-3,
            energy_tolerance: 1e-8,
            max_step: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationReport {
    pub initial_energy: f64,
    pub final_energy: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn rms(v: &DVector<f64>) -> f64 {
    if v.is_empty() {
        0.0
    } else {
        (v.norm_squared() / v.len() as f64).sqrt()
    }
}

/// Minimizes `objective` starting from `x`, which holds the final point on return.
///
/// Polak-Ribière (PR+) nonlinear conjugate gradient with an Armijo
/// backtracking line search. The search direction is reset to steepest
/// descent whenever it stops being a descent direction. Minimization stops
/// when the gradient or the energy change falls below tolerance, when the
/// iteration budget runs out, or when the energy stops being finite.
pub fn minimize(
    objective: &impl Objective,
    x: &mut DVector<f64>,
    settings: &MinimizerSettings,
) -> MinimizationReport {
    let n = x.len();
    let mut gradient = DVector::zeros(n);
    let mut energy = objective.evaluate(x, &mut gradient);
    let mut report = MinimizationReport {
        initial_energy: energy,
        final_energy: energy,
        iterations: 0,
        converged: false,
    };
    if !energy.is_finite() {
        return report;
    }

    let mut direction = -&gradient;
    let mut trial = DVector::zeros(n);
    let mut trial_gradient = DVector::zeros(n);
    let mut previous_alpha = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        if rms(&gradient) < settings.gradient_tolerance {
            report.converged = true;
            break;
        }

        let mut slope = gradient.dot(&direction);
        if slope >= 0.0 {
            direction = -&gradient;
            slope = -gradient.norm_squared();
        }
        let largest = direction.amax();
        if largest <= 0.0 {
            report.converged = true;
            break;
        }

        let mut alpha = (2.0 * previous_alpha).min(settings.max_step / largest);
        let accepted = loop {
            trial.copy_from(x);
            trial.axpy(alpha, &direction, 1.0);
            let trial_energy = objective.evaluate(&trial, &mut trial_gradient);
            if trial_energy.is_finite() && trial_energy <= energy + ARMIJO_C1 * alpha * slope {
                break Some(trial_energy);
            }
            alpha *= BACKTRACK_FACTOR;
            if alpha * largest < MIN_DISPLACEMENT {
                break None;
            }
        };

        let Some(new_energy) = accepted else {
            trace!(iteration, energy, "Line search stalled.");
            report.iterations = iteration;
            break;
        };

        let beta = {
            let denom = gradient.norm_squared();
            if denom > 0.0 {
                (trial_gradient.dot(&trial_gradient) - trial_gradient.dot(&gradient)) / denom
            } else {
                0.0
            }
        }
        .max(0.0);

        let delta = (energy - new_energy).abs();
        x.copy_from(&trial);
        std::mem::swap(&mut gradient, &mut trial_gradient);
        direction *= beta;
        direction -= &gradient;
        energy = new_energy;
        previous_alpha = alpha;
        report.iterations = iteration;

        if delta <= settings.energy_tolerance * energy.abs().max(1.0) {
            report.converged = true;
            break;
        }
    }

    report.final_energy = energy;
    trace!(
        iterations = report.iterations,
        initial = report.initial_energy,
        energy,
        converged = report.converged,
        "Minimization finished."
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bowl {
        center: DVector<f64>,
        stiffness: DVector<f64>,
    }

    impl Objective for Bowl {
        fn evaluate(&self, x: &DVector<f64>, gradient: &mut DVector<f64>) -> f64 {
            let mut e = 0.0;
            for i in 0..x.len() {
                let d = x[i] - self.center[i];
                e += 0.5 * self.stiffness[i] * d * d;
                gradient[i] = self.stiffness[i] * d;
            }
            e
        }
    }

    struct Rosenbrock;

    impl Objective for Rosenbrock {
        fn evaluate(&self, x: &DVector<f64>, gradient: &mut DVector<f64>) -> f64 {
            let (a, b) = (x[0], x[1]);
            gradient[0] = -2.0 * (1.0 - a) - 400.0 * a * (b - a * a);
            gradient[1] = 200.0 * (b - a * a);
            (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2)
        }
    }

    struct NotANumber;

    impl Objective for NotANumber {
        fn evaluate(&self, _x: &DVector<f64>, _gradient: &mut DVector<f64>) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn converges_to_minimum_of_anisotropic_bowl() {
        let bowl = Bowl {
            center: DVector::from_vec(vec![1.0, -2.0, 0.5]),
            stiffness: DVector::from_vec(vec![1.0, 10.0, 100.0]),
        };
        let mut x = DVector::zeros(3);
        let settings = MinimizerSettings {
            max_iterations: 500,
            gradient_tolerance: 1e-8,
            energy_tolerance: 0.0,
            ..Default::default()
        };
        let report = minimize(&bowl, &mut x, &settings);

        assert!(report.converged);
        assert!(report.final_energy < 1e-12);
        assert!((&x - &bowl.center).amax() < 1e-6);
    }

    #[test]
    fn energy_never_increases_on_rosenbrock() {
        let mut x = DVector::from_vec(vec![-1.2, 1.0]);
        let settings = MinimizerSettings {
            max_iterations: 2000,
            gradient_tolerance: 1e-6,
            energy_tolerance: 0.0,
            ..Default::default()
        };
        let report = minimize(&Rosenbrock, &mut x, &settings);
        assert!(report.final_energy <= report.initial_energy);
        assert!(report.final_energy < 1e-2);
        assert!((Rosenbrock.value(&x) - report.final_energy).abs() < 1e-12);
    }

    #[test]
    fn respects_iteration_budget() {
        let mut x = DVector::from_vec(vec![-1.2, 1.0]);
        let settings = MinimizerSettings {
            max_iterations: 3,
            gradient_tolerance: 0.0,
            energy_tolerance: 0.0,
            ..Default::default()
        };
        let report = minimize(&Rosenbrock, &mut x, &settings);
        assert_eq!(report.iterations, 3);
        assert!(!report.converged);
    }

    #[test]
    fn stops_immediately_on_non_finite_energy() {
        let mut x = DVector::from_vec(vec![0.0, 0.0]);
        let report = minimize(&NotANumber, &mut x, &MinimizerSettings::default());
        assert_eq!(report.iterations, 0);
        assert!(!report.converged);
        assert_eq!(x, DVector::from_vec(vec![0.0, 0.0]));
    }

    #[test]
    fn flat_coordinates_round_trip_positions() {
        let positions = vec![Point3::new(1.0, 2.0, 3.0), Point3::new(-4.0, 5.0, -6.0)];
        let flat = flatten_positions(&positions);
        assert_eq!(flat.as_slice(), &[1.0, 2.0, 3.0, -4.0, 5.0, -6.0]);
        assert_eq!(unflatten_positions(&flat), positions);

        let mut gradient = DVector::zeros(6);
        write_flat_gradient(&[Vector3::new(0.5, 0.0, 0.0), Vector3::z()], &mut gradient);
        assert_eq!(gradient.as_slice(), &[0.5, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_problem_is_trivially_converged() {
        let bowl = Bowl {
            center: DVector::zeros(0),
            stiffness: DVector::zeros(0),
        };
        let mut x = DVector::zeros(0);
        let report = minimize(&bowl, &mut x, &MinimizerSettings::default());
        assert!(report.converged);
        assert_eq!(report.iterations, 0);
    }
}
