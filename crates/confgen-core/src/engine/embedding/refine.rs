use super::AttemptFailure;
use super::bounds::{BoundsMatrix, Separation};
use super::chirality::ChiralConstraint;
use crate::core::minimizer::Objective;
use itertools::Itertools;
use nalgebra::{DVector, Point3, Vector3};

/// Signed volume a chiral center must reach on its side of the plane.
const CHIRAL_VOLUME_TARGET: f64 = 0.5;
const CHIRAL_WEIGHT: f64 = 1.0;

const BOND_TOLERANCE: f64 = 0.1;
const ANGLE_TOLERANCE: f64 = 0.15;
const DISTANCE_TOLERANCE: f64 = 0.5;

/// A distance window with the violation an accepted conformer may show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DistanceWindow {
    pub i: usize,
    pub j: usize,
    pub lower: f64,
    pub upper: f64,
    pub tolerance: f64,
}

impl DistanceWindow {
    fn violation(&self, distance: f64) -> f64 {
        (self.lower - distance).max(distance - self.upper).max(0.0)
    }
}

pub(crate) fn windows(bounds: &BoundsMatrix) -> Vec<DistanceWindow> {
    (0..bounds.len())
        .tuple_combinations()
        .map(|(i, j)| DistanceWindow {
            i,
            j,
            lower: bounds.lower(i, j),
            upper: bounds.upper(i, j),
            tolerance: match bounds.separation(i, j) {
                Separation::OneTwo => BOND_TOLERANCE,
                Separation::OneThree => ANGLE_TOLERANCE,
                Separation::OneFour | Separation::Remote => DISTANCE_TOLERANCE,
            },
        })
        .collect()
}

/// Distance-geometry error function.
///
/// Each pair contributes `(d²/u² - 1)²` above its upper bound and
/// `(2l²/(l² + d²) - 1)²` below its lower bound. Chiral centers contribute a
/// harmonic penalty while their signed volume is short of the target on the
/// required side.
pub(crate) struct DistanceGeometryError<'a> {
    windows: &'a [DistanceWindow],
    chiral: &'a [ChiralConstraint],
}

impl<'a> DistanceGeometryError<'a> {
    pub fn new(windows: &'a [DistanceWindow], chiral: &'a [ChiralConstraint]) -> Self {
        Self { windows, chiral }
    }
}

fn point(x: &DVector<f64>, atom: usize) -> Vector3<f64> {
    Vector3::new(x[3 * atom], x[3 * atom + 1], x[3 * atom + 2])
}

fn add_to(gradient: &mut DVector<f64>, atom: usize, g: &Vector3<f64>) {
    gradient[3 * atom] += g.x;
    gradient[3 * atom + 1] += g.y;
    gradient[3 * atom + 2] += g.z;
}

impl Objective for DistanceGeometryError<'_> {
    fn evaluate(&self, x: &DVector<f64>, gradient: &mut DVector<f64>) -> f64 {
        gradient.fill(0.0);
        let mut error = 0.0;

        for w in self.windows {
            let diff = point(x, w.i) - point(x, w.j);
            let d2 = diff.norm_squared();
            let u2 = w.upper * w.upper;
            let factor = if d2 > u2 {
                let v = d2 / u2 - 1.0;
                error += v * v;
                4.0 * v / u2
            } else if w.lower > 0.0 {
                let l2 = w.lower * w.lower;
                if d2 < l2 {
                    let s = l2 + d2;
                    let v = 2.0 * l2 / s - 1.0;
                    error += v * v;
                    -8.0 * v * l2 / (s * s)
                } else {
                    0.0
                }
            } else {
                0.0
            };
            if factor != 0.0 {
                let g = diff * factor;
                add_to(gradient, w.i, &g);
                add_to(gradient, w.j, &-g);
            }
        }

        for c in self.chiral {
            let center = point(x, c.center);
            let a = point(x, c.neighbors[0]) - center;
            let b = point(x, c.neighbors[1]) - center;
            let d = point(x, c.neighbors[2]) - center;
            let volume = a.dot(&b.cross(&d));
            let target = c.sign * CHIRAL_VOLUME_TARGET;
            let short = if c.sign > 0.0 {
                volume < target
            } else {
                volume > target
            };
            if !short {
                continue;
            }
            let deviation = volume - target;
            error += CHIRAL_WEIGHT * deviation * deviation;

            let scale = 2.0 * CHIRAL_WEIGHT * deviation;
            let ga = b.cross(&d) * scale;
            let gb = d.cross(&a) * scale;
            let gd = a.cross(&b) * scale;
            add_to(gradient, c.neighbors[0], &ga);
            add_to(gradient, c.neighbors[1], &gb);
            add_to(gradient, c.neighbors[2], &gd);
            add_to(gradient, c.center, &-(ga + gb + gd));
        }

        error
    }
}

/// Checks a refined geometry against the acceptance tolerances.
pub(crate) fn check(
    windows: &[DistanceWindow],
    chiral: &[ChiralConstraint],
    positions: &[Point3<f64>],
) -> Result<(), AttemptFailure> {
    for w in windows {
        let distance = (positions[w.i] - positions[w.j]).norm();
        let violation = w.violation(distance);
        if violation.is_nan() || violation > w.tolerance {
            return Err(AttemptFailure::BoundsViolated {
                i: w.i,
                j: w.j,
                violation,
            });
        }
    }
    if let Some(c) = chiral.iter().find(|c| !c.is_satisfied(positions)) {
        return Err(AttemptFailure::ChiralityInverted { center: c.center });
    }
    Ok(())
}
