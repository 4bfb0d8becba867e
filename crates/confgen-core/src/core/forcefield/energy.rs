use super::parameterization::{AngleForm, AngleTerm, ForcefieldModel, TorsionTerm};
use super::potentials;
use super::term::EnergyTerm;
use crate::core::minimizer::{Objective, unflatten_positions, write_flat_gradient};
use nalgebra::{DVector, Point3, Vector3};

const DEGENERATE: f64 = 1e-10;

fn angle_contribution(
    term: &AngleTerm,
    positions: &[Point3<f64>],
    gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let u = positions[term.i] - positions[term.j];
    let v = positions[term.k] - positions[term.j];
    let (nu, nv) = (u.norm(), v.norm());
    if nu < DEGENERATE || nv < DEGENERATE {
        return 0.0;
    }
    let cos_theta = (u.dot(&v) / (nu * nv)).clamp(-1.0, 1.0);

    let (energy, de_dc) = match term.form {
        AngleForm::HarmonicCosine { theta0 } => {
            potentials::harmonic_cosine_angle(cos_theta, theta0, term.force_constant)
        }
        AngleForm::Linear => potentials::linear_angle(cos_theta, term.force_constant),
        AngleForm::Octahedral => potentials::octahedral_angle(cos_theta, term.force_constant),
    };

    if let Some(grad) = gradient {
        let dc_di = v / (nu * nv) - u * (cos_theta / (nu * nu));
        let dc_dk = u / (nu * nv) - v * (cos_theta / (nv * nv));
        grad[term.i] += dc_di * de_dc;
        grad[term.k] += dc_dk * de_dc;
        grad[term.j] -= (dc_di + dc_dk) * de_dc;
    }
    energy
}

fn torsion_contribution(
    term: &TorsionTerm,
    positions: &[Point3<f64>],
    gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let f = positions[term.i] - positions[term.j];
    let g = positions[term.j] - positions[term.k];
    let h = positions[term.l] - positions[term.k];
    let a = f.cross(&g);
    let b = h.cross(&g);
    let (a2, b2, gn) = (a.norm_squared(), b.norm_squared(), g.norm());
    if a2 < DEGENERATE || b2 < DEGENERATE || gn < DEGENERATE {
        return 0.0;
    }
    let phi = (b.cross(&a).dot(&g) / gn).atan2(a.dot(&b));
    let (energy, de_dphi) =
        potentials::cosine_torsion(phi, term.barrier, term.periodicity, term.phase);

    if let Some(grad) = gradient {
        let fg = f.dot(&g);
        let hg = h.dot(&g);
        let gi = -a * (gn / a2);
        let gl = b * (gn / b2);
        let gj = a * (gn / a2) + a * (fg / (a2 * gn)) - b * (hg / (b2 * gn));
        let gk = b * (hg / (b2 * gn)) - a * (fg / (a2 * gn)) - b * (gn / b2);
        grad[term.i] += gi * de_dphi;
        grad[term.j] += gj * de_dphi;
        grad[term.k] += gk * de_dphi;
        grad[term.l] += gl * de_dphi;
    }
    energy
}

impl ForcefieldModel {
    /// Energy of a set of coordinates, broken down by term.
    pub fn energy(&self, positions: &[Point3<f64>]) -> EnergyTerm {
        self.accumulate(positions, None)
    }

    /// Energy and Cartesian gradient; `gradient` is overwritten.
    pub fn energy_with_gradient(
        &self,
        positions: &[Point3<f64>],
        gradient: &mut [Vector3<f64>],
    ) -> EnergyTerm {
        gradient.iter_mut().for_each(|g| *g = Vector3::zeros());
        self.accumulate(positions, Some(gradient))
    }

    fn accumulate(
        &self,
        positions: &[Point3<f64>],
        mut gradient: Option<&mut [Vector3<f64>]>,
    ) -> EnergyTerm {
        let mut total = EnergyTerm::default();

        for bond in &self.bonds {
            let d = positions[bond.i] - positions[bond.j];
            let r = d.norm();
            let (e, de_dr) = potentials::harmonic_bond(r, bond.rest_length, bond.force_constant);
            total.bond += e;
            if let Some(grad) = gradient.as_deref_mut() {
                if r > DEGENERATE {
                    let g = d * (de_dr / r);
                    grad[bond.i] += g;
                    grad[bond.j] -= g;
                }
            }
        }

        for angle in &self.angles {
            total.angle += angle_contribution(angle, positions, gradient.as_deref_mut());
        }

        for torsion in &self.torsions {
            total.torsion += torsion_contribution(torsion, positions, gradient.as_deref_mut());
        }

        for pair in &self.vdw_pairs {
            let d = positions[pair.i] - positions[pair.j];
            let r = d.norm();
            let (e, de_dr) =
                potentials::lennard_jones_12_6_with_derivative(r, pair.r_min, pair.well_depth);
            total.vdw += e;
            if let Some(grad) = gradient.as_deref_mut() {
                if r > DEGENERATE {
                    let g = d * (de_dr / r);
                    grad[pair.i] += g;
                    grad[pair.j] -= g;
                }
            }
        }

        total
    }
}

impl Objective for ForcefieldModel {
    fn evaluate(&self, x: &DVector<f64>, gradient: &mut DVector<f64>) -> f64 {
        let positions = unflatten_positions(x);
        let mut grad = vec![Vector3::zeros(); positions.len()];
        let energy = self.energy_with_gradient(&positions, &mut grad).total();
        write_flat_gradient(&grad, gradient);
        energy
    }
}
