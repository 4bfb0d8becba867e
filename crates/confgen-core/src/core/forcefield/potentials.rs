//! Functional forms of the force-field terms.
//!
//! Each function returns the energy together with its derivative with respect
//! to the natural internal coordinate (distance, cosine of the angle, or
//! dihedral angle). The caller chains that derivative onto Cartesian space.

/// Lennard-Jones 12-6 energy and `dE/dr`.
#[inline]
pub fn lennard_jones_12_6_with_derivative(dist: f64, r_min: f64, well_depth: f64) -> (f64, f64) {
    if dist < 1e-6 {
        return (1e10, 0.0);
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    let energy = well_depth * (rho12 - 2.0 * rho6);
    let derivative = -12.0 * well_depth * (rho12 - rho6) / dist;
    (energy, derivative)
}

/// `E = ½k(r - r0)²` and `dE/dr`.
#[inline]
pub fn harmonic_bond(dist: f64, r0: f64, k: f64) -> (f64, f64) {
    let dr = dist - r0;
    (0.5 * k * dr * dr, k * dr)
}

/// Harmonic-cosine bend `E = ½C(cosθ - cosθ0)²` with `C = K / sin²θ0`, and `dE/dcosθ`.
#[inline]
pub fn harmonic_cosine_angle(cos_theta: f64, theta0: f64, k: f64) -> (f64, f64) {
    let sin0 = theta0.sin();
    let c = k / (sin0 * sin0).max(1e-8);
    let dc = cos_theta - theta0.cos();
    (0.5 * c * dc * dc, c * dc)
}

/// Bend for linear centers, `E = K(1 + cosθ)`, and `dE/dcosθ`.
#[inline]
pub fn linear_angle(cos_theta: f64, k: f64) -> (f64, f64) {
    (k * (1.0 + cos_theta), k)
}

/// Bend with minima at both 90 and 180 degrees, for octahedral centers.
///
/// `E = (K/16)(1 - cos4θ)`, written in terms of `c = cosθ` as `(K/2)(c² - c⁴)`.
#[inline]
pub fn octahedral_angle(cos_theta: f64, k: f64) -> (f64, f64) {
    let c2 = cos_theta * cos_theta;
    (
        0.5 * k * (c2 - c2 * c2),
        k * (cos_theta - 2.0 * c2 * cos_theta),
    )
}

/// `E = ½V[1 - cos(n(φ - φ0))]` and `dE/dφ`.
#[inline]
pub fn cosine_torsion(phi: f64, barrier: f64, periodicity: f64, phase: f64) -> (f64, f64) {
    let arg = periodicity * (phi - phase);
    (
        0.5 * barrier * (1.0 - arg.cos()),
        0.5 * barrier * periodicity * arg.sin(),
    )
}
