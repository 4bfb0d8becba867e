use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::topology::hybridization::Hybridization;
use crate::core::topology::ideal::{ideal_angle, ideal_bond_length};
use crate::core::topology::rings::{is_ring_bond, path_length_avoiding};
use itertools::Itertools;
use nalgebra::{DMatrix, Point3};
use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI};

const BOND_TOLERANCE: f64 = 0.01;
const ANGLE_TOLERANCE: f64 = 0.04;
const PINNED_TORSION_TOLERANCE: f64 = 0.05;
/// Fraction of the van der Waals contact distance used as a lower bound.
const VDW_SCALE: f64 = 0.7;
/// Headroom added to the longest possible through-bond distance.
const CEILING_PADDING: f64 = 5.0;
/// Longest ring path (in bonds, excluding the torsion bond) that still forces
/// an sp2-sp2 torsion into the cis arrangement. Four bonds is a 7-ring.
const CIS_RING_PATH: usize = 4;
const SMOOTHING_SLACK: f64 = 1e-6;
const DEGENERATE: f64 = 1e-6;

/// Shortest through-bond relationship between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separation {
    OneTwo,
    OneThree,
    OneFour,
    /// Four or more bonds apart, or in different fragments.
    Remote,
}

/// Lower and upper interatomic distance limits for every atom pair.
#[derive(Debug, Clone)]
pub struct BoundsMatrix {
    lower: DMatrix<f64>,
    upper: DMatrix<f64>,
    separation: Vec<Separation>,
}

impl BoundsMatrix {
    fn with_ceiling(n: usize, ceiling: f64) -> Self {
        let mut upper = DMatrix::from_element(n, n, ceiling);
        upper.fill_diagonal(0.0);
        Self {
            lower: DMatrix::zeros(n, n),
            upper,
            separation: vec![Separation::Remote; n * n],
        }
    }

    /// Builds the raw (unsmoothed) bounds for `molecule`.
    ///
    /// `with_vdw` controls whether remote pairs get a van der Waals lower
    /// bound; without it they may approach each other freely.
    pub fn build(molecule: &Molecule, hybridization: &[Hybridization], with_vdw: bool) -> Self {
        let n = molecule.atom_count();
        let ceiling = molecule
            .bonds()
            .iter()
            .map(|b| ideal_bond_length(molecule, b.i, b.j))
            .sum::<f64>()
            + CEILING_PADDING;

        let mut bounds = Self::with_ceiling(n, ceiling);
        bounds.separation = topological_separation(molecule);

        if with_vdw {
            let atoms = molecule.atoms();
            for (i, j) in (0..n).tuple_combinations() {
                if bounds.separation(i, j) == Separation::Remote {
                    let contact = atoms[i].element.vdw_radius() + atoms[j].element.vdw_radius();
                    bounds.set(i, j, VDW_SCALE * contact, ceiling);
                }
            }
        }

        for bond in molecule.bonds() {
            let d = ideal_bond_length(molecule, bond.i, bond.j);
            bounds.set(bond.i, bond.j, d - BOND_TOLERANCE, d + BOND_TOLERANCE);
        }

        let mut assigned = vec![false; n * n];
        bounds.apply_angles(molecule, hybridization, &mut assigned);
        bounds.apply_torsions(molecule, hybridization, &mut assigned);
        bounds
    }

    fn apply_angles(
        &mut self,
        molecule: &Molecule,
        hybridization: &[Hybridization],
        assigned: &mut [bool],
    ) {
        for j in 0..molecule.atom_count() {
            for (&i, &k) in molecule.neighbors(j).iter().tuple_combinations() {
                if self.separation(i, k) != Separation::OneThree {
                    continue;
                }
                let a = ideal_bond_length(molecule, i, j);
                let b = ideal_bond_length(molecule, j, k);
                let (lower, upper) = if hybridization[j] == Hybridization::Hypervalent {
                    // cis or trans about an octahedral center
                    (law_of_cosines(a, b, FRAC_PI_2), a + b)
                } else {
                    let d = law_of_cosines(a, b, ideal_angle(molecule, hybridization, i, j, k));
                    (d - ANGLE_TOLERANCE, d + ANGLE_TOLERANCE)
                };
                self.merge(i, k, lower, upper, assigned);
            }
        }
    }

    fn apply_torsions(
        &mut self,
        molecule: &Molecule,
        hybridization: &[Hybridization],
        assigned: &mut [bool],
    ) {
        let positions = molecule.reference_positions();
        let usable_geometry = molecule.has_reference_geometry();

        for bond in molecule.bonds() {
            let (j, k) = (bond.i, bond.j);
            let planar = hybridization[j].is_planar() && hybridization[k].is_planar();
            let ring_bond = is_ring_bond(molecule, j, k);

            for &i in molecule.neighbors(j).iter().filter(|&&i| i != k) {
                for &l in molecule.neighbors(k).iter().filter(|&&l| l != j) {
                    if i == l || self.separation(i, l) != Separation::OneFour {
                        continue;
                    }

                    let a = ideal_bond_length(molecule, i, j);
                    let b = ideal_bond_length(molecule, j, k);
                    let c = ideal_bond_length(molecule, k, l);
                    let theta1 = ideal_angle(molecule, hybridization, i, j, k);
                    let theta2 = ideal_angle(molecule, hybridization, j, k, l);
                    let cis = torsion_distance(a, b, c, theta1, theta2, 0.0);
                    let trans = torsion_distance(a, b, c, theta1, theta2, PI);

                    let same_small_ring = planar
                        && ring_bond
                        && path_length_avoiding(molecule, i, l, &[j, k], CIS_RING_PATH).is_some();

                    let pinned = if same_small_ring {
                        Some(cis)
                    } else if bond.order == BondOrder::Double && !ring_bond && usable_geometry {
                        input_dihedral(&positions, i, j, k, l)
                            .map(|phi| if phi.abs() < FRAC_PI_2 { cis } else { trans })
                    } else {
                        None
                    };

                    let (lower, upper) = match pinned {
                        Some(d) => (d - PINNED_TORSION_TOLERANCE, d + PINNED_TORSION_TOLERANCE),
                        None => (cis.min(trans), cis.max(trans)),
                    };
                    self.merge(i, l, lower, upper, assigned);
                }
            }
        }
    }

    /// Sets the bounds of a pair on first use and widens them on later uses,
    /// so a pair reached through several paths keeps every arrangement feasible.
    fn merge(&mut self, i: usize, j: usize, lower: f64, upper: f64, assigned: &mut [bool]) {
        let n = self.len();
        if assigned[i * n + j] {
            let lower = lower.min(self.lower(i, j));
            let upper = upper.max(self.upper(i, j));
            self.set(i, j, lower, upper);
        } else {
            assigned[i * n + j] = true;
            assigned[j * n + i] = true;
            self.set(i, j, lower, upper);
        }
    }

    fn set(&mut self, i: usize, j: usize, lower: f64, upper: f64) {
        self.lower[(i, j)] = lower;
        self.lower[(j, i)] = lower;
        self.upper[(i, j)] = upper;
        self.upper[(j, i)] = upper;
    }

    pub fn len(&self) -> usize {
        self.lower.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lower(&self, i: usize, j: usize) -> f64 {
        self.lower[(i, j)]
    }

    pub fn upper(&self, i: usize, j: usize) -> f64 {
        self.upper[(i, j)]
    }

    pub fn separation(&self, i: usize, j: usize) -> Separation {
        self.separation[i * self.len() + j]
    }

    /// Tightens the bounds with the triangle inequality (Floyd-Warshall).
    ///
    /// Returns `false` as soon as some lower bound exceeds its upper bound,
    /// in which case the matrix is left partially smoothed.
    pub fn smooth(&mut self) -> bool {
        let n = self.len();
        for k in 0..n {
            for i in 0..n {
                if i == k {
                    continue;
                }
                let u_ik = self.upper[(i, k)];
                let l_ik = self.lower[(i, k)];
                for j in (i + 1)..n {
                    if j == k {
                        continue;
                    }
                    let u_kj = self.upper[(k, j)];
                    let l_kj = self.lower[(k, j)];

                    let mut upper = self.upper[(i, j)];
                    if upper > u_ik + u_kj {
                        upper = u_ik + u_kj;
                    }
                    let mut lower = self.lower[(i, j)];
                    let implied = (l_ik - u_kj).max(l_kj - u_ik);
                    if lower < implied {
                        lower = implied;
                    }
                    if lower > upper + SMOOTHING_SLACK {
                        return false;
                    }
                    self.set(i, j, lower.min(upper), upper);
                }
            }
        }
        true
    }
}

/// Distance between the ends of two bonds `a` and `b` meeting at angle `theta`.
fn law_of_cosines(a: f64, b: f64, theta: f64) -> f64 {
    (a * a + b * b - 2.0 * a * b * theta.cos()).max(0.0).sqrt()
}

/// 1-4 distance of a chain with bond lengths `a`, `b`, `c`, bond angles
/// `theta1`, `theta2` and dihedral `phi` (zero is cis).
fn torsion_distance(a: f64, b: f64, c: f64, theta1: f64, theta2: f64, phi: f64) -> f64 {
    let (s1, c1) = theta1.sin_cos();
    let (s2, c2) = theta2.sin_cos();
    let d2 = a * a + b * b + c * c - 2.0 * a * b * c1 - 2.0 * b * c * c2
        + 2.0 * a * c * (c1 * c2 - s1 * s2 * phi.cos());
    d2.max(0.0).sqrt()
}

/// Dihedral of the input coordinates, if they define one.
fn input_dihedral(positions: &[Point3<f64>], i: usize, j: usize, k: usize, l: usize) -> Option<f64> {
    let b1 = positions[j] - positions[i];
    let b2 = positions[k] - positions[j];
    let b3 = positions[l] - positions[k];
    if b1.cross(&b2).norm() < DEGENERATE || b2.cross(&b3).norm() < DEGENERATE {
        return None;
    }
    Some(crate::core::utils::geometry::dihedral(
        &positions[i],
        &positions[j],
        &positions[k],
        &positions[l],
    ))
}

fn topological_separation(molecule: &Molecule) -> Vec<Separation> {
    let n = molecule.atom_count();
    let mut separation = vec![Separation::Remote; n * n];
    let mut depth = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    for start in 0..n {
        depth.iter_mut().for_each(|d| *d = usize::MAX);
        depth[start] = 0;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let d = depth[current];
            if d == 3 {
                continue;
            }
            for &next in molecule.neighbors(current) {
                if depth[next] != usize::MAX {
                    continue;
                }
                depth[next] = d + 1;
                separation[start * n + next] = match d + 1 {
                    1 => Separation::OneTwo,
                    2 => Separation::OneThree,
                    _ => Separation::OneFour,
                };
                queue.push_back(next);
            }
        }
    }
    separation
}
