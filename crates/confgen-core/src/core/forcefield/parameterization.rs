use super::params::{Forcefield, TorsionParam};
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::topology::hybridization::{Hybridization, perceive};
use crate::core::topology::ideal::{ideal_angle, ideal_bond_length};
use itertools::Itertools;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Angles this close to straight use the linear bend form.
const LINEAR_ANGLE_CUTOFF_DEG: f64 = 175.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterizationError {
    #[error("Missing VDW parameters for element '{element}' (atom {atom})")]
    MissingVdwParams { element: Element, atom: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub i: usize,
    pub j: usize,
    pub rest_length: f64,
    pub force_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleForm {
    HarmonicCosine { theta0: f64 },
    Linear,
    Octahedral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub i: usize,
    /// The apex atom.
    pub j: usize,
    pub k: usize,
    pub form: AngleForm,
    pub force_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionTerm {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
    pub barrier: f64,
    pub periodicity: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdwPair {
    pub i: usize,
    pub j: usize,
    pub r_min: f64,
    pub well_depth: f64,
}

/// All interaction terms of one molecule, ready for evaluation on any of its conformers.
#[derive(Debug, Clone, Default)]
pub struct ForcefieldModel {
    pub(crate) atom_count: usize,
    pub(crate) bonds: Vec<BondTerm>,
    pub(crate) angles: Vec<AngleTerm>,
    pub(crate) torsions: Vec<TorsionTerm>,
    pub(crate) vdw_pairs: Vec<VdwPair>,
}

impl ForcefieldModel {
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn bonds(&self) -> &[BondTerm] {
        &self.bonds
    }

    pub fn angles(&self) -> &[AngleTerm] {
        &self.angles
    }

    pub fn torsions(&self) -> &[TorsionTerm] {
        &self.torsions
    }

    pub fn vdw_pairs(&self) -> &[VdwPair] {
        &self.vdw_pairs
    }
}

pub struct Parameterizer<'a> {
    forcefield: &'a Forcefield,
}

impl<'a> Parameterizer<'a> {
    pub fn new(forcefield: &'a Forcefield) -> Self {
        Self { forcefield }
    }

    /// Builds the bonded and non-bonded terms for `molecule`.
    ///
    /// # Errors
    ///
    /// Fails if an element present in the molecule has no van der Waals parameters.
    pub fn parameterize(&self, molecule: &Molecule) -> Result<ForcefieldModel, ParameterizationError> {
        let hybridization = perceive(molecule);

        let model = ForcefieldModel {
            atom_count: molecule.atom_count(),
            bonds: self.bond_terms(molecule),
            angles: self.angle_terms(molecule, &hybridization),
            torsions: self.torsion_terms(molecule, &hybridization),
            vdw_pairs: self.vdw_pairs(molecule)?,
        };

        debug!(
            bonds = model.bonds.len(),
            angles = model.angles.len(),
            torsions = model.torsions.len(),
            vdw_pairs = model.vdw_pairs.len(),
            "Parameterized molecule."
        );
        Ok(model)
    }

    fn bond_terms(&self, molecule: &Molecule) -> Vec<BondTerm> {
        let k_single = self.forcefield.globals.bond_force_constant;
        molecule
            .bonds()
            .iter()
            .map(|bond| BondTerm {
                i: bond.i,
                j: bond.j,
                rest_length: ideal_bond_length(molecule, bond.i, bond.j),
                force_constant: k_single * bond.order.multiplicity(),
            })
            .collect()
    }

    fn angle_terms(&self, molecule: &Molecule, hybridization: &[Hybridization]) -> Vec<AngleTerm> {
        let k = self.forcefield.globals.angle_force_constant;
        let mut terms = Vec::new();
        for j in 0..molecule.atom_count() {
            for (&i, &l) in molecule.neighbors(j).iter().tuple_combinations() {
                let form = match hybridization[j] {
                    Hybridization::Hypervalent => AngleForm::Octahedral,
                    _ => {
                        let theta0 = ideal_angle(molecule, hybridization, i, j, l);
                        if theta0.to_degrees() >= LINEAR_ANGLE_CUTOFF_DEG {
                            AngleForm::Linear
                        } else {
                            AngleForm::HarmonicCosine { theta0 }
                        }
                    }
                };
                terms.push(AngleTerm {
                    i,
                    j,
                    k: l,
                    form,
                    force_constant: k,
                });
            }
        }
        terms
    }

    fn torsion_param(
        &self,
        order: BondOrder,
        a: Hybridization,
        b: Hybridization,
    ) -> Option<TorsionParam> {
        use Hybridization::*;
        let table = &self.forcefield.torsions;
        match (a, b) {
            (Sp, _) | (_, Sp) => None,
            (Sp2, Sp2) => Some(match order {
                BondOrder::Double | BondOrder::Aromatic => table.sp2_sp2_double,
                _ => table.sp2_sp2_single,
            }),
            (Sp2, _) | (_, Sp2) => Some(table.sp2_sp3),
            _ => Some(table.sp3_sp3),
        }
    }

    fn torsion_terms(&self, molecule: &Molecule, hybridization: &[Hybridization]) -> Vec<TorsionTerm> {
        let mut terms = Vec::new();
        for bond in molecule.bonds() {
            let (j, k) = (bond.i, bond.j);
            let Some(param) = self.torsion_param(bond.order, hybridization[j], hybridization[k])
            else {
                continue;
            };
            if param.barrier == 0.0 {
                continue;
            }

            let outer: Vec<(usize, usize)> = molecule
                .neighbors(j)
                .iter()
                .filter(|&&i| i != k)
                .cartesian_product(molecule.neighbors(k).iter().filter(|&&l| l != j))
                .map(|(&i, &l)| (i, l))
                .filter(|(i, l)| i != l)
                .collect();
            if outer.is_empty() {
                continue;
            }

            let barrier = param.barrier / outer.len() as f64;
            for (i, l) in outer {
                terms.push(TorsionTerm {
                    i,
                    j,
                    k,
                    l,
                    barrier,
                    periodicity: f64::from(param.periodicity),
                    phase: param.phase.to_radians(),
                });
            }
        }
        terms
    }

    fn vdw_pairs(&self, molecule: &Molecule) -> Result<Vec<VdwPair>, ParameterizationError> {
        let params = molecule
            .atoms()
            .iter()
            .enumerate()
            .map(|(atom, a)| {
                self.forcefield
                    .vdw(a.element)
                    .copied()
                    .ok_or(ParameterizationError::MissingVdwParams {
                        element: a.element,
                        atom,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut excluded: HashSet<(usize, usize)> = HashSet::new();
        for center in 0..molecule.atom_count() {
            let neighbors = molecule.neighbors(center);
            for &n in neighbors {
                excluded.insert((center.min(n), center.max(n)));
            }
            for (&a, &b) in neighbors.iter().tuple_combinations() {
                excluded.insert((a.min(b), a.max(b)));
            }
        }

        Ok((0..molecule.atom_count())
            .tuple_combinations()
            .filter(|pair| !excluded.contains(pair))
            .map(|(i, j)| VdwPair {
                i,
                j,
                r_min: 0.5 * (params[i].radius + params[j].radius),
                well_depth: (params[i].well_depth * params[j].well_depth).sqrt(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn butane() -> Molecule {
        let mut mol = Molecule::new("butane skeleton");
        for _ in 0..4 {
            mol.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        }
        for i in 0..3 {
            mol.add_bond(i, i + 1, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn counts_terms_of_a_chain() {
        let ff = Forcefield::builtin().unwrap();
        let model = Parameterizer::new(&ff).parameterize(&butane()).unwrap();
        assert_eq!(model.bonds().len(), 3);
        assert_eq!(model.angles().len(), 2);
        assert_eq!(model.torsions().len(), 1);
        assert_eq!(model.vdw_pairs().len(), 1);
        assert_eq!((model.vdw_pairs()[0].i, model.vdw_pairs()[0].j), (0, 3));
    }

    #[test]
    fn torsion_barrier_is_shared_about_a_bond() {
        let ff = Forcefield::builtin().unwrap();
        let mut mol = butane();
        // Turn the central carbons into CH2 groups (heavy-atom stand-ins).
        for parent in [1, 2] {
            for _ in 0..2 {
                let h = mol.add_atom(Atom::new(Element::H, Point3::origin())).unwrap();
                mol.add_bond(parent, h, BondOrder::Single).unwrap();
            }
        }
        let model = Parameterizer::new(&ff).parameterize(&mol).unwrap();
        let central: Vec<_> = model
            .torsions()
            .iter()
            .filter(|t| (t.j, t.k) == (1, 2))
            .collect();
        assert_eq!(central.len(), 9);
        let total: f64 = central.iter().map(|t| t.barrier).sum();
        assert!((total - ff.torsions.sp3_sp3.barrier).abs() < 1e-12);
    }

    #[test]
    fn double_bonds_get_the_stiff_planar_torsion() {
        let ff = Forcefield::builtin().unwrap();
        let mut mol = Molecule::new("butene");
        for _ in 0..4 {
            mol.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        }
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        mol.add_bond(1, 2, BondOrder::Double).unwrap();
        mol.add_bond(2, 3, BondOrder::Single).unwrap();
        let model = Parameterizer::new(&ff).parameterize(&mol).unwrap();

        let double = model.torsions().iter().find(|t| (t.j, t.k) == (1, 2)).unwrap();
        assert_eq!(double.barrier, ff.torsions.sp2_sp2_double.barrier);
        assert_eq!(double.periodicity, 2.0);
        assert!(model.bonds()[1].force_constant > model.bonds()[0].force_constant);
        assert!(matches!(
            model.angles()[0].form,
            AngleForm::HarmonicCosine { theta0 } if (theta0.to_degrees() - 120.0).abs() < 1e-9
        ));
    }

    #[test]
    fn linear_centers_use_linear_bend() {
        let ff = Forcefield::builtin().unwrap();
        let mut mol = Molecule::new("propyne");
        for _ in 0..3 {
            mol.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        }
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        mol.add_bond(1, 2, BondOrder::Triple).unwrap();
        let model = Parameterizer::new(&ff).parameterize(&mol).unwrap();
        assert_eq!(model.angles().len(), 1);
        assert_eq!(model.angles()[0].form, AngleForm::Linear);
        assert!(model.torsions().is_empty());
    }

    #[test]
    fn missing_vdw_parameters_are_reported() {
        let mut ff = Forcefield::builtin().unwrap();
        ff.vdw.remove("C");
        assert_eq!(
            Parameterizer::new(&ff).parameterize(&butane()).unwrap_err(),
            ParameterizationError::MissingVdwParams {
                element: Element::C,
                atom: 0
            }
        );
    }
}
