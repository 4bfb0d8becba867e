use super::atom::Atom;
use super::conformer::{Conformer, ConformerId};
use super::topology::{Bond, BondOrder};
use nalgebra::Point3;
use std::collections::BTreeMap;
use thiserror::Error;

const DEGENERATE_SPREAD: f64 = 1e-3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom index {index} is out of range (molecule has {count} atoms)")]
    AtomIndexOutOfRange { index: usize, count: usize },
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
    #[error("Conformer has {found} positions but the molecule has {expected} atoms")]
    ConformerSizeMismatch { expected: usize, found: usize },
    #[error("Conformer {0} already exists")]
    DuplicateConformer(ConformerId),
    #[error("Cannot change the atom set of a molecule that already holds conformers")]
    ConformersPresent,
}

/// A molecular graph together with the conformers generated for it.
///
/// Atoms are addressed by their zero-based index, which matches the order of
/// the atom block in the source file. Conformers are kept sorted by id so that
/// iteration and serialization always happen in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
    conformers: BTreeMap<ConformerId, Conformer>,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Appends an atom and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::ConformersPresent`] if conformers already exist,
    /// since their coordinate arrays would no longer match the atom count.
    pub fn add_atom(&mut self, atom: Atom) -> Result<usize, MoleculeError> {
        if !self.conformers.is_empty() {
            return Err(MoleculeError::ConformersPresent);
        }
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        Ok(self.atoms.len() - 1)
    }

    /// Connects two existing atoms.
    ///
    /// # Errors
    ///
    /// Fails on out-of-range indices, self bonds and duplicate bonds.
    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) -> Result<(), MoleculeError> {
        let count = self.atoms.len();
        for index in [i, j] {
            if index >= count {
                return Err(MoleculeError::AtomIndexOutOfRange { index, count });
            }
        }
        if i == j {
            return Err(MoleculeError::SelfBond(i));
        }
        if self.adjacency[i].contains(&j) {
            return Err(MoleculeError::DuplicateBond(i, j));
        }
        self.bonds.push(Bond::new(i, j, order));
        self.adjacency[i].push(j);
        self.adjacency[j].push(i);
        Ok(())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Indices of the atoms bonded to `index`, in bond insertion order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn bond_between(&self, i: usize, j: usize) -> Option<&Bond> {
        if !self.neighbors(i).contains(&j) {
            return None;
        }
        self.bonds.iter().find(|b| b.connects(i, j))
    }

    pub fn bond_order(&self, i: usize, j: usize) -> Option<BondOrder> {
        self.bond_between(i, j).map(|b| b.order)
    }

    pub fn bonds_of(&self, index: usize) -> impl Iterator<Item = &Bond> + '_ {
        self.bonds.iter().filter(move |b| b.contains(index))
    }

    /// Sum of bond orders around an atom.
    ///
    /// Aromatic bonds count 1.5 and the total is rounded down, so a fused
    /// aromatic carbon (three aromatic bonds) reports a valence of four.
    pub fn explicit_valence(&self, index: usize) -> u8 {
        let mut doubled = 0u32;
        for bond in self.bonds_of(index) {
            doubled += match bond.order {
                BondOrder::Single => 2,
                BondOrder::Double => 4,
                BondOrder::Triple => 6,
                BondOrder::Aromatic => 3,
            };
        }
        (doubled / 2).min(u32::from(u8::MAX)) as u8
    }

    pub fn heavy_atom_indices(&self) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_heavy())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn reference_positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Whether the reference coordinates carry real geometry (not all atoms stacked).
    pub fn has_reference_geometry(&self) -> bool {
        let Some(first) = self.atoms.first() else {
            return false;
        };
        self.atoms
            .iter()
            .any(|a| (a.position - first.position).norm() > DEGENERATE_SPREAD)
    }

    /// Whether the reference coordinates leave the z = constant plane.
    pub fn is_three_dimensional(&self) -> bool {
        let (min, max) = self
            .atoms
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
                (lo.min(a.position.z), hi.max(a.position.z))
            });
        max - min > DEGENERATE_SPREAD
    }

    /// Attaches a conformer.
    ///
    /// # Errors
    ///
    /// Fails if the coordinate count differs from the atom count or the id is taken.
    pub fn add_conformer(&mut self, conformer: Conformer) -> Result<(), MoleculeError> {
        if conformer.positions().len() != self.atoms.len() {
            return Err(MoleculeError::ConformerSizeMismatch {
                expected: self.atoms.len(),
                found: conformer.positions().len(),
            });
        }
        if self.conformers.contains_key(&conformer.id()) {
            return Err(MoleculeError::DuplicateConformer(conformer.id()));
        }
        self.conformers.insert(conformer.id(), conformer);
        Ok(())
    }

    pub fn conformer(&self, id: ConformerId) -> Option<&Conformer> {
        self.conformers.get(&id)
    }

    pub fn conformer_mut(&mut self, id: ConformerId) -> Option<&mut Conformer> {
        self.conformers.get_mut(&id)
    }

    /// Conformers in ascending id order.
    pub fn conformers(&self) -> impl Iterator<Item = &Conformer> {
        self.conformers.values()
    }

    pub fn conformer_ids(&self) -> Vec<ConformerId> {
        self.conformers.keys().copied().collect()
    }

    pub fn conformer_count(&self) -> usize {
        self.conformers.len()
    }

    pub fn clear_conformers(&mut self) {
        self.conformers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;

    fn water() -> Molecule {
        let mut mol = Molecule::new("water");
        let o = mol
            .add_atom(Atom::new(Element::O, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let h1 = mol
            .add_atom(Atom::new(Element::H, Point3::new(0.96, 0.0, 0.0)))
            .unwrap();
        let h2 = mol
            .add_atom(Atom::new(Element::H, Point3::new(-0.24, 0.93, 0.0)))
            .unwrap();
        mol.add_bond(o, h1, BondOrder::Single).unwrap();
        mol.add_bond(o, h2, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn adjacency_tracks_bonds() {
        let mol = water();
        assert_eq!(mol.neighbors(0), &[1, 2]);
        assert_eq!(mol.neighbors(1), &[0]);
        assert_eq!(mol.degree(0), 2);
        assert_eq!(mol.bond_order(2, 0), Some(BondOrder::Single));
        assert_eq!(mol.bond_order(1, 2), None);
    }

    #[test]
    fn add_bond_rejects_invalid_requests() {
        let mut mol = water();
        assert_eq!(
            mol.add_bond(0, 5, BondOrder::Single),
            Err(MoleculeError::AtomIndexOutOfRange { index: 5, count: 3 })
        );
        assert_eq!(
            mol.add_bond(1, 1, BondOrder::Single),
            Err(MoleculeError::SelfBond(1))
        );
        assert_eq!(
            mol.add_bond(1, 0, BondOrder::Single),
            Err(MoleculeError::DuplicateBond(1, 0))
        );
    }

    #[test]
    fn explicit_valence_counts_aromatic_bonds_as_one_and_a_half() {
        let mut mol = Molecule::new("ring fragment");
        for _ in 0..4 {
            mol.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        }
        mol.add_bond(0, 1, BondOrder::Aromatic).unwrap();
        mol.add_bond(0, 2, BondOrder::Aromatic).unwrap();
        assert_eq!(mol.explicit_valence(0), 3);
        mol.add_bond(0, 3, BondOrder::Aromatic).unwrap();
        assert_eq!(mol.explicit_valence(0), 4);
    }

    #[test]
    fn heavy_atom_indices_skip_hydrogens() {
        assert_eq!(water().heavy_atom_indices(), vec![0]);
    }

    #[test]
    fn geometry_flags_detect_flat_and_stacked_inputs() {
        let mol = water();
        assert!(mol.has_reference_geometry());
        assert!(!mol.is_three_dimensional());

        let mut stacked = Molecule::new("stacked");
        stacked.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        stacked.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        assert!(!stacked.has_reference_geometry());
    }

    #[test]
    fn conformers_iterate_in_ascending_id_order() {
        let mut mol = water();
        for id in [2, 0, 1] {
            mol.add_conformer(Conformer::new(ConformerId(id), mol.reference_positions()))
                .unwrap();
        }
        let ids: Vec<_> = mol.conformers().map(|c| c.id()).collect();
        assert_eq!(ids, vec![ConformerId(0), ConformerId(1), ConformerId(2)]);
        assert_eq!(mol.conformer_count(), 3);
    }

    #[test]
    fn add_conformer_validates_size_and_uniqueness() {
        let mut mol = water();
        assert_eq!(
            mol.add_conformer(Conformer::new(ConformerId(0), vec![Point3::origin()])),
            Err(MoleculeError::ConformerSizeMismatch {
                expected: 3,
                found: 1
            })
        );
        mol.add_conformer(Conformer::new(ConformerId(0), mol.reference_positions()))
            .unwrap();
        assert_eq!(
            mol.add_conformer(Conformer::new(ConformerId(0), mol.reference_positions())),
            Err(MoleculeError::DuplicateConformer(ConformerId(0)))
        );
    }

    #[test]
    fn atoms_cannot_be_added_once_conformers_exist() {
        let mut mol = water();
        mol.add_conformer(Conformer::new(ConformerId(0), mol.reference_positions()))
            .unwrap();
        assert_eq!(
            mol.add_atom(Atom::new(Element::H, Point3::origin())),
            Err(MoleculeError::ConformersPresent)
        );
        mol.clear_conformers();
        assert!(mol.add_atom(Atom::new(Element::H, Point3::origin())).is_ok());
    }
}
