use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::superposed_rmsd;
use nalgebra::Point3;

/// Smallest number of heavy atoms for which hydrogens are left out of the comparison.
const MIN_HEAVY_ATOMS: usize = 3;

/// Rejects conformers that duplicate one already kept.
///
/// Two conformers are duplicates when the RMSD of the compared atoms after
/// optimal superposition is below the threshold. Heavy atoms are compared
/// when there are at least three of them, otherwise every atom is.
#[derive(Debug, Clone)]
pub struct RmsdPruner {
    threshold: f64,
    atoms: Vec<usize>,
    kept: Vec<Vec<Point3<f64>>>,
}

impl RmsdPruner {
    pub fn new(molecule: &Molecule, threshold: f64) -> Self {
        let heavy = molecule.heavy_atom_indices();
        let atoms = if heavy.len() >= MIN_HEAVY_ATOMS {
            heavy
        } else {
            (0..molecule.atom_count()).collect()
        };
        Self {
            threshold,
            atoms,
            kept: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.threshold > 0.0
    }

    fn select(&self, positions: &[Point3<f64>]) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|&i| positions[i]).collect()
    }

    /// Smallest RMSD between `positions` and any kept conformer.
    pub fn closest(&self, positions: &[Point3<f64>]) -> Option<f64> {
        let candidate = self.select(positions);
        self.kept
            .iter()
            .filter_map(|kept| superposed_rmsd(kept, &candidate))
            .min_by(f64::total_cmp)
    }

    /// Keeps `positions` unless it duplicates a kept conformer; returns whether it was kept.
    pub fn accept(&mut self, positions: &[Point3<f64>]) -> bool {
        if !self.is_enabled() {
            return true;
        }
        if self.closest(positions).is_some_and(|rmsd| rmsd < self.threshold) {
            return false;
        }
        let selected = self.select(positions);
        self.kept.push(selected);
        true
    }

    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use nalgebra::{Rotation3, Vector3};

    fn molecule(elements: &[Element]) -> Molecule {
        let mut mol = Molecule::new("pruning");
        for &e in elements {
            mol.add_atom(Atom::new(e, Point3::origin())).unwrap();
        }
        mol
    }

    fn zigzag() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.0, 1.4, 0.0),
            Point3::new(3.5, 1.4, 0.3),
            Point3::new(9.0, 9.0, 9.0),
        ]
    }

    #[test]
    fn rigid_copies_are_pruned() {
        use Element::*;
        let mol = molecule(&[C, C, C, C, H]);
        let mut pruner = RmsdPruner::new(&mol, 0.5);
        assert!(pruner.accept(&zigzag()));

        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), 1.1);
        let moved: Vec<_> = zigzag()
            .iter()
            .map(|p| rotation * p + Vector3::new(4.0, -2.0, 1.0))
            .collect();
        assert!(!pruner.accept(&moved));
        assert_eq!(pruner.kept_count(), 1);
    }

    #[test]
    fn hydrogens_are_ignored_with_enough_heavy_atoms() {
        use Element::*;
        let mol = molecule(&[C, C, C, C, H]);
        let mut pruner = RmsdPruner::new(&mol, 0.5);
        assert!(pruner.accept(&zigzag()));
        let mut moved_h = zigzag();
        moved_h[4] = Point3::new(-9.0, 3.0, 0.0);
        assert!(!pruner.accept(&moved_h));
    }

    #[test]
    fn distinct_shapes_are_kept() {
        use Element::*;
        let mol = molecule(&[C, C, C, C, H]);
        let mut pruner = RmsdPruner::new(&mol, 0.5);
        assert!(pruner.accept(&zigzag()));
        let mut folded = zigzag();
        folded[3] = Point3::new(0.5, 2.0, 0.0);
        assert!(pruner.accept(&folded));
        assert_eq!(pruner.kept_count(), 2);
        assert!(pruner.closest(&folded).unwrap() < 1e-6);
    }

    #[test]
    fn small_molecules_compare_all_atoms() {
        use Element::*;
        let mol = molecule(&[O, H, H]);
        let mut pruner = RmsdPruner::new(&mol, 0.1);
        let water = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.96, 0.0, 0.0),
            Point3::new(-0.24, 0.93, 0.0),
        ];
        assert!(pruner.accept(&water));
        let mut opened = water.clone();
        opened[2] = Point3::new(-0.9, 0.3, 0.0);
        assert!(pruner.accept(&opened));
    }

    #[test]
    fn non_positive_threshold_keeps_everything() {
        let mol = molecule(&[Element::C, Element::C, Element::C]);
        let mut pruner = RmsdPruner::new(&mol, 0.0);
        assert!(pruner.accept(&zigzag()[..3]));
        assert!(pruner.accept(&zigzag()[..3]));
        assert!(!pruner.is_enabled());
    }
}
