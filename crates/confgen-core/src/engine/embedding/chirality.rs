use crate::core::models::molecule::Molecule;
use crate::core::topology::hybridization::Hybridization;
use crate::core::utils::geometry::signed_volume;
use nalgebra::Point3;

/// Input volumes smaller than this are treated as flat and carry no handedness.
const MIN_INPUT_VOLUME: f64 = 1e-3;

/// Handedness of a tetrahedral center, read from the input coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiralConstraint {
    pub center: usize,
    /// Three heavy neighbors spanning the signed volume.
    pub neighbors: [usize; 3],
    /// `1.0` or `-1.0`.
    pub sign: f64,
}

impl ChiralConstraint {
    pub fn volume(&self, positions: &[Point3<f64>]) -> f64 {
        let [a, b, c] = self.neighbors;
        signed_volume(
            &positions[self.center],
            &positions[a],
            &positions[b],
            &positions[c],
        )
    }

    pub fn is_satisfied(&self, positions: &[Point3<f64>]) -> bool {
        self.volume(positions) * self.sign > 0.0
    }
}

/// Collects chiral constraints for four-coordinate sp3 centers with at least
/// three heavy neighbors.
///
/// Only 3D input carries trustworthy handedness, so flat or missing
/// coordinates yield no constraints.
pub fn perceive(molecule: &Molecule, hybridization: &[Hybridization]) -> Vec<ChiralConstraint> {
    if !molecule.is_three_dimensional() {
        return Vec::new();
    }
    let positions = molecule.reference_positions();
    let atoms = molecule.atoms();

    (0..molecule.atom_count())
        .filter(|&center| {
            hybridization[center] == Hybridization::Sp3 && molecule.degree(center) == 4
        })
        .filter_map(|center| {
            let heavy: Vec<usize> = molecule
                .neighbors(center)
                .iter()
                .copied()
                .filter(|&n| atoms[n].is_heavy())
                .collect();
            if heavy.len() < 3 {
                return None;
            }
            let mut constraint = ChiralConstraint {
                center,
                neighbors: [heavy[0], heavy[1], heavy[2]],
                sign: 1.0,
            };
            let volume = constraint.volume(&positions);
            if volume.abs() < MIN_INPUT_VOLUME {
                return None;
            }
            constraint.sign = volume.signum();
            Some(constraint)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::models::topology::BondOrder;
    use crate::core::topology::hybridization::perceive as perceive_hybridization;

    /// Bromochlorofluoromethane with tetrahedral input coordinates.
    pub(crate) fn bromochlorofluoromethane(mirror: bool) -> Molecule {
        let s = if mirror { -1.0 } else { 1.0 };
        let atoms = [
            (Element::C, [0.0, 0.0, 0.0]),
            (Element::F, [0.0, 0.0, 1.35]),
            (Element::Cl, [1.65, 0.0, -0.58]),
            (Element::Br, [-0.95, 1.64 * s, -0.63]),
            (Element::H, [-0.51, -0.89 * s, -0.36]),
        ];
        let mut mol = Molecule::new("CHFClBr");
        for (e, [x, y, z]) in atoms {
            mol.add_atom(Atom::new(e, Point3::new(x, y, z))).unwrap();
        }
        for n in 1..5 {
            mol.add_bond(0, n, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn finds_stereocenter_and_its_handedness() {
        let mol = bromochlorofluoromethane(false);
        let constraints = perceive(&mol, &perceive_hybridization(&mol));
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].center, 0);
        assert_eq!(constraints[0].neighbors, [1, 2, 3]);

        let mirrored = bromochlorofluoromethane(true);
        let flipped = perceive(&mirrored, &perceive_hybridization(&mirrored));
        assert_eq!(flipped[0].sign, -constraints[0].sign);
    }

    #[test]
    fn flat_input_has_no_constraints() {
        let mut mol = bromochlorofluoromethane(false);
        for idx in 0..mol.atom_count() {
            mol.atom_mut(idx).unwrap().position.z = 0.0;
        }
        assert!(perceive(&mol, &perceive_hybridization(&mol)).is_empty());
    }

    #[test]
    fn satisfaction_flips_under_reflection() {
        let mol = bromochlorofluoromethane(false);
        let constraint = perceive(&mol, &perceive_hybridization(&mol))[0];
        let mut positions = mol.reference_positions();
        assert!(constraint.is_satisfied(&positions));
        for p in &mut positions {
            p.x = -p.x;
        }
        assert!(!constraint.is_satisfied(&positions));
    }
}
