use super::hybridization::Hybridization;
use super::rings::smallest_ring_with_angle;
use crate::core::models::molecule::Molecule;

pub const TETRAHEDRAL_ANGLE_DEG: f64 = 109.471_220_634_490_7;

/// Largest ring whose internal angles override the hybridization default.
const STRAINED_RING_LIMIT: usize = 5;

/// Expected length of the bond between `i` and `j`, in Angstroms.
///
/// Sum of single-bond covalent radii, shortened by the bond order. Atoms that
/// are not bonded fall back to the single-bond sum.
pub fn ideal_bond_length(molecule: &Molecule, i: usize, j: usize) -> f64 {
    let atoms = molecule.atoms();
    let base = atoms[i].element.covalent_radius() + atoms[j].element.covalent_radius();
    let factor = molecule
        .bond_order(i, j)
        .map(|order| order.length_factor())
        .unwrap_or(1.0);
    base * factor
}

/// Expected `i`-`j`-`k` angle in radians, centered on `j`.
///
/// Angles inside three-, four- and five-membered rings take the regular
/// polygon value; everything else follows the hybridization of the center.
/// Hypervalent centers report the 90 degree cis angle.
pub fn ideal_angle(
    molecule: &Molecule,
    hybridization: &[Hybridization],
    i: usize,
    j: usize,
    k: usize,
) -> f64 {
    let degrees = match smallest_ring_with_angle(molecule, i, j, k, STRAINED_RING_LIMIT) {
        Some(3) => 60.0,
        Some(4) => 90.0,
        Some(5) => 108.0,
        _ => match hybridization[j] {
            Hybridization::Sp => 180.0,
            Hybridization::Sp2 => 120.0,
            Hybridization::Sp3 => TETRAHEDRAL_ANGLE_DEG,
            Hybridization::Hypervalent => 90.0,
        },
    };
    f64::to_radians(degrees)
}
