use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use crate::core::topology::hybridization::{Hybridization, perceive};
use crate::core::utils::geometry::{DomainGeometry, substituent_directions};
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HydrogenError {
    #[error("Hydrogens must be added before any conformer is generated")]
    ConformersPresent,
    #[error("Failed to extend the molecular graph: {0}")]
    Molecule(#[from] MoleculeError),
}

/// Number of hydrogens needed to bring an atom up to its lowest allowed valence.
///
/// The allowed valences take the formal charge into account (N⁺ is
/// tetravalent, O⁻ monovalent). Atoms already at or above their largest
/// valence, and hydrogens themselves, need none.
pub fn implicit_hydrogen_count(molecule: &Molecule, index: usize) -> u8 {
    let Some(atom) = molecule.atom(index) else {
        return 0;
    };
    if atom.element.is_hydrogen() {
        return 0;
    }
    let valence = molecule.explicit_valence(index);
    atom.element
        .charged_valences(atom.formal_charge)
        .into_iter()
        .find(|&allowed| allowed >= valence)
        .map(|allowed| allowed - valence)
        .unwrap_or(0)
}

fn lone_pairs(element: Element, formal_charge: i8, valence: u8) -> usize {
    let free =
        i16::from(element.valence_electrons()) - i16::from(formal_charge) - i16::from(valence);
    usize::try_from(free.max(0) / 2).unwrap_or(0)
}

fn placement_geometry(
    hybridization: Hybridization,
    element: Element,
    formal_charge: i8,
    degree: usize,
    valence: u8,
) -> DomainGeometry {
    match hybridization {
        Hybridization::Sp => DomainGeometry::Linear,
        Hybridization::Sp2 => DomainGeometry::Trigonal,
        Hybridization::Hypervalent => DomainGeometry::Octahedral,
        Hybridization::Sp3 => {
            let steric = degree + lone_pairs(element, formal_charge, valence);
            DomainGeometry::from_steric_number(steric)
        }
    }
}

/// Direction from the single neighbor of `parent` to one of that neighbor's
/// other substituents, used to keep new atoms planar or staggered.
fn orientation_reference(
    molecule: &Molecule,
    parent: usize,
    positions: &[Point3<f64>],
) -> Option<Vector3<f64>> {
    let [neighbor] = molecule.neighbors(parent) else {
        return None;
    };
    molecule
        .neighbors(*neighbor)
        .iter()
        .find(|&&other| other != parent)
        .map(|&other| positions[other] - positions[*neighbor])
}

/// Makes every hydrogen explicit.
///
/// New atoms are appended after all existing atoms, in the order of their
/// parent atoms, and are single-bonded to that parent. When the molecule has
/// usable reference coordinates the hydrogens are placed at idealized
/// positions around their parent; otherwise they share the parent's position.
///
/// # Return
///
/// Returns the number of hydrogens added.
///
/// # Errors
///
/// Returns [`HydrogenError::ConformersPresent`] if the molecule already carries
/// conformers, since their coordinate arrays would no longer match.
#[instrument(level = "debug", skip_all, fields(molecule = molecule.name()))]
pub fn add_hydrogens(molecule: &mut Molecule) -> Result<usize, HydrogenError> {
    if molecule.conformer_count() > 0 {
        return Err(HydrogenError::ConformersPresent);
    }

    let original_count = molecule.atom_count();
    let counts: Vec<u8> = (0..original_count)
        .map(|i| implicit_hydrogen_count(molecule, i))
        .collect();
    let hybridization = perceive(molecule);
    let has_geometry = molecule.has_reference_geometry();

    let mut added = 0;
    for parent in 0..original_count {
        let count = usize::from(counts[parent]);
        if count == 0 {
            continue;
        }

        let parent_atom = molecule.atoms()[parent].clone();
        let new_positions = if has_geometry {
            let positions = molecule.reference_positions();
            let neighbor_vecs: Vec<Vector3<f64>> = molecule
                .neighbors(parent)
                .iter()
                .map(|&n| positions[n] - parent_atom.position)
                .collect();
            let geometry = placement_geometry(
                hybridization[parent],
                parent_atom.element,
                parent_atom.formal_charge,
                neighbor_vecs.len() + count,
                molecule.explicit_valence(parent) + counts[parent],
            );
            let reference = orientation_reference(molecule, parent, &positions);
            let bond_length =
                parent_atom.element.covalent_radius() + Element::H.covalent_radius();

            substituent_directions(&neighbor_vecs, count, geometry, reference.as_ref())
                .into_iter()
                .map(|dir| parent_atom.position + dir * bond_length)
                .collect()
        } else {
            vec![parent_atom.position; count]
        };

        for position in new_positions {
            let h = molecule.add_atom(Atom::new(Element::H, position))?;
            molecule.add_bond(parent, h, BondOrder::Single)?;
            added += 1;
        }
    }

    debug!(
        added,
        atoms = molecule.atom_count(),
        "Completed implicit hydrogens."
    );
    Ok(added)
}
