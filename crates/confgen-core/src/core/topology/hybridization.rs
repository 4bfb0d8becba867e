use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::fmt;

/// Orbital hybridization assigned to an atom from its connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
    /// Five or more neighbors (PF5, SF6 and similar).
    Hypervalent,
}

impl Hybridization {
    pub fn is_planar(&self) -> bool {
        matches!(self, Self::Sp2)
    }
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sp => "sp",
            Self::Sp2 => "sp2",
            Self::Sp3 => "sp3",
            Self::Hypervalent => "hypervalent",
        };
        f.write_str(label)
    }
}

fn from_bonding(molecule: &Molecule, index: usize) -> Hybridization {
    let degree = molecule.degree(index);
    if degree >= 5 {
        return Hybridization::Hypervalent;
    }
    if degree == 4 {
        return Hybridization::Sp3;
    }

    let (mut doubles, mut triples, mut aromatics) = (0, 0, 0);
    for bond in molecule.bonds_of(index) {
        match bond.order {
            BondOrder::Double => doubles += 1,
            BondOrder::Triple => triples += 1,
            BondOrder::Aromatic => aromatics += 1,
            BondOrder::Single => {}
        }
    }

    if degree <= 2 && (triples > 0 || doubles >= 2) {
        return Hybridization::Sp;
    }
    if doubles > 0 || aromatics > 0 {
        // Sulfoxides, sulfones and phosphoryl centers stay pyramidal.
        let element = molecule.atoms()[index].element;
        if matches!(element, Element::S | Element::P | Element::Se) && degree >= 3 {
            return Hybridization::Sp3;
        }
        return Hybridization::Sp2;
    }
    Hybridization::Sp3
}

/// Assigns a hybridization to every atom.
///
/// Saturated nitrogen and divalent oxygen next to a planar center are treated
/// as conjugated (amides, anilines, esters) and flattened to sp2.
pub fn perceive(molecule: &Molecule) -> Vec<Hybridization> {
    let base: Vec<Hybridization> = (0..molecule.atom_count())
        .map(|i| from_bonding(molecule, i))
        .collect();

    base.iter()
        .enumerate()
        .map(|(i, &hyb)| {
            if hyb != Hybridization::Sp3 {
                return hyb;
            }
            let conjugable = match molecule.atoms()[i].element {
                Element::N => molecule.degree(i) <= 3,
                Element::O => molecule.degree(i) == 2,
                _ => false,
            };
            let next_to_planar = molecule
                .neighbors(i)
                .iter()
                .any(|&n| base[n] == Hybridization::Sp2);
            if conjugable && next_to_planar {
                Hybridization::Sp2
            } else {
                hyb
            }
        })
        .collect()
}
