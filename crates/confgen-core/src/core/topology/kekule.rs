use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::VecDeque;

/// Whether an aromatic atom must take one of its aromatic bonds as a double
/// bond to reach an allowed valence.
///
/// Atoms that already carry a localized double or triple bond, and atoms whose
/// lowest fitting valence is met with single bonds only (pyrrole N-H, furan O,
/// the pyrrolide anion), do not.
fn needs_double_bond(molecule: &Molecule, index: usize) -> bool {
    let Some(atom) = molecule.atom(index) else {
        return false;
    };
    let mut aromatic = 0u8;
    let mut localized = 0u8;
    for bond in molecule.bonds_of(index) {
        match bond.order {
            BondOrder::Aromatic => aromatic += 1,
            BondOrder::Single => localized += 1,
            BondOrder::Double | BondOrder::Triple => return false,
        }
    }
    if aromatic == 0 {
        return false;
    }
    let single_valence = aromatic + localized;
    atom.element
        .charged_valences(atom.formal_charge)
        .into_iter()
        .find(|&allowed| allowed >= single_valence)
        .is_some_and(|allowed| allowed > single_valence)
}

fn aromatic_partners(molecule: &Molecule, needy: &[bool], index: usize) -> Vec<usize> {
    molecule
        .bonds_of(index)
        .filter(|b| b.order == BondOrder::Aromatic)
        .filter_map(|b| b.other(index))
        .filter(|&other| needy[other])
        .collect()
}

fn components(molecule: &Molecule, needy: &[bool]) -> Vec<Vec<usize>> {
    let mut seen = vec![false; needy.len()];
    let mut result = Vec::new();
    for start in (0..needy.len()).filter(|&i| needy[i]) {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(atom) = queue.pop_front() {
            members.push(atom);
            for next in aromatic_partners(molecule, needy, atom) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        members.sort_unstable();
        result.push(members);
    }
    result
}

/// Pairs every member with a neighbour; `partner` holds the pairing so far.
fn perfect_matching(
    members: &[usize],
    adjacency: &[Vec<usize>],
    partner: &mut [Option<usize>],
) -> bool {
    let Some(&first) = members.iter().find(|&&m| partner[m].is_none()) else {
        return true;
    };
    for &other in &adjacency[first] {
        if partner[other].is_some() {
            continue;
        }
        partner[first] = Some(other);
        partner[other] = Some(first);
        if perfect_matching(members, adjacency, partner) {
            return true;
        }
        partner[first] = None;
        partner[other] = None;
    }
    false
}

fn reported_atom(molecule: &Molecule, members: &[usize]) -> usize {
    members
        .iter()
        .copied()
        .find(|&m| {
            molecule
                .atom(m)
                .is_some_and(|a| a.element != Element::C)
        })
        .unwrap_or(members[0])
}

/// Finds an aromatic atom for which no alternating single/double bond
/// assignment exists.
///
/// Every atom that needs a double bond (see the valence rules of its element)
/// must be paired with exactly one aromatic neighbour that needs one too. When
/// a ring system admits no such pairing, typically a pyrrole-type nitrogen
/// written without its hydrogen, the hydrogen count of that system is
/// ambiguous. Heteroatoms are preferred when reporting the offending system.
pub fn unassignable_atom(molecule: &Molecule) -> Option<usize> {
    let needy: Vec<bool> = (0..molecule.atom_count())
        .map(|i| needs_double_bond(molecule, i))
        .collect();
    let adjacency: Vec<Vec<usize>> = (0..molecule.atom_count())
        .map(|i| {
            if needy[i] {
                aromatic_partners(molecule, &needy, i)
            } else {
                Vec::new()
            }
        })
        .collect();

    let mut partner = vec![None; molecule.atom_count()];
    for members in components(molecule, &needy) {
        if members.len() % 2 == 1 || !perfect_matching(&members, &adjacency, &mut partner) {
            return Some(reported_atom(molecule, &members));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn aromatic_ring(elements: &[Element]) -> Molecule {
        let mut mol = Molecule::new("ring");
        for &e in elements {
            mol.add_atom(Atom::new(e, Point3::origin())).unwrap();
        }
        let n = elements.len();
        for i in 0..n {
            mol.add_bond(i, (i + 1) % n, BondOrder::Aromatic).unwrap();
        }
        mol
    }

    fn with_hydrogen_on(mut mol: Molecule, index: usize) -> Molecule {
        let h = mol.add_atom(Atom::new(Element::H, Point3::origin())).unwrap();
        mol.add_bond(index, h, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn six_membered_aromatics_are_assignable() {
        assert_eq!(unassignable_atom(&aromatic_ring(&[Element::C; 6])), None);
        let pyridine = [
            Element::N,
            Element::C,
            Element::C,
            Element::C,
            Element::C,
            Element::C,
        ];
        assert_eq!(unassignable_atom(&aromatic_ring(&pyridine)), None);
    }

    #[test]
    fn fused_rings_are_assignable() {
        // Naphthalene: two benzene rings sharing the 0-5 edge.
        let mut mol = aromatic_ring(&[Element::C; 6]);
        let mut previous = 5;
        for _ in 0..4 {
            let next = mol
                .add_atom(Atom::new(Element::C, Point3::origin()))
                .unwrap();
            mol.add_bond(previous, next, BondOrder::Aromatic).unwrap();
            previous = next;
        }
        mol.add_bond(previous, 0, BondOrder::Aromatic).unwrap();
        assert_eq!(unassignable_atom(&mol), None);
    }

    #[test]
    fn pyrrole_nitrogen_without_hydrogen_is_reported() {
        let pyrrole = [Element::C, Element::C, Element::N, Element::C, Element::C];
        assert_eq!(unassignable_atom(&aromatic_ring(&pyrrole)), Some(2));
        assert_eq!(
            unassignable_atom(&with_hydrogen_on(aromatic_ring(&pyrrole), 2)),
            None
        );
    }

    #[test]
    fn charges_and_divalent_heteroatoms_settle_the_ring() {
        let furan = [Element::O, Element::C, Element::C, Element::C, Element::C];
        assert_eq!(unassignable_atom(&aromatic_ring(&furan)), None);

        let mut pyrrolide =
            aromatic_ring(&[Element::N, Element::C, Element::C, Element::C, Element::C]);
        pyrrolide.atom_mut(0).unwrap().formal_charge = -1;
        assert_eq!(unassignable_atom(&pyrrolide), None);
    }

    #[test]
    fn isolated_aromatic_atoms_are_reported() {
        // Both aromatic carbons hang off a localized double bond and are not
        // bonded to each other.
        let mut mol = Molecule::new("split");
        for _ in 0..4 {
            mol.add_atom(Atom::new(Element::C, Point3::origin())).unwrap();
        }
        mol.add_bond(0, 1, BondOrder::Double).unwrap();
        mol.add_bond(1, 2, BondOrder::Aromatic).unwrap();
        mol.add_bond(0, 3, BondOrder::Aromatic).unwrap();
        assert_eq!(unassignable_atom(&mol), Some(2));
    }
}
