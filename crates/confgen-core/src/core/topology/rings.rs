use crate::core::models::molecule::Molecule;
use std::collections::VecDeque;

/// Length in bonds of the shortest path from `from` to `to` that never visits
/// an atom in `avoid`, searched up to `max_len` bonds.
///
/// When `skip_direct` is set the direct `from`-`to` bond is not followed, which
/// turns the search into a ring-closure test for that bond.
fn shortest_path(
    molecule: &Molecule,
    from: usize,
    to: usize,
    avoid: &[usize],
    max_len: usize,
    skip_direct: bool,
) -> Option<usize> {
    if from == to {
        return Some(0);
    }
    let mut depth = vec![usize::MAX; molecule.atom_count()];
    let mut queue = VecDeque::new();
    depth[from] = 0;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let d = depth[current];
        if d >= max_len {
            continue;
        }
        for &next in molecule.neighbors(current) {
            if skip_direct && current == from && next == to {
                continue;
            }
            if depth[next] != usize::MAX || avoid.contains(&next) {
                continue;
            }
            if next == to {
                return Some(d + 1);
            }
            depth[next] = d + 1;
            queue.push_back(next);
        }
    }
    None
}

/// Shortest path between two atoms that does not pass through any atom in `avoid`.
pub fn path_length_avoiding(
    molecule: &Molecule,
    from: usize,
    to: usize,
    avoid: &[usize],
    max_len: usize,
) -> Option<usize> {
    shortest_path(molecule, from, to, avoid, max_len, false)
}

/// Whether the bond `i`-`j` closes a ring.
pub fn is_ring_bond(molecule: &Molecule, i: usize, j: usize) -> bool {
    molecule.bond_between(i, j).is_some()
        && shortest_path(molecule, i, j, &[], molecule.atom_count(), true).is_some()
}

/// Size of the smallest ring containing the angle `i`-`j`-`k`, if it is at most `max_size`.
pub fn smallest_ring_with_angle(
    molecule: &Molecule,
    i: usize,
    j: usize,
    k: usize,
    max_size: usize,
) -> Option<usize> {
    let max_len = max_size.checked_sub(2)?;
    path_length_avoiding(molecule, i, k, &[j], max_len).map(|len| len + 2)
}
