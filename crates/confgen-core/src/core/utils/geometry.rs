use nalgebra::{Matrix3, Point3, Rotation3, Unit, Vector3};

const TETRAHEDRAL_ANGLE_DEG: f64 = 109.471_220_634_490_7;

/// Idealized arrangement of the electron domains around an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainGeometry {
    Linear,
    Trigonal,
    Tetrahedral,
    Octahedral,
}

impl DomainGeometry {
    /// Picks the arrangement for a given steric number (bonded atoms plus lone pairs).
    pub fn from_steric_number(steric: usize) -> Self {
        match steric {
            0..=2 => Self::Linear,
            3 => Self::Trigonal,
            4 => Self::Tetrahedral,
            _ => Self::Octahedral,
        }
    }
}

/// Returns a unit vector perpendicular to `v`.
pub fn perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let seed = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (seed - v * v.dot(&seed))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z)
}

/// Angle at `b` formed by `a-b-c`, in radians.
pub fn angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = a - b;
    let v = c - b;
    let denom = u.norm() * v.norm();
    if denom < 1e-12 {
        return 0.0;
    }
    (u.dot(&v) / denom).clamp(-1.0, 1.0).acos()
}

/// Dihedral angle `a-b-c-d` in radians, in `(-pi, pi]`, with zero meaning cis.
pub fn dihedral(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let f = a - b;
    let g = b - c;
    let h = d - c;
    let m = f.cross(&g);
    let n = h.cross(&g);
    let g_norm = g.norm();
    if g_norm < 1e-12 {
        return 0.0;
    }
    let y = n.cross(&m).dot(&g) / g_norm;
    let x = m.dot(&n);
    y.atan2(x)
}

/// Signed volume spanned by three neighbors around `center`.
///
/// The sign encodes the handedness of the arrangement and flips under reflection.
pub fn signed_volume(
    center: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> f64 {
    let va = a - center;
    let vb = b - center;
    let vc = c - center;
    va.dot(&vb.cross(&vc))
}

pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

/// Unit directions for `count` new substituents on an atom whose existing
/// neighbors point along `neighbors`.
///
/// `reference` is an optional direction used to orient planar arrangements, for
/// instance the bond from a double-bond partner to its own substituent, so that
/// new atoms land in the plane of the conjugated system. When the idealized
/// arrangement has fewer free positions than requested the remainder is spread
/// as far as possible from every direction already taken.
pub fn substituent_directions(
    neighbors: &[Vector3<f64>],
    count: usize,
    geometry: DomainGeometry,
    reference: Option<&Vector3<f64>>,
) -> Vec<Vector3<f64>> {
    if count == 0 {
        return Vec::new();
    }
    let unit: Vec<Vector3<f64>> = neighbors
        .iter()
        .filter_map(|v| v.try_normalize(1e-8))
        .collect();

    let mut dirs = match (geometry, unit.len()) {
        (DomainGeometry::Linear, 0) => vec![Vector3::x(), -Vector3::x()],
        (DomainGeometry::Linear, 1) => vec![-unit[0]],

        (DomainGeometry::Trigonal, 0) => {
            let (s, c) = 120f64.to_radians().sin_cos();
            vec![
                Vector3::x(),
                Vector3::new(c, s, 0.0),
                Vector3::new(c, -s, 0.0),
            ]
        }
        (DomainGeometry::Trigonal, 1) => {
            let n = unit[0];
            let p = reference
                .and_then(|r| (r - n * n.dot(r)).try_normalize(1e-8))
                .unwrap_or_else(|| perpendicular(&n));
            let (s, c) = 120f64.to_radians().sin_cos();
            vec![n * c - p * s, n * c + p * s]
        }
        (DomainGeometry::Trigonal, 2) => bisector_opposite(&unit).into_iter().collect(),

        (DomainGeometry::Tetrahedral, 0) => {
            let k = 1.0 / 3f64.sqrt();
            vec![
                Vector3::new(k, k, k),
                Vector3::new(k, -k, -k),
                Vector3::new(-k, k, -k),
                Vector3::new(-k, -k, k),
            ]
        }
        (DomainGeometry::Tetrahedral, 1) => {
            let n = unit[0];
            // The first substituent goes anti to the reference so chains come out staggered.
            let p = reference
                .and_then(|r| (-(r - n * n.dot(r))).try_normalize(1e-8))
                .unwrap_or_else(|| perpendicular(&n));
            let first = Rotation3::from_axis_angle(
                &Unit::new_normalize(n.cross(&p)),
                TETRAHEDRAL_ANGLE_DEG.to_radians(),
            ) * n;
            let spin = Rotation3::from_axis_angle(&Unit::new_normalize(n), 120f64.to_radians());
            let second = spin * first;
            let third = spin * second;
            vec![first, second, third]
        }
        (DomainGeometry::Tetrahedral, 2) => {
            let n1 = unit[0];
            let n2 = unit[1];
            match (
                (-(n1 + n2)).try_normalize(1e-8),
                n1.cross(&n2).try_normalize(1e-8),
            ) {
                (Some(b), Some(p)) => {
                    let half = (TETRAHEDRAL_ANGLE_DEG / 2.0).to_radians();
                    vec![b * half.cos() + p * half.sin(), b * half.cos() - p * half.sin()]
                }
                _ => Vec::new(),
            }
        }
        (DomainGeometry::Tetrahedral, 3) => bisector_opposite(&unit).into_iter().collect(),

        _ => Vec::new(),
    };

    dirs.truncate(count);
    if dirs.len() < count {
        let mut taken: Vec<Vector3<f64>> = unit.clone();
        taken.extend(dirs.iter().copied());
        let extra = spread_directions(&taken, count - dirs.len());
        dirs.extend(extra);
    }
    dirs
}

fn bisector_opposite(unit: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    let sum = unit.iter().fold(Vector3::zeros(), |acc, v| acc + v);
    (-sum).try_normalize(1e-8).or_else(|| {
        // Neighbors cancel out (planar or linear arrangement): go out of their plane.
        unit.first().map(perpendicular)
    })
}

/// Greedily picks `count` directions from the octahedral and cubic axes, each
/// time choosing the candidate farthest from everything already taken.
fn spread_directions(taken: &[Vector3<f64>], count: usize) -> Vec<Vector3<f64>> {
    let k = 1.0 / 3f64.sqrt();
    let mut candidates: Vec<Vector3<f64>> = vec![
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ];
    for sx in [-k, k] {
        for sy in [-k, k] {
            for sz in [-k, k] {
                candidates.push(Vector3::new(sx, sy, sz));
            }
        }
    }

    let mut used: Vec<Vector3<f64>> = taken.to_vec();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let best = candidates
            .iter()
            .map(|c| {
                let closeness = used
                    .iter()
                    .map(|u| c.dot(u))
                    .fold(f64::NEG_INFINITY, f64::max);
                (closeness, *c)
            })
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, c)| c)
            .unwrap_or_else(Vector3::x);
        used.push(best);
        picked.push(best);
    }
    picked
}

/// Plain coordinate RMSD between two equally sized sets, without superposition.
pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMSD after optimal rigid superposition (Kabsch), restricted to proper rotations.
///
/// Returns `None` when the sets differ in size or are empty.
pub fn superposed_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let c1 = centroid(coords1);
    let c2 = centroid(coords2);

    let mut covariance = Matrix3::zeros();
    let mut norm_sum = 0.0;
    for (a, b) in coords1.iter().zip(coords2) {
        let p = a - c1;
        let q = b - c2;
        covariance += p * q.transpose();
        norm_sum += p.norm_squared() + q.norm_squared();
    }

    let singular = covariance.svd(false, false).singular_values;
    let mut trace: f64 = singular.iter().sum();
    if covariance.determinant() < 0.0 {
        let smallest = singular.iter().copied().fold(f64::INFINITY, f64::min);
        trace -= 2.0 * smallest;
    }

    let residual = (norm_sum - 2.0 * trace).max(0.0);
    Some((residual / n).sqrt())
}
