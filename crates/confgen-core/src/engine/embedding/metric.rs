use super::bounds::BoundsMatrix;
use nalgebra::{DMatrix, Point3, SymmetricEigen};
use rand::Rng;

const EIGENVALUE_FLOOR: f64 = 1e-8;

/// Draws every pairwise distance uniformly between its smoothed bounds.
pub(crate) fn sample_distances<R: Rng + ?Sized>(bounds: &BoundsMatrix, rng: &mut R) -> DMatrix<f64> {
    let n = bounds.len();
    let mut distances = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (lower, upper) = (bounds.lower(i, j), bounds.upper(i, j));
            let d = lower + rng.gen_range(0.0..1.0) * (upper - lower).max(0.0);
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }
    distances
}

/// Recovers 3D coordinates from a distance matrix through its metric matrix.
///
/// Coordinates come from the three largest eigenpairs of the Gram matrix
/// centered on the centroid. Returns `None` when no eigenvalue is positive.
pub(crate) fn coordinates_from_distances(distances: &DMatrix<f64>) -> Option<Vec<Point3<f64>>> {
    let n = distances.nrows();
    let squared = distances.map(|d| d * d);
    let nf = n as f64;
    let pair_sum = 0.5 * squared.sum();

    let to_centroid: Vec<f64> = (0..n)
        .map(|i| squared.row(i).sum() / nf - pair_sum / (nf * nf))
        .collect();
    let metric = DMatrix::from_fn(n, n, |i, j| {
        0.5 * (to_centroid[i] + to_centroid[j] - squared[(i, j)])
    });

    let eigen = SymmetricEigen::new(metric);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let largest = eigen.eigenvalues[*order.first()?];
    if !largest.is_finite() || largest <= EIGENVALUE_FLOOR {
        return None;
    }

    let mut positions = vec![Point3::origin(); n];
    for (axis, &column) in order.iter().take(3).enumerate() {
        let lambda = eigen.eigenvalues[column];
        if lambda <= 0.0 {
            continue;
        }
        let scale = lambda.sqrt();
        for (atom, p) in positions.iter_mut().enumerate() {
            p[axis] = scale * eigen.eigenvectors[(atom, column)];
        }
    }
    Some(positions)
}
