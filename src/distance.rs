use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Squared Euclidean distance between two points of equal length.
///
/// Differences are taken before squaring, which keeps the result
/// non-negative and avoids the cancellation of the `||x||^2 + ||c||^2 - 2*x.c`
/// expansion.
#[inline]
pub fn squared_euclidean(a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Find the centroid nearest to `point`.
///
/// Returns the centroid index and its squared distance. Ties go to the
/// lowest index.
#[inline]
pub fn nearest_centroid(point: &ArrayView1<f32>, centroids: &ArrayView2<f32>) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;

    for (j, centroid) in centroids.outer_iter().enumerate() {
        let dist = squared_euclidean(point, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = j;
        }
    }

    (best_idx, best_dist)
}

/// Assign every row of `data` to its nearest centroid.
///
/// Points are processed in parallel; each label depends only on its own row,
/// so the output is the same as the serial version.
pub fn assign_points(data: &ArrayView2<f32>, centroids: &ArrayView2<f32>) -> Array1<usize> {
    let labels: Vec<usize> = (0..data.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(&data.row(i), centroids).0)
        .collect();

    Array1::from(labels)
}

/// Summed L2 movement of the centroids between two update steps
pub fn centroid_shift(old_centroids: &ArrayView2<f32>, new_centroids: &ArrayView2<f32>) -> f64 {
    old_centroids
        .outer_iter()
        .zip(new_centroids.outer_iter())
        .map(|(old_c, new_c)| (squared_euclidean(&old_c, &new_c) as f64).sqrt())
        .sum()
}
