use crate::distance::squared_euclidean;
use crate::error::KMeansError;
use crate::random::RandomSource;
use log::debug;
use ndarray::{Array2, ArrayView2};

/// Strategy used to pick the initial centroids among the data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initializer {
    /// Draw `k` point indices uniformly at random, with replacement.
    ///
    /// Repeated indices give duplicate centroids. The duplicates converge
    /// naturally: the lowest-indexed copy wins every assignment tie and the
    /// others stay where they are as empty clusters.
    #[default]
    Uniform,

    /// Pick the first center at random, then repeatedly pick the point
    /// farthest from its nearest chosen center.
    KMeansPlusPlus,
}

impl Initializer {
    /// Select `k` row indices of `data` to seed the centroids with.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::InvalidArgument`] if `k` is 0 or larger than the
    /// number of points.
    pub fn select<R: RandomSource + ?Sized>(
        &self,
        data: &ArrayView2<f32>,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, KMeansError> {
        validate_k(data.nrows(), k)?;

        let indices = match self {
            Initializer::Uniform => uniform_indices(data.nrows(), k, rng),
            Initializer::KMeansPlusPlus => kmeans_plus_plus_indices(data, k, rng),
        };

        debug!("{:?} initialization chose indices {:?}", self, indices);
        Ok(indices)
    }
}

/// Check that `k` clusters can be drawn from `n_samples` points
pub(crate) fn validate_k(n_samples: usize, k: usize) -> Result<(), KMeansError> {
    if k == 0 {
        return Err(KMeansError::InvalidArgument(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KMeansError::InvalidArgument(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    Ok(())
}

fn uniform_indices<R: RandomSource + ?Sized>(n_samples: usize, k: usize, rng: &mut R) -> Vec<usize> {
    rng.indices_with_replacement(n_samples, k)
}

/// Farthest-point K-Means++ seeding.
///
/// `nearest` holds each point's squared distance to its closest chosen
/// center and is refreshed against the newest center only, so the whole
/// selection costs O(n * k) distance evaluations. Chosen points are skipped
/// when searching for the next center; this only matters once every
/// remaining distance is zero, and keeps the indices distinct.
fn kmeans_plus_plus_indices<R: RandomSource + ?Sized>(
    data: &ArrayView2<f32>,
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let n_samples = data.nrows();

    let mut centers = Vec::with_capacity(k);
    let mut chosen = vec![false; n_samples];
    let mut nearest = vec![f32::INFINITY; n_samples];

    let first = rng.index(n_samples);
    centers.push(first);
    chosen[first] = true;

    while centers.len() < k {
        let newest = data.row(centers[centers.len() - 1]);
        for (i, point) in data.outer_iter().enumerate() {
            let dist = squared_euclidean(&point, &newest);
            if dist < nearest[i] {
                nearest[i] = dist;
            }
        }

        let mut best_idx = None;
        let mut best_dist = f32::NEG_INFINITY;
        for (i, &dist) in nearest.iter().enumerate() {
            if !chosen[i] && dist > best_dist {
                best_dist = dist;
                best_idx = Some(i);
            }
        }

        // k <= n_samples leaves an unchosen point; take the lowest one if
        // none compared greater
        let next = best_idx.or_else(|| chosen.iter().position(|&c| !c));
        let Some(next) = next else {
            break;
        };
        centers.push(next);
        chosen[next] = true;
    }

    centers
}

/// Copy the selected rows of `data` into a fresh centroid matrix
pub(crate) fn gather_rows(data: &ArrayView2<f32>, indices: &[usize]) -> Array2<f32> {
    let mut centroids = Array2::zeros((indices.len(), data.ncols()));
    for (centroid_idx, &data_idx) in indices.iter().enumerate() {
        centroids.row_mut(centroid_idx).assign(&data.row(data_idx));
    }
    centroids
}
