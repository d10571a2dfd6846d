use crate::config::{Convergence, KMeansConfig};
use crate::distance::{assign_points, centroid_shift};
use crate::error::KMeansError;
use crate::init::{gather_rows, validate_k};
use crate::random::RandomSource;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView, ArrayView1, ArrayView2, Dimension, Ix2};

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Final centroids, shape (k, n_features)
    pub centroids: Array2<f32>,
    /// Cluster index of every input point, shape (n_samples,)
    pub labels: Array1<usize>,
    /// Number of update steps executed, in `1..=max_iters`
    pub n_iterations: usize,
}

/// Reinterpret `data` as an (n_samples, n_features) matrix.
///
/// Fails with [`KMeansError::InvalidShape`] if the array is not 2-D or has no
/// feature columns.
pub(crate) fn as_matrix<'a, D: Dimension>(
    data: &ArrayView<'a, f32, D>,
) -> Result<ArrayView2<'a, f32>, KMeansError> {
    let matrix = data.clone().into_dimensionality::<Ix2>().map_err(|_| {
        KMeansError::InvalidShape(format!(
            "Expected a 2-D array of shape (n_samples, n_features), got shape {:?}",
            data.shape()
        ))
    })?;

    if matrix.ncols() == 0 {
        return Err(KMeansError::InvalidShape(
            "Data must have at least one feature".to_string(),
        ));
    }

    Ok(matrix)
}

/// Validate everything a fit needs before any work starts
pub(crate) fn validate_fit(data: &ArrayView2<f32>, config: &KMeansConfig) -> Result<(), KMeansError> {
    if data.ncols() == 0 {
        return Err(KMeansError::InvalidShape(
            "Data must have at least one feature".to_string(),
        ));
    }
    validate_k(data.nrows(), config.k)?;
    validate_budget(config)
}

fn validate_budget(config: &KMeansConfig) -> Result<(), KMeansError> {
    if config.max_iters == 0 {
        return Err(KMeansError::InvalidArgument(
            "max_iters must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_centroids(data: &ArrayView2<f32>, centroids: &Array2<f32>) -> Result<(), KMeansError> {
    if centroids.nrows() == 0 {
        return Err(KMeansError::InvalidShape(
            "At least one centroid is required".to_string(),
        ));
    }

    if centroids.ncols() != data.ncols() {
        return Err(KMeansError::InvalidShape(format!(
            "Centroids have {} features, data has {}",
            centroids.ncols(),
            data.ncols()
        )));
    }

    Ok(())
}

/// Run the full k-means pipeline: validate, initialize, then refine with Lloyd.
pub fn kmeans<R: RandomSource + ?Sized>(
    data: &ArrayView2<f32>,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<KMeansResult, KMeansError> {
    validate_fit(data, config)?;

    debug!(
        "Training k-means: {} samples, {} features, {} clusters",
        data.nrows(),
        data.ncols(),
        config.k
    );

    let indices = config.init.select(data, config.k, rng)?;
    let centroids = gather_rows(data, &indices);

    Ok(refine(data, centroids, config))
}

/// Refine `centroids` with Lloyd iterations until convergence or until
/// `config.max_iters` update steps have run.
///
/// `config.k` and `config.init` are ignored; the number of clusters is the
/// number of rows of `centroids`.
///
/// # Errors
///
/// Returns [`KMeansError::InvalidShape`] if `centroids` is empty or its width
/// differs from `data`, and [`KMeansError::InvalidArgument`] if
/// `config.max_iters` is 0.
pub fn lloyd(
    data: &ArrayView2<f32>,
    centroids: Array2<f32>,
    config: &KMeansConfig,
) -> Result<KMeansResult, KMeansError> {
    validate_centroids(data, &centroids)?;
    validate_budget(config)?;

    Ok(refine(data, centroids, config))
}

fn refine(data: &ArrayView2<f32>, mut centroids: Array2<f32>, config: &KMeansConfig) -> KMeansResult {
    let mut labels: Array1<usize> = Array1::zeros(data.nrows());
    let mut n_iterations = 0;

    for iteration in 0..config.max_iters {
        n_iterations = iteration + 1;

        // The assignment step completes before any centroid moves
        let new_labels = assign_points(data, &centroids.view());
        let n_changed = new_labels
            .iter()
            .zip(labels.iter())
            .filter(|(a, b)| a != b)
            .count();
        labels = new_labels;

        let prev_centroids = centroids.clone();
        let empty = move_centroids(data, &labels.view(), &mut centroids);

        let shift = centroid_shift(&prev_centroids.view(), &centroids.view());
        debug!(
            "  Iteration {}/{}: {} labels changed, {} empty clusters, shift = {:.6}",
            n_iterations, config.max_iters, n_changed, empty, shift
        );

        let converged = match config.convergence {
            // The first update is compared against an all-zero baseline
            // that never matches, so at least two passes are made.
            Convergence::Exact => iteration > 0 && prev_centroids == centroids,
            Convergence::Tolerance => config.tol >= 0.0 && shift < config.tol,
        };

        if converged {
            info!("Converged after {} iterations", n_iterations);
            return KMeansResult {
                centroids,
                labels,
                n_iterations,
            };
        }
    }

    info!(
        "Stopped after exhausting the budget of {} iterations",
        config.max_iters
    );
    KMeansResult {
        centroids,
        labels,
        n_iterations,
    }
}

/// Move every non-empty cluster's centroid to the mean of its points.
///
/// Empty clusters keep their current centroid. Sums are accumulated in point
/// order so the result is deterministic. Returns the number of empty clusters.
///
/// # Errors
///
/// Returns [`KMeansError::InvalidShape`] if `centroids` is empty or its width
/// differs from `data`, if `labels` doesn't have one entry per row, or if a
/// label is not a valid centroid index. `centroids` is untouched on error.
pub fn update_centroids(
    data: &ArrayView2<f32>,
    labels: &ArrayView1<usize>,
    centroids: &mut Array2<f32>,
) -> Result<usize, KMeansError> {
    validate_centroids(data, centroids)?;

    if labels.len() != data.nrows() {
        return Err(KMeansError::InvalidShape(format!(
            "Expected {} labels, got {}",
            data.nrows(),
            labels.len()
        )));
    }

    if let Some(&label) = labels.iter().find(|&&label| label >= centroids.nrows()) {
        return Err(KMeansError::InvalidShape(format!(
            "Label {} out of range for {} centroids",
            label,
            centroids.nrows()
        )));
    }

    Ok(move_centroids(data, labels, centroids))
}

fn move_centroids(data: &ArrayView2<f32>, labels: &ArrayView1<usize>, centroids: &mut Array2<f32>) -> usize {
    let (k, n_features) = centroids.dim();

    let mut cluster_sums: Array2<f32> = Array2::zeros((k, n_features));
    let mut cluster_counts = vec![0usize; k];

    for (point, &label) in data.outer_iter().zip(labels.iter()) {
        cluster_counts[label] += 1;
        let mut sum = cluster_sums.row_mut(label);
        sum += &point;
    }

    let mut empty = 0;
    for (cluster_idx, &count) in cluster_counts.iter().enumerate() {
        if count > 0 {
            let mean = &cluster_sums.row(cluster_idx) / count as f32;
            centroids.row_mut(cluster_idx).assign(&mean);
        } else {
            empty += 1;
        }
    }

    empty
}

/// Predict cluster assignments for new data using trained centroids
pub fn predict_labels(data: &ArrayView2<f32>, centroids: &ArrayView2<f32>) -> Array1<usize> {
    assign_points(data, centroids)
}
