use crate::algorithm::{as_matrix, kmeans, predict_labels, KMeansResult};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use crate::random::RandomSource;
use ndarray::{Array1, Array2, ArrayView, Dimension};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// K-means clustering model refined with Lloyd's algorithm.
///
/// Inputs are `f32` arrays of shape (n_samples, n_features). Any
/// [`ArrayView`] is accepted and its rank is checked at runtime.
///
/// # Example
///
/// ```
/// use lloyd_kmeans::{Initializer, KMeans, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
///
/// let config = KMeansConfig::new(2).with_init(Initializer::KMeansPlusPlus);
/// let mut kmeans = KMeans::with_config(config);
/// let result = kmeans.fit(&data.view()).unwrap();
///
/// assert_eq!(result.labels[0], result.labels[1]);
/// assert_ne!(result.labels[0], result.labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features, 0 until the first fit
    d: usize,

    /// Trained centroids (None if not yet fitted)
    centroids: Option<Array2<f32>>,

    /// Update steps taken by the last fit
    n_iterations: usize,
}

impl KMeans {
    /// Create a new model with default configuration and `k` clusters.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a new model with a custom configuration.
    ///
    /// The configuration is validated when fitting.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            d: 0,
            centroids: None,
            n_iterations: 0,
        }
    }

    /// Fit the model, drawing initial centroids from a `ChaCha8Rng` seeded
    /// with `config.seed`.
    ///
    /// Repeated calls with the same data and configuration give the same
    /// result.
    pub fn fit<D: Dimension>(&mut self, data: &ArrayView<f32, D>) -> Result<KMeansResult, KMeansError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit the model using the given random source for initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not 2-D or has no features
    /// - `k` is 0 or exceeds the number of samples
    /// - `max_iters` is 0
    ///
    /// On error the previously fitted state is left untouched.
    pub fn fit_with_rng<D: Dimension, R: RandomSource + ?Sized>(
        &mut self,
        data: &ArrayView<f32, D>,
        rng: &mut R,
    ) -> Result<KMeansResult, KMeansError> {
        let data = as_matrix(data)?;
        let result = kmeans(&data, &self.config, rng)?;

        self.d = data.ncols();
        self.centroids = Some(result.centroids.clone());
        self.n_iterations = result.n_iterations;
        Ok(result)
    }

    /// Predict the nearest fitted centroid for every row of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - The data is not 2-D or its feature count differs from the training data
    pub fn predict<D: Dimension>(&self, data: &ArrayView<f32, D>) -> Result<Array1<usize>, KMeansError> {
        let centroids = self.centroids.as_ref().ok_or(KMeansError::NotFitted)?;
        let data = as_matrix(data)?;
        check_features(self.d, data.ncols())?;

        Ok(predict_labels(&data, &centroids.view()))
    }

    /// Fit the model and return the cluster index of every training point.
    pub fn fit_predict<D: Dimension>(&mut self, data: &ArrayView<f32, D>) -> Result<Array1<usize>, KMeansError> {
        self.fit(data).map(|result| result.labels)
    }

    /// Get the centroids of the fitted model.
    pub fn centroids(&self) -> Option<&Array2<f32>> {
        self.centroids.as_ref()
    }

    /// Number of update steps taken by the last successful fit.
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (0 before fitting).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

pub(crate) fn check_features(expected: usize, got: usize) -> Result<(), KMeansError> {
    if expected != got {
        return Err(KMeansError::InvalidShape(format!(
            "Expected {} features, got {}",
            expected, got
        )));
    }
    Ok(())
}
