//! Nearest-centroid classification on top of k-means.
//!
//! Each cluster found by [`KMeans`](crate::KMeans) is given the label that is
//! most common among its training points, and new points are classified
//! with the label of their nearest centroid.

use crate::algorithm::{as_matrix, kmeans, predict_labels};
use crate::config::KMeansConfig;
use crate::distance::squared_euclidean;
use crate::error::KMeansError;
use crate::kmeans::check_features;
use crate::random::RandomSource;
use log::debug;
use ndarray::{Array2, ArrayView, ArrayView1, ArrayView2, Dimension};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Fitted centroids together with the label voted for each of them
#[derive(Debug, Clone)]
struct Fitted<L> {
    centroids: Array2<f32>,
    labels: Vec<L>,
}

/// Classifier assigning each k-means cluster the majority label of its points.
///
/// # Example
///
/// ```
/// use lloyd_kmeans::{Initializer, KMeansClassifier, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
/// let labels = ["cat", "cat", "dog", "dog"];
///
/// let config = KMeansConfig::new(2).with_init(Initializer::KMeansPlusPlus);
/// let mut classifier = KMeansClassifier::with_config(config);
/// classifier.fit(&data.view(), &labels).unwrap();
///
/// let predicted = classifier.predict(&array![[9.0f32, 0.5]].view()).unwrap();
/// assert_eq!(predicted, vec!["dog"]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeansClassifier<L> {
    config: KMeansConfig,
    fitted: Option<Fitted<L>>,
}

impl<L: Clone + Ord> KMeansClassifier<L> {
    /// Create a classifier with default configuration and `k` clusters.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a classifier with a custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Fit the classifier, seeding initialization from `config.seed`.
    pub fn fit<D: Dimension>(&mut self, data: &ArrayView<f32, D>, labels: &[L]) -> Result<(), KMeansError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(data, labels, &mut rng)
    }

    /// Fit the classifier using the given random source for initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not 2-D, or `labels` doesn't have one entry per row
    /// - `k` is 0 or exceeds the number of samples
    /// - `max_iters` is 0
    ///
    /// The fitted state is replaced only when the whole fit succeeds.
    pub fn fit_with_rng<D: Dimension, R: RandomSource + ?Sized>(
        &mut self,
        data: &ArrayView<f32, D>,
        labels: &[L],
        rng: &mut R,
    ) -> Result<(), KMeansError> {
        let data = as_matrix(data)?;
        if labels.len() != data.nrows() {
            return Err(KMeansError::InvalidShape(format!(
                "Expected {} labels, got {}",
                data.nrows(),
                labels.len()
            )));
        }

        let result = kmeans(&data, &self.config, rng)?;
        let centroid_labels = vote_labels(&data, labels, &result.labels.view(), &result.centroids.view());

        debug!(
            "Classifier fitted {} clusters in {} iterations",
            centroid_labels.len(),
            result.n_iterations
        );

        self.fitted = Some(Fitted {
            centroids: result.centroids,
            labels: centroid_labels,
        });
        Ok(())
    }

    /// Predict a label for every row of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The classifier has not been fitted yet
    /// - The data is not 2-D or its feature count differs from the training data
    pub fn predict<D: Dimension>(&self, data: &ArrayView<f32, D>) -> Result<Vec<L>, KMeansError> {
        let fitted = self.fitted.as_ref().ok_or(KMeansError::NotFitted)?;
        let data = as_matrix(data)?;
        check_features(fitted.centroids.ncols(), data.ncols())?;

        Ok(predict_labels(&data, &fitted.centroids.view())
            .iter()
            .map(|&cluster| fitted.labels[cluster].clone())
            .collect())
    }

    /// Fitted centroids, in cluster order.
    pub fn centroids(&self) -> Option<&Array2<f32>> {
        self.fitted.as_ref().map(|fitted| &fitted.centroids)
    }

    /// Label of every fitted centroid, in cluster order.
    pub fn centroid_labels(&self) -> Option<&[L]> {
        self.fitted.as_ref().map(|fitted| fitted.labels.as_slice())
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

/// Pick a label for every cluster by majority vote.
///
/// Ties between equally common labels go to the smallest label. A cluster
/// without points takes the label of the training point nearest to its
/// centroid.
fn vote_labels<L: Clone + Ord>(
    data: &ArrayView2<f32>,
    labels: &[L],
    assignments: &ArrayView1<usize>,
    centroids: &ArrayView2<f32>,
) -> Vec<L> {
    let k = centroids.nrows();
    let mut votes: Vec<BTreeMap<&L, usize>> = vec![BTreeMap::new(); k];

    for (label, &cluster) in labels.iter().zip(assignments.iter()) {
        *votes[cluster].entry(label).or_insert(0) += 1;
    }

    votes
        .iter()
        .enumerate()
        .map(|(cluster, counts)| {
            let mut winner: Option<(&L, usize)> = None;
            for (&label, &count) in counts {
                if winner.map_or(true, |(_, best)| count > best) {
                    winner = Some((label, count));
                }
            }

            match winner {
                Some((label, _)) => label.clone(),
                None => nearest_point_label(data, labels, &centroids.row(cluster)),
            }
        })
        .collect()
}

fn nearest_point_label<L: Clone>(data: &ArrayView2<f32>, labels: &[L], centroid: &ArrayView1<f32>) -> L {
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;
    for (i, point) in data.outer_iter().enumerate() {
        let dist = squared_euclidean(&point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    labels[best_idx].clone()
}
