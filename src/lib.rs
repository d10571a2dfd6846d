//! # lloyd-kmeans
//!
//! K-means clustering with Lloyd's algorithm in Rust, compatible with ndarray.
//!
//! ## Features
//!
//! - **Two initializers**: uniform sampling and farthest-point K-Means++
//! - **Deterministic**: randomness comes from an injected [`RandomSource`] or a
//!   seeded `ChaCha8Rng`; exact-equality convergence by default
//! - **Parallel assignment step**: uses rayon across points
//! - **Nearest-centroid classifier**: majority-vote labels per cluster
//! - **Color quantization**: map image pixels onto a k-means code book
//!
//! ## Example
//!
//! ```rust
//! use lloyd_kmeans::{Initializer, KMeans, KMeansConfig};
//! use ndarray::Array2;
//! use ndarray_rand::RandomExt;
//! use ndarray_rand::rand_distr::Uniform;
//!
//! // Generate random data
//! let data = Array2::random((1000, 16), Uniform::new(-1.0f32, 1.0));
//!
//! let config = KMeansConfig::new(10)
//!     .with_max_iters(50)
//!     .with_seed(42)
//!     .with_init(Initializer::KMeansPlusPlus);
//!
//! let mut kmeans = KMeans::with_config(config);
//! let result = kmeans.fit(&data.view()).unwrap();
//!
//! assert_eq!(result.labels.len(), 1000);
//! assert!(result.n_iterations <= 50);
//! ```
//!
//! ## Reproducible initialization
//!
//! Any [`rand::Rng`] can be passed as the random source:
//!
//! ```rust
//! use lloyd_kmeans::KMeans;
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let data = array![[0.0f32], [1.0], [10.0], [11.0]];
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let mut kmeans = KMeans::new(2);
//! kmeans.fit_with_rng(&data.view(), &mut rng).unwrap();
//! ```

mod algorithm;
mod classifier;
mod config;
mod distance;
mod error;
mod init;
mod kmeans;
mod quantize;
mod random;

pub use algorithm::{lloyd, update_centroids, KMeansResult};
pub use classifier::KMeansClassifier;
pub use config::{Convergence, KMeansConfig};
pub use distance::{nearest_centroid, squared_euclidean};
pub use error::KMeansError;
pub use init::Initializer;
pub use kmeans::KMeans;
pub use quantize::{fit_code_vectors, image_pixels, quantize_image, CHANNELS};
pub use random::RandomSource;
