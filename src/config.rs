use crate::init::Initializer;

/// Rule deciding when the Lloyd iterations stop before the budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convergence {
    /// Stop once an update step leaves every centroid bit-for-bit unchanged.
    #[default]
    Exact,

    /// Stop once the summed centroid movement of an update step drops below
    /// [`KMeansConfig::tol`].
    Tolerance,
}

/// Configuration for the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of update steps
    pub max_iters: usize,

    /// Centroid shift threshold, only consulted by [`Convergence::Tolerance`]
    pub tol: f64,

    /// Random seed used when no random source is passed explicitly
    pub seed: u64,

    /// Centroid initialization strategy
    pub init: Initializer,

    /// Stopping rule
    pub convergence: Convergence,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            max_iters: 100,
            tol: 1e-4,
            seed: 0,
            init: Initializer::Uniform,
            convergence: Convergence::Exact,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the initialization strategy
    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = init;
        self
    }

    /// Set the stopping rule
    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }
}
