use rand::Rng;

/// Source of random indices consumed by the centroid initializers.
///
/// Every [`rand::Rng`] is a `RandomSource`, so seeded generators such as
/// `rand_chacha::ChaCha8Rng` can be passed directly. Implement the trait by
/// hand to script the draws, e.g. to pin initial centroids in tests.
pub trait RandomSource {
    /// Draw an index uniformly from `[0, n)`.
    fn index(&mut self, n: usize) -> usize;

    /// Draw `k` indices from `[0, n)` independently, with replacement.
    fn indices_with_replacement(&mut self, n: usize, k: usize) -> Vec<usize> {
        (0..k).map(|_| self.index(n)).collect()
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

/// Random source replaying a fixed list of indices, for pinning initial
/// centroids in tests
#[cfg(test)]
pub(crate) struct Scripted(std::vec::IntoIter<usize>);

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(indices: Vec<usize>) -> Self {
        Self(indices.into_iter())
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn index(&mut self, n: usize) -> usize {
        self.0.next().expect("script exhausted") % n
    }
}
