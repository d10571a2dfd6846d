use approx::assert_abs_diff_eq;
use lloyd_kmeans::{
    fit_code_vectors, lloyd, quantize_image, squared_euclidean, update_centroids, Convergence,
    Initializer, KMeans, KMeansClassifier, KMeansConfig, KMeansError, RandomSource,
};
use ndarray::{array, Array2, Array3, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Random source replaying a fixed list of indices
struct Scripted(Vec<usize>);

impl RandomSource for Scripted {
    fn index(&mut self, n: usize) -> usize {
        assert!(!self.0.is_empty(), "script exhausted");
        self.0.remove(0) % n
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two groups of two points, ten units apart on the x axis
fn two_groups() -> Array2<f32> {
    array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
}

/// Generate synthetic clustered data with known centers
fn generate_clustered_data(
    n_samples: usize,
    n_features: usize,
    n_clusters: usize,
    seed: u64,
) -> (Array2<f32>, Array2<f32>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let centers = Array2::random_using(
        (n_clusters, n_features),
        Uniform::new(-10.0f32, 10.0),
        &mut rng,
    );

    let noise = Array2::random_using((n_samples, n_features), Uniform::new(-0.5f32, 0.5), &mut rng);
    let mut data = Array2::zeros((n_samples, n_features));
    for (i, mut row) in data.outer_iter_mut().enumerate() {
        let center = centers.row(i % n_clusters);
        row.assign(&(&center + &noise.row(i)));
    }

    (data, centers)
}

// ============================================================================
// Engine Scenarios
// ============================================================================

#[test]
fn test_two_groups_converge() {
    init_logger();
    let data = two_groups();
    let mut kmeans = KMeans::with_config(KMeansConfig::new(2));

    let result = kmeans
        .fit_with_rng(&data.view(), &mut Scripted(vec![0, 2]))
        .unwrap();

    assert!(result.n_iterations <= 3);
    assert_eq!(result.n_iterations, 2);
    assert_abs_diff_eq!(
        result.centroids,
        array![[0.0f32, 0.5], [10.0, 0.5]],
        epsilon = 1e-6
    );
    assert_eq!(result.labels.to_vec(), vec![0, 0, 1, 1]);
}

#[test]
fn test_empty_cluster_keeps_initial_value() {
    init_logger();
    // The third center duplicates the second one and loses every tie.
    let data = array![[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0], [10.0, 2.0]];
    let mut kmeans = KMeans::new(3);

    let result = kmeans
        .fit_with_rng(&data.view(), &mut Scripted(vec![0, 3, 3]))
        .unwrap();

    assert_eq!(result.labels.to_vec(), vec![0, 0, 1, 1, 1]);
    assert_eq!(result.centroids.row(2), array![10.0f32, 1.0]);
    assert!(result.centroids.iter().all(|v| v.is_finite()));
}

#[test]
fn test_budget_exhaustion_is_not_an_error() {
    let (data, _) = generate_clustered_data(400, 4, 4, 3);
    let config = KMeansConfig::new(4).with_max_iters(1);

    let result = KMeans::with_config(config).fit(&data.view()).unwrap();
    assert_eq!(result.n_iterations, 1);
}

#[test]
fn test_tolerance_convergence_variant() {
    let (data, _) = generate_clustered_data(600, 8, 3, 5);
    let config = KMeansConfig::new(3)
        .with_init(Initializer::KMeansPlusPlus)
        .with_convergence(Convergence::Tolerance)
        .with_tol(1e-3)
        .with_max_iters(50);

    let result = KMeans::with_config(config).fit(&data.view()).unwrap();
    assert!(result.n_iterations >= 1 && result.n_iterations <= 50);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_assignments_minimize_distance() {
    let data = Array2::random((400, 6), Uniform::new(-1.0f32, 1.0));
    let config = KMeansConfig::new(7).with_seed(17);

    let result = KMeans::with_config(config).fit(&data.view()).unwrap();

    for (point, &label) in data.outer_iter().zip(result.labels.iter()) {
        let assigned = squared_euclidean(&point, &result.centroids.row(label));
        for centroid in result.centroids.outer_iter() {
            assert!(assigned <= squared_euclidean(&point, &centroid) + 1e-5);
        }
    }
}

#[test]
fn test_converged_centroids_are_a_fixed_point() {
    let (data, _) = generate_clustered_data(500, 8, 5, 42);
    let config = KMeansConfig::new(5)
        .with_init(Initializer::KMeansPlusPlus)
        .with_max_iters(200);

    let result = KMeans::with_config(config).fit(&data.view()).unwrap();
    assert!(result.n_iterations < 200, "should converge within budget");

    let mut centroids = result.centroids.clone();
    update_centroids(&data.view(), &result.labels.view(), &mut centroids).unwrap();
    assert_eq!(centroids, result.centroids);
}

#[test]
fn test_iteration_count_within_bounds() {
    for seed in 0..10 {
        let data = Array2::random((100, 3), Uniform::new(-1.0f32, 1.0));
        let config = KMeansConfig::new(4).with_max_iters(5).with_seed(seed);

        let result = KMeans::with_config(config).fit(&data.view()).unwrap();
        assert!(result.n_iterations >= 1 && result.n_iterations <= 5);
    }
}

#[test]
fn test_kmeans_plus_plus_distinct_indices() {
    let data = Array2::random((40, 3), Uniform::new(-1.0f32, 1.0));

    for seed in 0..20 {
        let first = ChaCha8Rng::seed_from_u64(seed).index(40);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let indices = Initializer::KMeansPlusPlus
            .select(&data.view(), 8, &mut rng)
            .unwrap();

        assert_eq!(indices.len(), 8);
        assert_eq!(indices[0], first);
        assert!(indices.iter().all(|&i| i < 40));
        assert_eq!(indices.iter().collect::<HashSet<_>>().len(), 8);
    }
}

#[test]
fn test_reproducibility_with_seed() {
    let data = Array2::random((500, 32), Uniform::new(-1.0f32, 1.0));
    let config = KMeansConfig::new(5).with_max_iters(25).with_seed(12345);

    let mut kmeans1 = KMeans::with_config(config.clone());
    let mut kmeans2 = KMeans::with_config(config);
    kmeans1.fit(&data.view()).unwrap();
    kmeans2.fit(&data.view()).unwrap();

    assert_eq!(kmeans1.centroids(), kmeans2.centroids());
    assert_eq!(kmeans1.n_iterations(), kmeans2.n_iterations());
}

#[test]
fn test_well_separated_clusters_recovered() {
    let (data, centers) = generate_clustered_data(1000, 16, 5, 42);
    let config = KMeansConfig::new(5).with_init(Initializer::KMeansPlusPlus);

    let result = KMeans::with_config(config).fit(&data.view()).unwrap();

    // Every true center has a fitted centroid within the noise radius
    for center in centers.outer_iter() {
        let closest = result
            .centroids
            .outer_iter()
            .map(|c| squared_euclidean(&center, &c))
            .fold(f32::INFINITY, f32::min);
        assert!(closest < 16.0 * 0.25, "center not recovered: {}", closest);
    }
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_k_equals_one() {
    let data = Array2::random((100, 8), Uniform::new(-1.0f32, 1.0));
    let mut kmeans = KMeans::new(1);

    let labels = kmeans.fit_predict(&data.view()).unwrap();
    assert!(labels.iter().all(|&label| label == 0));

    let data_mean = data.mean_axis(Axis(0)).unwrap();
    let centroids = kmeans.centroids().unwrap();
    assert_abs_diff_eq!(centroids.row(0), data_mean.view(), epsilon = 1e-4);
}

#[test]
fn test_k_equals_n_samples() {
    let data = Array2::random((10, 4), Uniform::new(-1.0f32, 1.0));
    let config = KMeansConfig::new(10).with_init(Initializer::KMeansPlusPlus);
    let mut kmeans = KMeans::with_config(config);

    let labels = kmeans.fit_predict(&data.view()).unwrap();

    let label_set: HashSet<usize> = labels.iter().copied().collect();
    assert_eq!(label_set.len(), 10, "Each point should have its own cluster");
}

#[test]
fn test_invalid_k() {
    let data = Array2::random((5, 8), Uniform::new(-1.0f32, 1.0));

    for k in [0, 6] {
        let result = KMeans::new(k).fit(&data.view());
        assert!(matches!(result, Err(KMeansError::InvalidArgument(_))));
    }
}

#[test]
fn test_non_matrix_input_rejected() {
    let data = Array3::<f32>::zeros((2, 3, 4));

    let result = KMeans::new(2).fit(&data.view());
    assert!(matches!(result, Err(KMeansError::InvalidShape(_))));
}

#[test]
fn test_engine_functions_reject_bad_inputs() {
    let data = two_groups();
    let config = KMeansConfig::new(2);

    // No centroids
    assert!(matches!(
        lloyd(&data.view(), Array2::zeros((0, 2)), &config),
        Err(KMeansError::InvalidShape(_))
    ));

    // Centroid width differs from the data
    assert!(matches!(
        lloyd(&data.view(), array![[0.0f32, 0.0, 0.0]], &config),
        Err(KMeansError::InvalidShape(_))
    ));

    // Zero iteration budget
    let zero_budget = config.clone().with_max_iters(0);
    assert!(matches!(
        lloyd(&data.view(), array![[0.0f32, 0.0]], &zero_budget),
        Err(KMeansError::InvalidArgument(_))
    ));

    // Label pointing past the last centroid
    let mut centroids = array![[0.0f32, 0.0], [10.0, 0.0]];
    assert!(matches!(
        update_centroids(&data.view(), &array![0usize, 0, 1, 5].view(), &mut centroids),
        Err(KMeansError::InvalidShape(_))
    ));
    assert_eq!(centroids, array![[0.0f32, 0.0], [10.0, 0.0]]);
}

#[test]
fn test_lloyd_from_explicit_centroids() {
    let data = two_groups();
    let config = KMeansConfig::new(2).with_max_iters(10);

    let result = lloyd(&data.view(), array![[0.0f32, 0.0], [10.0, 0.0]], &config).unwrap();

    assert!(result.n_iterations >= 1 && result.n_iterations <= 10);
    assert_eq!(result.labels.to_vec(), vec![0, 0, 1, 1]);
}

#[test]
fn test_predict_before_fit_fails() {
    let data = Array2::random((100, 8), Uniform::new(-1.0f32, 1.0));
    let kmeans = KMeans::new(5);

    assert!(matches!(
        kmeans.predict(&data.view()),
        Err(KMeansError::NotFitted)
    ));
}

// ============================================================================
// Classifier
// ============================================================================

#[test]
fn test_classifier_two_groups() {
    init_logger();
    let data = two_groups();
    let labels = ["A", "A", "B", "B"];
    let mut classifier = KMeansClassifier::new(2);

    classifier
        .fit_with_rng(&data.view(), &labels, &mut Scripted(vec![0, 2]))
        .unwrap();

    assert_eq!(classifier.centroid_labels(), Some(&["A", "B"][..]));
    assert_eq!(
        classifier.predict(&array![[0.0f32, 0.4]].view()).unwrap(),
        vec!["A"]
    );
}

#[test]
fn test_classifier_accuracy_on_clustered_data() {
    let (data, _) = generate_clustered_data(600, 8, 3, 11);
    let labels: Vec<usize> = (0..600).map(|i| i % 3).collect();
    let config = KMeansConfig::new(3).with_init(Initializer::KMeansPlusPlus);

    let mut classifier = KMeansClassifier::with_config(config);
    classifier.fit(&data.view(), &labels).unwrap();

    let predicted = classifier.predict(&data.view()).unwrap();
    assert_eq!(predicted, labels);
}

#[test]
fn test_classifier_errors() {
    let data = two_groups();
    let mut classifier: KMeansClassifier<u32> = KMeansClassifier::new(2);

    assert!(matches!(
        classifier.predict(&data.view()),
        Err(KMeansError::NotFitted)
    ));
    assert!(matches!(
        classifier.fit(&data.view(), &[1, 2, 3]),
        Err(KMeansError::InvalidShape(_))
    ));

    classifier.fit(&data.view(), &[1, 1, 2, 2]).unwrap();
    assert!(matches!(
        classifier.predict(&array![[0.0f32, 0.0, 0.0]].view()),
        Err(KMeansError::InvalidShape(_))
    ));
    assert!(matches!(
        classifier.predict(&Array3::<f32>::zeros((1, 1, 2)).view()),
        Err(KMeansError::InvalidShape(_))
    ));
}

// ============================================================================
// Image Quantization
// ============================================================================

#[test]
fn test_quantize_black_and_white_unchanged() {
    let image = array![[[0.0f32, 0.0, 0.0]], [[255.0, 255.0, 255.0]]];
    let code_vectors = array![[0.0f32, 0.0, 0.0], [255.0, 255.0, 255.0]];

    let quantized = quantize_image(&image.view(), &code_vectors.view()).unwrap();
    assert_eq!(quantized, image);
}

#[test]
fn test_quantize_with_fitted_palette() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let image = Array3::random_using((16, 16, 3), Uniform::new(0.0f32, 255.0), &mut rng);
    let config = KMeansConfig::new(4).with_init(Initializer::KMeansPlusPlus);

    let palette = fit_code_vectors(&image.view(), &config).unwrap().centroids;
    let quantized = quantize_image(&image.view(), &palette.view()).unwrap();

    assert_eq!(quantized.dim(), image.dim());
    let colors: HashSet<[u32; 3]> = quantized
        .lanes(Axis(2))
        .into_iter()
        .map(|p| [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()])
        .collect();
    assert!(colors.len() <= 4);
}
