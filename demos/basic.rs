//! Basic example demonstrating lloyd-kmeans usage
//!
//! Run with: cargo run --example basic --release

use lloyd_kmeans::{Initializer, KMeans, KMeansClassifier, KMeansConfig};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    env_logger::init();

    println!("=== lloyd-kmeans example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!("Generating {} samples with {} features...", n_samples, n_features);

    let mut data = Array2::<f32>::zeros((n_samples, n_features));
    let mut truth = Vec::with_capacity(n_samples);

    // Cluster centers
    let centers = [[-5.0f32, -5.0], [0.0, 5.0], [5.0, -5.0]];
    let names = ["south-west", "north", "south-east"];

    for i in 0..n_samples {
        let cluster_idx = i % 3;
        let noise = Array2::random((1, n_features), Uniform::new(-1.0f32, 1.0));
        data[[i, 0]] = centers[cluster_idx][0] + noise[[0, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[0, 1]];
        truth.push(names[cluster_idx]);
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let config = KMeansConfig::new(n_clusters)
        .with_max_iters(100)
        .with_seed(42)
        .with_init(Initializer::KMeansPlusPlus);

    println!("Running k-means with k={}...\n", n_clusters);

    let mut kmeans = KMeans::with_config(config.clone());
    let result = kmeans.fit(&data.view()).expect("Fitting failed");

    println!("Converged after {} iterations", result.n_iterations);
    println!("\nLearned centroids:");
    for (i, centroid) in result.centroids.outer_iter().enumerate() {
        println!("  Centroid {}: ({:.4}, {:.4})", i, centroid[0], centroid[1]);
    }
    println!();

    // Count samples per cluster
    let mut cluster_counts = vec![0usize; n_clusters];
    for &label in result.labels.iter() {
        cluster_counts[label] += 1;
    }

    println!("Cluster distribution:");
    for (i, count) in cluster_counts.iter().enumerate() {
        println!(
            "  Cluster {}: {} samples ({:.1}%)",
            i,
            count,
            (*count as f64 / n_samples as f64) * 100.0
        );
    }
    println!();

    // Use the ground-truth names as labels for a nearest-centroid classifier
    let mut classifier = KMeansClassifier::with_config(config);
    classifier
        .fit(&data.view(), &truth)
        .expect("Classifier fitting failed");

    let queries = ndarray::array![[-4.0f32, -6.0], [0.5, 4.0], [6.0, -4.5]];
    let predicted = classifier
        .predict(&queries.view())
        .expect("Prediction failed");

    println!("Classifier predictions:");
    for (query, name) in queries.outer_iter().zip(predicted.iter()) {
        println!("  ({:.2}, {:.2}) -> {}", query[0], query[1], name);
    }

    println!("\n=== Done! ===");
}
