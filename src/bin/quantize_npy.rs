//! Binary for quantizing an image stored as a .npy array
//!
//! Reads an (height, width, 3) `f32` array, fits a palette of `k` colors with
//! K-Means++ initialization, and writes the image with every pixel replaced
//! by its nearest palette color.
//!
//! Usage: `quantize-npy <input.npy> <output.npy> <k> <seed> <max_iters>`
//!
//! Set `RUST_LOG=debug` to follow the iterations.

use lloyd_kmeans::{fit_code_vectors, quantize_image, Initializer, KMeansConfig};
use log::info;
use ndarray::Array3;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 6 {
        eprintln!(
            "Usage: {} <input.npy> <output.npy> <k> <seed> <max_iters>",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let k: usize = args[3].parse()?;
    let seed: u64 = args[4].parse()?;
    let max_iters: usize = args[5].parse()?;

    let reader = BufReader::new(File::open(input_path)?);
    let image: Array3<f32> = Array3::read_npy(reader)?;
    info!("Loaded image with shape {:?}", image.shape());

    let config = KMeansConfig::new(k)
        .with_seed(seed)
        .with_max_iters(max_iters)
        .with_init(Initializer::KMeansPlusPlus);

    let result = fit_code_vectors(&image.view(), &config)?;
    info!(
        "Fitted {} colors in {} iterations",
        result.centroids.nrows(),
        result.n_iterations
    );

    let quantized = quantize_image(&image.view(), &result.centroids.view())?;

    let writer = BufWriter::new(File::create(output_path)?);
    quantized.write_npy(writer)?;
    info!("Saved quantized image to {}", output_path);

    Ok(())
}
