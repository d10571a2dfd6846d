//! Color quantization of RGB images with a k-means code book.

use crate::algorithm::KMeansResult;
use crate::config::KMeansConfig;
use crate::distance::nearest_centroid;
use crate::error::KMeansError;
use crate::kmeans::KMeans;
use ndarray::{Array2, Array3, ArrayView, ArrayView2, ArrayView3, Axis, Dimension, Ix2, Ix3};
use rayon::prelude::*;

/// Number of color channels in an image
pub const CHANNELS: usize = 3;

fn as_image<'a, D: Dimension>(image: &ArrayView<'a, f32, D>) -> Result<ArrayView3<'a, f32>, KMeansError> {
    let image = image.clone().into_dimensionality::<Ix3>().map_err(|_| {
        KMeansError::InvalidShape(format!(
            "Image should be a 3-D array of shape (height, width, 3), got shape {:?}",
            image.shape()
        ))
    })?;

    if image.dim().2 != CHANNELS {
        return Err(KMeansError::InvalidShape(format!(
            "Image should have {} channels, got {}",
            CHANNELS,
            image.dim().2
        )));
    }

    Ok(image)
}

fn as_code_vectors<'a, D: Dimension>(
    code_vectors: &ArrayView<'a, f32, D>,
) -> Result<ArrayView2<'a, f32>, KMeansError> {
    let code_vectors = code_vectors.clone().into_dimensionality::<Ix2>().map_err(|_| {
        KMeansError::InvalidShape(format!(
            "Code vectors should be a 2-D array of shape (k, 3), got shape {:?}",
            code_vectors.shape()
        ))
    })?;

    if code_vectors.ncols() != CHANNELS || code_vectors.nrows() == 0 {
        return Err(KMeansError::InvalidShape(format!(
            "Code vectors should have shape (k, {}) with k > 0, got {:?}",
            CHANNELS,
            code_vectors.dim()
        )));
    }

    Ok(code_vectors)
}

/// Replace every pixel of `image` by its nearest code vector.
///
/// `image` has shape (height, width, 3) and `code_vectors` shape (k, 3). The
/// returned image has the same shape as the input.
///
/// # Errors
///
/// Returns [`KMeansError::InvalidShape`] if either array has the wrong shape.
///
/// # Example
///
/// ```
/// use lloyd_kmeans::quantize_image;
/// use ndarray::array;
///
/// let image = array![[[10.0f32, 0.0, 0.0]], [[250.0, 240.0, 255.0]]];
/// let palette = array![[0.0f32, 0.0, 0.0], [255.0, 255.0, 255.0]];
///
/// let quantized = quantize_image(&image.view(), &palette.view()).unwrap();
/// assert_eq!(quantized, array![[[0.0f32, 0.0, 0.0]], [[255.0, 255.0, 255.0]]]);
/// ```
pub fn quantize_image<D1: Dimension, D2: Dimension>(
    image: &ArrayView<f32, D1>,
    code_vectors: &ArrayView<f32, D2>,
) -> Result<Array3<f32>, KMeansError> {
    let image = as_image(image)?;
    let code_vectors = as_code_vectors(code_vectors)?;

    let mut quantized = Array3::zeros(image.dim());
    quantized
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(image.axis_iter(Axis(0)).into_par_iter())
        .for_each(|(mut out_row, in_row)| {
            for (mut out_pixel, pixel) in out_row.outer_iter_mut().zip(in_row.outer_iter()) {
                let (nearest, _) = nearest_centroid(&pixel, &code_vectors);
                out_pixel.assign(&code_vectors.row(nearest));
            }
        });

    Ok(quantized)
}

/// Flatten an image into a (height * width, 3) matrix of pixels
pub fn image_pixels<D: Dimension>(image: &ArrayView<f32, D>) -> Result<Array2<f32>, KMeansError> {
    let image = as_image(image)?;
    let (height, width, _) = image.dim();

    let pixels: Vec<f32> = image.iter().copied().collect();
    Array2::from_shape_vec((height * width, CHANNELS), pixels)
        .map_err(|e| KMeansError::InvalidShape(e.to_string()))
}

/// Fit a code book of `config.k` colors to the pixels of `image`.
///
/// Returns the full clustering result; its `centroids` are the code vectors to
/// pass to [`quantize_image`].
pub fn fit_code_vectors<D: Dimension>(
    image: &ArrayView<f32, D>,
    config: &KMeansConfig,
) -> Result<KMeansResult, KMeansError> {
    let pixels = image_pixels(image)?;
    KMeans::with_config(config.clone()).fit(&pixels.view())
}
