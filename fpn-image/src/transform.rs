//! Conversion between HWC BGR images and NCHW network tensors.

use crate::common::*;

/// Convert a `(H, W, 3)` BGR image into a `(1, 3, H, W)` RGB tensor with the
/// per-channel means subtracted.
///
/// `pixel_means` is in B, G, R order.
pub fn transform(image: ArrayView3<'_, f32>, pixel_means: [f32; 3]) -> Result<Array4<f32>, ImageError> {
    let channels = image.dim().2;
    if channels != 3 {
        return Err(ImageError::ShapeMismatch(format!(
            "expect a 3 channel image, but get {} channels",
            channels
        )));
    }
    transform_multi(image, pixel_means)
}

/// [transform] applied to every group of 3 channels of a tile stack.
pub fn transform_multi(
    image: ArrayView3<'_, f32>,
    pixel_means: [f32; 3],
) -> Result<Array4<f32>, ImageError> {
    let (height, width, channels) = image.dim();
    if channels == 0 || channels % 3 != 0 {
        return Err(ImageError::ShapeMismatch(format!(
            "expect a multiple of 3 channels, but get {}",
            channels
        )));
    }

    let mut tensor = Array4::zeros((1, channels, height, width));
    for begin in (0..channels).step_by(3) {
        for index in 0..3 {
            let mean = pixel_means[2 - index];
            tensor
                .slice_mut(s![0, begin + index, .., ..])
                .zip_mut_with(&image.slice(s![.., .., begin + 2 - index]), |dst, &src| {
                    *dst = src - mean
                });
        }
    }
    Ok(tensor)
}

/// Convert a `(H, W)` class map into a `(1, 1, H, W)` tensor.
pub fn transform_seg_gt(label_map: ArrayView2<'_, f32>) -> Array4<f32> {
    label_map
        .to_owned()
        .insert_axis(Axis(0))
        .insert_axis(Axis(0))
}

/// Recover the `(H, W, 3)` BGR image from a tensor made by [transform].
///
/// Values are rounded and saturated to the `u8` range.
pub fn transform_inverse(
    tensor: ArrayView4<'_, f32>,
    pixel_means: [f32; 3],
) -> Result<Array3<u8>, ImageError> {
    let (batch, channels, height, width) = tensor.dim();
    if batch != 1 || channels != 3 {
        return Err(ImageError::ShapeMismatch(format!(
            "expect a (1, 3, H, W) tensor, but get {:?}",
            tensor.shape()
        )));
    }

    let image = Array3::from_shape_fn((height, width, 3), |(row, col, channel)| {
        let value = tensor[[0, 2 - channel, row, col]] + pixel_means[channel];
        value.round().clamp(0.0, 255.0) as u8
    });
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEANS: [f32; 3] = [103.06, 115.90, 123.15];

    fn pattern(height: usize, width: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 3), |(row, col, channel)| {
            ((row * 37 + col * 11 + channel * 101) % 256) as u8
        })
    }

    #[test]
    fn channel_order() {
        let mut image = Array3::zeros((1, 2, 3));
        image.slice_mut(s![.., .., 0]).fill(10.0f32);
        image.slice_mut(s![.., .., 2]).fill(30.0);

        let tensor = transform(image.view(), [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tensor.dim(), (1, 3, 1, 2));
        // R first
        assert_eq!(tensor[[0, 0, 0, 1]], 27.0);
        assert_eq!(tensor[[0, 1, 0, 1]], -2.0);
        assert_eq!(tensor[[0, 2, 0, 1]], 9.0);
    }

    #[test]
    fn inverse_restores_image() {
        let image = pattern(7, 5);
        let tensor = transform(image.mapv(f32::from).view(), MEANS).unwrap();
        let restored = transform_inverse(tensor.view(), MEANS).unwrap();
        assert_eq!(restored, image);
    }

    #[test]
    fn inverse_rejects_batches() {
        let tensor = Array4::<f32>::zeros((2, 3, 4, 4));
        assert!(transform_inverse(tensor.view(), MEANS).is_err());

        let tensor = Array4::<f32>::zeros((1, 6, 4, 4));
        assert!(transform_inverse(tensor.view(), MEANS).is_err());
    }

    #[test]
    fn transform_tile_stack() {
        let first = pattern(3, 4).mapv(f32::from);
        let second = first.mapv(|value| 255.0 - value);
        let stack = ndarray::concatenate(Axis(2), &[first.view(), second.view()]).unwrap();

        let tensor = transform_multi(stack.view(), MEANS).unwrap();
        assert_eq!(tensor.dim(), (1, 6, 3, 4));
        assert_eq!(
            tensor.slice(s![.., 3.., .., ..]),
            transform(second.view(), MEANS).unwrap()
        );
        assert!(transform(stack.view(), MEANS).is_err());
    }

    #[test]
    fn seg_gt_shape() {
        let label_map = Array2::from_elem((3, 5), 2.0f32);
        let tensor = transform_seg_gt(label_map.view());
        assert_eq!(tensor.dim(), (1, 1, 3, 5));
        assert_eq!(tensor[[0, 0, 2, 4]], 2.0);
    }
}
