//! Rescaling of HWC images to the network input size.

use crate::common::*;

/// Resampling filter of [resize] and [resize_multi].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Bilinear, used for photos.
    Linear,
    /// Nearest neighbour, used for class maps.
    Nearest,
}

impl Interpolation {
    fn filter(&self) -> FilterType {
        match self {
            Self::Linear => FilterType::Triangle,
            Self::Nearest => FilterType::Nearest,
        }
    }
}

/// Scale that maps the short side to `target_size`, unless the long side
/// would then exceed `max_size`, in which case the long side is mapped to
/// `max_size`.
pub fn image_scale(height: usize, width: usize, target_size: usize, max_size: usize) -> f64 {
    let min_side = height.min(width) as f64;
    let max_side = height.max(width) as f64;
    let scale = target_size as f64 / min_side;

    if (scale * max_side).round() > max_size as f64 {
        max_size as f64 / max_side
    } else {
        scale
    }
}

/// Resize a 1 or 3 channel image and pad it to a multiple of `stride`.
///
/// A zero `stride` disables padding. Returns the `f32` image and the scale.
pub fn resize(
    image: ArrayView3<'_, u8>,
    target_size: usize,
    max_size: usize,
    stride: usize,
    interpolation: Interpolation,
) -> Result<(Array3<f32>, f64), ImageError> {
    let (height, width, channels) = image.dim();
    let scale = checked_scale(height, width, target_size, max_size)?;
    let (new_h, new_w) = scaled_size(height, width, scale);

    let resized = match channels {
        1 => resample::<Luma<u8>>(image, new_h, new_w, interpolation)?,
        3 => resample::<Rgb<u8>>(image, new_h, new_w, interpolation)?,
        _ => {
            return Err(ImageError::ShapeMismatch(format!(
                "expect 1 or 3 channels, but get {}",
                channels
            )))
        }
    };

    debug!(
        "resize {}x{} to {}x{} with scale {:.4}",
        height, width, new_h, new_w, scale
    );
    Ok((pad_to_stride(resized, stride), scale))
}

/// Resize a stack of 3 channel images sharing the same size.
///
/// Every group of 3 consecutive channels is resampled as one image.
pub fn resize_multi(
    image: ArrayView3<'_, u8>,
    target_size: usize,
    max_size: usize,
    stride: usize,
    interpolation: Interpolation,
) -> Result<(Array3<f32>, f64), ImageError> {
    let (height, width, channels) = image.dim();
    if channels == 0 || channels % 3 != 0 {
        return Err(ImageError::ShapeMismatch(format!(
            "expect a multiple of 3 channels, but get {}",
            channels
        )));
    }

    let scale = checked_scale(height, width, target_size, max_size)?;
    let (new_h, new_w) = scaled_size(height, width, scale);

    let mut resized = Array3::zeros((new_h, new_w, channels));
    for begin in (0..channels).step_by(3) {
        let group = image.slice(s![.., .., begin..begin + 3]);
        let group = resample::<Rgb<u8>>(group, new_h, new_w, interpolation)?;
        resized
            .slice_mut(s![.., .., begin..begin + 3])
            .assign(&group);
    }

    debug!(
        "resize {} tiles of {}x{} to {}x{} with scale {:.4}",
        channels / 3,
        height,
        width,
        new_h,
        new_w,
        scale
    );
    Ok((pad_to_stride(resized, stride), scale))
}

/// Zero pad the bottom and right sides to a multiple of `stride`.
pub fn pad_to_stride(image: Array3<f32>, stride: usize) -> Array3<f32> {
    if stride == 0 {
        return image;
    }

    let (height, width, channels) = image.dim();
    let align = |size: usize| (size + stride - 1) / stride * stride;
    let (padded_h, padded_w) = (align(height), align(width));
    if (padded_h, padded_w) == (height, width) {
        return image;
    }

    let mut padded = Array3::zeros((padded_h, padded_w, channels));
    padded.slice_mut(s![..height, ..width, ..]).assign(&image);
    padded
}

fn checked_scale(
    height: usize,
    width: usize,
    target_size: usize,
    max_size: usize,
) -> Result<f64, ImageError> {
    if height == 0 || width == 0 {
        return Err(ImageError::ShapeMismatch(format!(
            "cannot resize an empty {}x{} image",
            height, width
        )));
    }
    Ok(image_scale(height, width, target_size, max_size))
}

fn scaled_size(height: usize, width: usize, scale: f64) -> (usize, usize) {
    let scale_size = |size: usize| ((size as f64 * scale).round() as usize).max(1);
    (scale_size(height), scale_size(width))
}

fn resample<P>(
    image: ArrayView3<'_, u8>,
    height: usize,
    width: usize,
    interpolation: Interpolation,
) -> Result<Array3<f32>, ImageError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (in_h, in_w, channels) = image.dim();
    let raw: Vec<u8> = image.iter().copied().collect();
    let buffer = ImageBuffer::<P, Vec<u8>>::from_raw(in_w as u32, in_h as u32, raw)
        .ok_or_else(|| {
            ImageError::ShapeMismatch(format!(
                "cannot view a {}x{}x{} array as an image",
                in_h, in_w, channels
            ))
        })?;

    let resized = image::imageops::resize(
        &buffer,
        width as u32,
        height as u32,
        interpolation.filter(),
    );
    let resized = Array3::from_shape_vec((height, width, channels), resized.into_raw())?;
    Ok(resized.mapv(f32::from))
}
