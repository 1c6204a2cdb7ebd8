//! Turn ground truth records into network input tensors.

use crate::{
    common::*,
    crop::{crop_image, remap_boxes},
    resize::{resize, resize_multi, Interpolation},
    transform::{transform, transform_multi, transform_seg_gt},
};

/// Decode an image file into a `(H, W, 3)` BGR array.
pub fn load_bgr<P>(path: P) -> Result<Array3<u8>, ImageError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    ensure_exists(path)?;

    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let rgb = Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())?;
    Ok(rgb.slice(s![.., .., ..;-1]).to_owned())
}

/// Decode a class map image into a `(H, W)` array.
pub fn load_label_map<P>(path: P) -> Result<Array2<u8>, ImageError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    ensure_exists(path)?;

    let luma = image::open(path)?.to_luma8();
    let (width, height) = luma.dimensions();
    let label_map = Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())?;
    Ok(label_map)
}

/// Mirror an HWC image left to right.
pub fn flip_horizontal<A>(image: ArrayView3<'_, A>) -> Array3<A>
where
    A: Clone,
{
    image.slice(s![.., ..;-1, ..]).to_owned()
}

/// Clamp box coordinates into an image of `height` by `width` pixels.
pub fn clip_boxes(boxes: &[TLBR<f64>], height: usize, width: usize) -> Vec<TLBR<f64>> {
    boxes
        .iter()
        .map(|rect| rect.clip_to_image(height as f64, width as f64))
        .collect()
}

/// Preprocess detection records into `(1, 3, H, W)` image tensors.
///
/// A scale is drawn from `config.scales` per image. The returned records
/// carry the rescaled boxes and `im_info`.
pub fn get_image<R>(
    roidb: &[RoiRecord],
    config: &Config,
    rng: &mut R,
) -> Result<(Vec<Array4<f32>>, Vec<RoiRecord>), ImageError>
where
    R: Rng + ?Sized,
{
    let mut images = Vec::with_capacity(roidb.len());
    let mut records = Vec::with_capacity(roidb.len());

    for record in roidb {
        let image = load_record_image(record)?;
        let (target_size, max_size) = choose_scale(&config.scales, rng)?;
        let (resized, scale) = resize(
            image.view(),
            target_size,
            max_size,
            config.network.image_stride,
            Interpolation::Linear,
        )?;
        let tensor = transform(resized.view(), config.network.pixel_means())?;

        let mut processed = record.clone();
        let im_info = tensor_info(&tensor, scale);
        processed.boxes = scale_boxes(&record.boxes, &im_info);
        processed.im_info = Some(im_info);

        images.push(tensor);
        records.push(processed);
    }

    Ok((images, records))
}

/// Preprocess detection records into tiled `(1, 3 * crop_num², H, W)` tensors.
///
/// Boxes are assigned to tiles against the original image size before they
/// are rescaled.
pub fn get_crop_image<R>(
    roidb: &[RoiRecord],
    config: &Config,
    rng: &mut R,
) -> Result<(Vec<Array4<f32>>, Vec<RoiRecord>), ImageError>
where
    R: Rng + ?Sized,
{
    let mut images = Vec::with_capacity(roidb.len());
    let mut records = Vec::with_capacity(roidb.len());

    for record in roidb {
        let image = load_record_image(record)?;
        let (height, width, _) = image.dim();
        let (target_size, max_size) = choose_scale(&config.scales, rng)?;

        let tiles = crop_image(image.view(), config.crop_num)?;
        let (resized, scale) = resize_multi(
            tiles.view(),
            target_size,
            max_size,
            config.network.image_stride,
            Interpolation::Linear,
        )?;
        let tensor = transform_multi(resized.view(), config.network.pixel_means())?;

        let mut processed = remap_boxes(record, config.crop_num, (height, width))?;
        let im_info = tensor_info(&tensor, scale);
        processed.boxes = scale_boxes(&processed.boxes, &im_info);
        processed.im_info = Some(im_info);

        images.push(tensor);
        records.push(processed);
    }

    Ok((images, records))
}

/// Preprocess segmentation records into image tensors and `(1, 1, H, W)`
/// class map tensors.
///
/// Class maps are resized with nearest neighbour sampling.
pub fn get_segmentation_image<R>(
    segdb: &[SegRecord],
    config: &Config,
    rng: &mut R,
) -> Result<(Vec<Array4<f32>>, Vec<Array4<f32>>, Vec<SegRecord>), ImageError>
where
    R: Rng + ?Sized,
{
    if segdb.is_empty() {
        return Err(ImageError::EmptyInput("segdb"));
    }

    let mut images = Vec::with_capacity(segdb.len());
    let mut label_maps = Vec::with_capacity(segdb.len());
    let mut records = Vec::with_capacity(segdb.len());
    let stride = config.network.image_stride;

    for record in segdb {
        let image = load_bgr(&record.image)?;
        let (target_size, max_size) = choose_scale(&config.scales, rng)?;
        let (resized, scale) = resize(
            image.view(),
            target_size,
            max_size,
            stride,
            Interpolation::Linear,
        )?;
        let tensor = transform(resized.view(), config.network.pixel_means())?;

        let label_map = load_label_map(&record.seg_cls_path)?.insert_axis(Axis(2));
        let (label_map, _) = resize(
            label_map.view(),
            target_size,
            max_size,
            stride,
            Interpolation::Nearest,
        )?;
        let label_tensor = transform_seg_gt(label_map.index_axis(Axis(2), 0));

        let mut processed = record.clone();
        processed.im_info = Some(tensor_info(&tensor, scale));

        images.push(tensor);
        label_maps.push(label_tensor);
        records.push(processed);
    }

    Ok((images, label_maps, records))
}

fn ensure_exists(path: &Path) -> Result<(), ImageError> {
    if !path.exists() {
        return Err(ImageError::MissingResource(path.to_owned()));
    }
    Ok(())
}

fn load_record_image(record: &RoiRecord) -> Result<Array3<u8>, ImageError> {
    let image = load_bgr(&record.image)?;
    let image = if record.flipped {
        flip_horizontal(image.view())
    } else {
        image
    };
    Ok(image)
}

fn choose_scale<R>(scales: &[(usize, usize)], rng: &mut R) -> Result<(usize, usize), ImageError>
where
    R: Rng + ?Sized,
{
    let scale = scales
        .choose(rng)
        .copied()
        .ok_or(ImageError::EmptyInput("scales"))?;
    debug!("use scale (target {}, max {})", scale.0, scale.1);
    Ok(scale)
}

fn tensor_info(tensor: &Array4<f32>, scale: f64) -> ImInfo {
    let (_, _, height, width) = tensor.dim();
    ImInfo {
        height,
        width,
        scale,
    }
}

/// Scale, round and clip boxes to the preprocessed image.
fn scale_boxes(boxes: &[TLBR<f64>], im_info: &ImInfo) -> Vec<TLBR<f64>> {
    let transform = Transform::from_scale(im_info.scale);
    let scaled: Vec<_> = boxes
        .iter()
        .map(|rect| (&transform * rect).round())
        .collect();
    clip_boxes(&scaled, im_info.height, im_info.width)
}
