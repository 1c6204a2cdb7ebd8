use anyhow::Result;
use approx::assert_abs_diff_eq;
use bbox::{prelude::*, TLBR};
use fpn_config::Config;
use fpn_image::{
    get_crop_image, get_image, get_segmentation_image, load_bgr, transform_inverse, ImageError,
};
use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::{rngs::StdRng, SeedableRng};
use roidb::{RoiRecord, SegRecord};
use std::path::{Path, PathBuf};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fpn-image-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write an 6x8 image whose pixel `(x, y)` is `(10 x, 10 y, 200)` in RGB.
fn write_image(dir: &Path) -> PathBuf {
    let path = dir.join("image.png");
    let image = RgbImage::from_fn(8, 6, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 200]));
    image.save(&path).unwrap();
    path
}

fn config(stride: usize, crop_num: usize) -> Config {
    Config::from_json5(&format!(
        "{{ train: {{}}, network: {{ image_stride: {}, pixel_means: [0, 0, 0] }}, scales: [[12, 100]], crop_num: {} }}",
        stride, crop_num
    ))
    .unwrap()
}

fn xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> TLBR<f64> {
    TLBR::try_from_xyxy([x1, y1, x2, y2]).unwrap()
}

#[test]
fn decode_to_bgr() -> Result<()> {
    let dir = fixture_dir("decode");
    let image = load_bgr(write_image(&dir))?;

    assert_eq!(image.dim(), (6, 8, 3));
    assert_eq!(image.slice(ndarray::s![2, 3, ..]).to_vec(), [200, 20, 30]);
    Ok(())
}

#[test]
fn detection_images() -> Result<()> {
    let dir = fixture_dir("detection");
    let path = write_image(&dir);

    let mut record = RoiRecord::new(&path, vec![xyxy(1.0, 1.0, 4.0, 3.0), xyxy(5.0, 2.0, 7.9, 5.9)]);
    record.gt_classes = vec![1, 2];
    let mut flipped = record.clone();
    flipped.flipped = true;

    let mut rng = StdRng::seed_from_u64(7);
    let (images, records) = get_image(&[record, flipped], &config(0, 2), &mut rng)?;

    assert_eq!(images[0].dim(), (1, 3, 12, 16));
    let info = records[0].im_info.unwrap();
    assert_eq!((info.height, info.width), (12, 16));
    assert_abs_diff_eq!(info.scale, 2.0);
    assert_eq!(records[0].boxes[0].xyxy(), [2.0, 2.0, 8.0, 6.0]);
    assert_eq!(records[0].boxes[1].xyxy(), [10.0, 4.0, 15.0, 11.0]);
    assert_eq!(records[0].gt_classes, [1, 2]);

    // the red channel grows left to right, and right to left once flipped
    let restored = transform_inverse(images[0].view(), [0.0; 3])?;
    let flipped = transform_inverse(images[1].view(), [0.0; 3])?;
    assert!(restored[[6, 15, 2]] > restored[[6, 0, 2]]);
    assert!(flipped[[6, 15, 2]] < flipped[[6, 0, 2]]);

    let (images, records) = get_image(&records[..1], &config(32, 2), &mut rng)?;
    assert_eq!(images[0].dim(), (1, 3, 32, 32));
    assert_eq!(records[0].im_info.unwrap().height, 32);
    Ok(())
}

#[test]
fn missing_image() {
    let record = RoiRecord::new("/nonexistent/fpn-image/missing.jpg", vec![]);
    let mut rng = StdRng::seed_from_u64(0);

    let result = get_image(&[record], &config(0, 2), &mut rng);
    assert!(matches!(result, Err(ImageError::MissingResource(_))));
}

#[test]
fn crop_images() -> Result<()> {
    let dir = fixture_dir("crop");
    let path = write_image(&dir);

    let mut record = RoiRecord::new(&path, vec![xyxy(1.0, 1.0, 4.0, 3.0)]);
    record.gt_classes = vec![5];

    let mut rng = StdRng::seed_from_u64(0);
    let (images, records) = get_crop_image(&[record], &config(0, 2), &mut rng)?;

    // 2 tiles per side each span the whole image
    assert_eq!(images[0].dim(), (1, 12, 12, 16));
    assert_eq!(records[0].box_channels, [0, 1, 2, 3]);
    assert_eq!(records[0].gt_classes, [5, 5, 5, 5]);
    assert!(records[0]
        .boxes
        .iter()
        .all(|rect| rect.xyxy() == [2.0, 2.0, 8.0, 6.0]));
    Ok(())
}

#[test]
fn segmentation_images() -> Result<()> {
    let dir = fixture_dir("segmentation");
    let image = write_image(&dir);
    let seg_cls_path = dir.join("label.png");
    GrayImage::from_fn(8, 6, |x, _| Luma([if x < 4 { 0 } else { 3 }])).save(&seg_cls_path)?;

    let record = SegRecord {
        image,
        seg_cls_path,
        im_info: None,
    };
    let mut rng = StdRng::seed_from_u64(0);
    let (images, label_maps, records) = get_segmentation_image(&[record], &config(0, 2), &mut rng)?;

    assert_eq!(images[0].dim(), (1, 3, 12, 16));
    assert_eq!(label_maps[0].dim(), (1, 1, 12, 16));
    assert_eq!(label_maps[0][[0, 0, 5, 0]], 0.0);
    assert_eq!(label_maps[0][[0, 0, 5, 15]], 3.0);
    assert!(label_maps[0]
        .iter()
        .all(|&value| value == 0.0 || value == 3.0));
    assert_abs_diff_eq!(records[0].im_info.unwrap().scale, 2.0);

    let result = get_segmentation_image(&[], &config(0, 2), &mut rng);
    assert!(matches!(result, Err(ImageError::EmptyInput(_))));
    Ok(())
}
