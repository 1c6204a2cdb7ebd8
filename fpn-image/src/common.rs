pub use crate::error::ImageError;
pub use bbox::{prelude::*, Transform, HW, TLBR};
pub use fpn_config::Config;
pub use image::{imageops::FilterType, ImageBuffer, Luma, Pixel, Rgb};
pub use itertools::iproduct;
pub use log::debug;
pub use ndarray::{
    prelude::*, s, Array2, Array3, Array4, ArrayView2, ArrayView3, ArrayView4, AxisDescription,
    Data, Slice,
};
pub use num_traits::Zero;
pub use rand::{seq::SliceRandom, Rng};
pub use roidb::{ImInfo, RoiRecord, SegRecord};
pub use std::path::Path;
