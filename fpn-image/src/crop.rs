//! Overlapping tile crops and the assignment of boxes to tiles.
//!
//! An image is cut into `n x n` tiles of `H / (n - 1)` by `W / (n - 1)`
//! pixels. Adjacent tiles overlap, so a box may be kept in several tiles.

use crate::common::*;

/// A box is kept in a tile when more than this fraction of its area lies
/// inside the tile.
pub const COVERAGE_THRESHOLD: f64 = 0.8;

/// The tile layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    n: usize,
    tile_size: HW<usize>,
    step: HW<usize>,
}

impl TileGrid {
    pub fn new(n: usize, height: usize, width: usize) -> Result<Self, ImageError> {
        let invalid = || ImageError::InvalidCrop { n, height, width };
        if n < 2 {
            return Err(invalid());
        }

        let grid = |size: usize| size / (n - 1);
        let step = |size: usize| size * (n - 2) / ((n - 1) * (n - 1));
        let tile_size = HW::from_hw([grid(height), grid(width)]);
        if tile_size.area() == 0 {
            return Err(invalid());
        }

        Ok(Self {
            n,
            tile_size,
            step: HW::from_hw([step(height), step(width)]),
        })
    }

    /// Tiles per side.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn num_tiles(&self) -> usize {
        self.n * self.n
    }

    /// Height and width of every tile.
    pub fn tile_size(&self) -> HW<usize> {
        self.tile_size
    }

    /// Vertical and horizontal offsets between adjacent tiles.
    pub fn step(&self) -> HW<usize> {
        self.step
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        (row < self.n && col < self.n).then(|| Tile {
            row,
            col,
            channel: row * self.n + col,
            top: row * self.step.h(),
            left: col * self.step.w(),
            height: self.tile_size.h(),
            width: self.tile_size.w(),
        })
    }

    /// Tiles in channel order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let grid = *self;
        iproduct!(0..self.n, 0..self.n).filter_map(move |(row, col)| grid.tile(row, col))
    }
}

/// A tile in pixel coordinates of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    /// Index of the tile in the stacked image, `row * n + col`.
    pub channel: usize,
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

impl Tile {
    pub fn rect(&self) -> TLBR<f64> {
        TLBR::from_tlhw([
            self.top as f64,
            self.left as f64,
            self.height as f64,
            self.width as f64,
        ])
    }
}

/// Cut a `(H, W, C)` image into `n x n` tiles stacked along the channels.
///
/// Tile `(row, col)` occupies channels `(row * n + col) * C` onwards.
pub fn crop_image<A>(image: ArrayView3<'_, A>, n: usize) -> Result<Array3<A>, ImageError>
where
    A: Clone + Zero,
{
    let (height, width, channels) = image.dim();
    let grid = TileGrid::new(n, height, width)?;
    let tile_size = grid.tile_size();

    let mut stacked = Array3::zeros((
        tile_size.h(),
        tile_size.w(),
        grid.num_tiles() * channels,
    ));
    for tile in grid.tiles() {
        let begin = tile.channel * channels;
        let patch = image.slice(s![
            tile.top..tile.top + tile.height,
            tile.left..tile.left + tile.width,
            ..
        ]);
        stacked
            .slice_mut(s![.., .., begin..begin + channels])
            .assign(&patch);
    }

    Ok(stacked)
}

/// Assign the boxes of `record` to the tiles of an image of `image_hw`.
///
/// Each box is kept in every tile covering more than
/// [COVERAGE_THRESHOLD] of its area, clipped to the tile and moved to tile
/// local coordinates. The per-box fields follow the kept boxes and
/// `box_channels` records the tile of each.
pub fn remap_boxes(
    record: &RoiRecord,
    n: usize,
    image_hw: (usize, usize),
) -> Result<RoiRecord, ImageError> {
    record.validate()?;
    let (height, width) = image_hw;
    let grid = TileGrid::new(n, height, width)?;

    let mut remapped = RoiRecord::new(record.image.clone(), vec![]);
    remapped.flipped = record.flipped;
    remapped.im_info = record.im_info;

    for (index, rect) in record.boxes.iter().enumerate() {
        for tile in grid.tiles() {
            let region = tile.rect();
            if rect.coverage_by(&region) <= COVERAGE_THRESHOLD {
                continue;
            }

            let local = rect
                .clamp_within(&region)
                .transform(&Transform::from_translation(-region.t(), -region.l()));
            remapped.boxes.push(local);
            remapped.box_channels.push(tile.channel);
            remapped
                .gt_classes
                .extend(record.gt_classes.get(index).copied());
            remapped
                .gt_overlaps
                .extend(record.gt_overlaps.get(index).cloned());
            remapped
                .max_classes
                .extend(record.max_classes.get(index).copied());
            remapped
                .max_overlaps
                .extend(record.max_overlaps.get(index).copied());
        }
    }

    debug!(
        "'{}': {} boxes remapped to {} tile boxes",
        record.image.display(),
        record.num_boxes(),
        remapped.num_boxes()
    );
    Ok(remapped)
}
