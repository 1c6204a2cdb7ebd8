use crate::common::*;

/// Size and scale of a preprocessed image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImInfo {
    /// Height of the padded image tensor.
    pub height: usize,
    /// Width of the padded image tensor.
    pub width: usize,
    /// Scaling factor applied to the original image.
    pub scale: f64,
}

/// A detection ground truth record.
///
/// The per-box vectors `gt_classes`, `gt_overlaps`, `max_classes`,
/// `max_overlaps` and `box_channels` are either empty or have one entry per box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRecord {
    pub image: PathBuf,
    #[serde(default)]
    pub flipped: bool,
    #[serde(with = "crate::serde_boxes")]
    pub boxes: Vec<TLBR<f64>>,
    #[serde(default)]
    pub gt_classes: Vec<usize>,
    #[serde(default)]
    pub gt_overlaps: Vec<Vec<f32>>,
    #[serde(default)]
    pub max_classes: Vec<usize>,
    #[serde(default)]
    pub max_overlaps: Vec<f32>,
    /// The tile channel each box is assigned to after tiled cropping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub box_channels: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub im_info: Option<ImInfo>,
}

impl RoiRecord {
    pub fn new<P>(image: P, boxes: Vec<TLBR<f64>>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            image: image.into(),
            flipped: false,
            boxes,
            gt_classes: vec![],
            gt_overlaps: vec![],
            max_classes: vec![],
            max_overlaps: vec![],
            box_channels: vec![],
            im_info: None,
        }
    }

    pub fn num_boxes(&self) -> usize {
        self.boxes.len()
    }

    /// Check that every per-box field agrees with the number of boxes.
    pub fn validate(&self) -> Result<()> {
        let num_boxes = self.boxes.len();
        let check = |name: &str, len: usize| -> Result<()> {
            ensure!(
                len == 0 || len == num_boxes,
                "'{}' has {} entries, but the record '{}' has {} boxes",
                name,
                len,
                self.image.display(),
                num_boxes
            );
            Ok(())
        };

        check("gt_classes", self.gt_classes.len())?;
        check("gt_overlaps", self.gt_overlaps.len())?;
        check("max_classes", self.max_classes.len())?;
        check("max_overlaps", self.max_overlaps.len())?;
        check("box_channels", self.box_channels.len())?;
        Ok(())
    }
}

/// A segmentation ground truth record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegRecord {
    pub image: PathBuf,
    /// The per-pixel class map image.
    pub seg_cls_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub im_info: Option<ImInfo>,
}

/// Load a list of detection records from a JSON file.
pub fn load_roidb<P>(path: P) -> Result<Vec<RoiRecord>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roidb file '{}'", path.display()))?;
    let roidb: Vec<RoiRecord> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse roidb file '{}'", path.display()))?;
    roidb.iter().try_for_each(|record| record.validate())?;
    Ok(roidb)
}

/// Load a list of segmentation records from a JSON file.
pub fn load_segdb<P>(path: P) -> Result<Vec<SegRecord>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read segdb file '{}'", path.display()))?;
    let segdb = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse segdb file '{}'", path.display()))?;
    Ok(segdb)
}
