//! Boxes are stored as `[x1, y1, x2, y2]` rows on the wire.

use crate::common::*;
use serde::de::Error as _;

pub fn serialize<S>(boxes: &[TLBR<f64>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let rows: Vec<[f64; 4]> = boxes.iter().map(|rect| rect.xyxy()).collect();
    rows.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<TLBR<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<[f64; 4]>::deserialize(deserializer)?;
    rows.into_iter()
        .map(|xyxy| TLBR::try_from_xyxy(xyxy).map_err(D::Error::custom))
        .collect()
}
