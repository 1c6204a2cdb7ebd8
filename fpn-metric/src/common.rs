pub use crate::error::MetricError;
pub use fpn_config::TrainConfig;
pub use getset::{CopyGetters, Getters};
pub use indexmap::IndexMap;
pub use itertools::izip;
pub use log::{debug, trace};
pub use ndarray::{Array2, ArrayD, ArrayView2, CowArray, Ix2};
pub use roidb::{label_value, LabelKind};
pub use std::fmt::{self, Debug};
pub use strum::{AsRefStr, Display, EnumString};
