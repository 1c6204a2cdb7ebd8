//! Streaming evaluation metrics for two-stage detector training.
//!
//! The proposal stage (RPN) and the classification stage (R-CNN) each emit
//! a set of named tensors per mini-batch. [resolve_rpn_names] and
//! [resolve_rcnn_names] give the expected names for a training mode, which
//! are paired with the tensors into a [TensorBundle]. Every metric then
//! accumulates a running `sum_metric / num_inst` ratio from the bundles.
//!
//! Label `-1` marks samples that are not part of the batch, `0` marks
//! background and positive values mark foreground classes.

mod common;

pub mod accuracy;
pub mod bundle;
pub mod error;
pub mod fg_fraction;
pub mod focal_loss;
pub mod l1_loss;
pub mod log_loss;
pub mod metric;
pub mod metric_set;
pub mod names;
mod ops;

pub use accuracy::*;
pub use bundle::*;
pub use error::*;
pub use fg_fraction::*;
pub use focal_loss::*;
pub use l1_loss::*;
pub use log_loss::*;
pub use metric::*;
pub use metric_set::*;
pub use names::*;
pub use ops::LabelFilter;
