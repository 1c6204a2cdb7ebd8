//! Ground truth records and label conventions shared by the preprocessing
//! and evaluation crates.

mod common;

pub use label::*;
pub mod label;

pub use record::*;
pub mod record;

mod serde_boxes;
