//! Image and label preprocessing for detector training.
//!
//! Images are handled as `(H, W, C)` BGR arrays and handed to the network as
//! `(1, C, H, W)` tensors with the pixel means subtracted.

mod common;

pub use crop::*;
pub mod crop;

pub use error::*;
pub mod error;

pub use loader::*;
pub mod loader;

pub use resize::*;
pub mod resize;

pub use stack::*;
pub mod stack;

pub use transform::*;
pub mod transform;
