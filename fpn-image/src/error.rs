use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("'{}' does not exist", .0.display())]
    MissingResource(PathBuf),
    #[error("stacking of rank {0} tensors is not supported")]
    UnsupportedRank(usize),
    #[error("expect rank {expected} tensors, but get rank {found}")]
    RankMismatch { expected: usize, found: usize },
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
    #[error("cannot crop a {height}x{width} image into {n}x{n} tiles")]
    InvalidCrop {
        n: usize,
        height: usize,
        width: usize,
    },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("invalid record: {0:#}")]
    InvalidRecord(#[from] anyhow::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
