use crate::names::TensorName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("expect {} tensors for {names:?}, but get {num_tensors}", .names.len())]
    BundleLength {
        names: Vec<TensorName>,
        num_tensors: usize,
    },
    #[error("tensor '{0}' appears more than once")]
    DuplicateTensor(TensorName),
    #[error("unknown tensor name '{0}'")]
    UnknownTensorName(String),
    #[error("tensor '{0}' is missing")]
    MissingTensor(TensorName),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("label {label} is out of range for {num_classes} classes")]
    LabelOutOfRange { label: i64, num_classes: usize },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
