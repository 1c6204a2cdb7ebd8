use anyhow::{ensure, Context, Result};
use ndarray::{ArrayD, IxDyn};
use serde::Deserialize;
use std::path::Path;

/// Network outputs of one mini-batch, in the order of the resolved names.
#[derive(Debug, Clone, Deserialize)]
pub struct DumpBatch {
    pub labels: Vec<DumpTensor>,
    pub preds: Vec<DumpTensor>,
}

/// A dense `f32` tensor in row-major order.
#[derive(Debug, Clone, Deserialize)]
pub struct DumpTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl DumpTensor {
    pub fn to_array(&self) -> Result<ArrayD<f32>> {
        let expect: usize = self.shape.iter().product();
        ensure!(
            expect == self.data.len(),
            "tensor of shape {:?} expects {} values, but get {}",
            self.shape,
            expect,
            self.data.len()
        );
        let array = ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone())?;
        Ok(array)
    }
}

pub fn load_dump(path: impl AsRef<Path>) -> Result<Vec<DumpBatch>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dump file '{}'", path.display()))?;
    let batches = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse dump file '{}'", path.display()))?;
    Ok(batches)
}

pub fn to_arrays(tensors: &[DumpTensor]) -> Result<Vec<ArrayD<f32>>> {
    tensors.iter().map(|tensor| tensor.to_array()).collect()
}
