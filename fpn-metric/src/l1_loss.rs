//! Smooth L1 box regression losses.
//!
//! The network computes the element-wise smooth L1 loss itself. These
//! metrics sum the loss tensor and average it over the anchors or regions
//! that carry a valid label.

use crate::{
    bundle::TensorBundle,
    common::*,
    metric::{EvalMetric, MetricState},
    names::{LabelSource, TensorName},
    ops::{self, LabelFilter},
};

#[derive(Debug, Clone)]
pub struct RpnL1LossMetric {
    state: MetricState,
}

impl RpnL1LossMetric {
    pub fn new() -> Self {
        Self {
            state: MetricState::new("RPNL1Loss"),
        }
    }
}

impl Default for RpnL1LossMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalMetric for RpnL1LossMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let bbox_loss = preds.get(TensorName::RpnBboxLoss)?;
        let label = labels.get(TensorName::RpnLabel)?;

        let num_inst = ops::count_labels(label, LabelFilter::Valid);
        self.state.accumulate(sum(bbox_loss), num_inst as f64);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RcnnL1LossMetric {
    state: MetricState,
    source: LabelSource,
}

impl RcnnL1LossMetric {
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            state: MetricState::new("RCNNL1Loss"),
            source: LabelSource::rcnn(config),
        }
    }
}

impl EvalMetric for RcnnL1LossMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let bbox_loss = preds.get(TensorName::RcnnBboxLoss)?;
        let label = self
            .source
            .select(labels, preds)
            .get(TensorName::RcnnLabel)?;

        let num_inst = ops::count_labels(label, LabelFilter::Valid);
        self.state.accumulate(sum(bbox_loss), num_inst as f64);
        Ok(())
    }
}

fn sum(tensor: &ArrayD<f32>) -> f64 {
    tensor.iter().map(|&value| value as f64).sum()
}
