use crate::{
    bundle::TensorBundle,
    common::*,
    metric::{EvalMetric, MetricState},
    names::{LabelSource, TensorName},
    ops::{self, LabelFilter},
};

/// Accuracy of the proposal stage over every sampled anchor.
///
/// `rpn_cls_prob` is channel first, `(batch, classes, positions)` or
/// `(batch, classes, height, width)`, and `rpn_label` is `(batch, positions)`.
#[derive(Debug, Clone)]
pub struct RpnAccMetric {
    state: MetricState,
}

impl RpnAccMetric {
    pub fn new() -> Self {
        Self {
            state: MetricState::new("RPNAcc"),
        }
    }
}

impl Default for RpnAccMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalMetric for RpnAccMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let prob = preds.get(TensorName::RpnClsProb)?;
        let label = ops::flat_labels(labels.get(TensorName::RpnLabel)?);

        let rows = ops::channel_first_rows(prob)?;
        let (correct, kept) = ops::count_correct(rows.view(), &label, LabelFilter::Valid)?;
        self.state.accumulate(correct as f64, kept as f64);
        Ok(())
    }
}

/// Accuracy of the classification stage over background and foreground samples.
///
/// The predicted class is the argmax over the last dimension of
/// `rcnn_cls_prob`. The label is compared as a class index whether the
/// upstream head is a softmax or a per-class sigmoid.
#[derive(Debug, Clone)]
pub struct RcnnAccMetric {
    state: MetricState,
    source: LabelSource,
}

impl RcnnAccMetric {
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            state: MetricState::new("RCNNAcc"),
            source: LabelSource::rcnn(config),
        }
    }
}

impl EvalMetric for RcnnAccMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let (correct, kept) = rcnn_accuracy(labels, preds, self.source, LabelFilter::Valid)?;
        self.state.accumulate(correct as f64, kept as f64);
        Ok(())
    }
}

/// Accuracy of the classification stage on foreground samples only.
#[derive(Debug, Clone)]
pub struct RcnnFgAccuracy {
    state: MetricState,
    source: LabelSource,
}

impl RcnnFgAccuracy {
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            state: MetricState::new("R-CNN FG Accuracy"),
            source: LabelSource::rcnn(config),
        }
    }
}

impl EvalMetric for RcnnFgAccuracy {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let (correct, kept) = rcnn_accuracy(labels, preds, self.source, LabelFilter::Foreground)?;
        self.state.accumulate(correct as f64, kept as f64);
        Ok(())
    }
}

fn rcnn_accuracy(
    labels: &TensorBundle,
    preds: &TensorBundle,
    source: LabelSource,
    filter: LabelFilter,
) -> Result<(usize, usize), MetricError> {
    let prob = preds.get(TensorName::RcnnClsProb)?;
    let label = source.select(labels, preds).get(TensorName::RcnnLabel)?;
    let label = ops::flat_labels(label);

    let rows = ops::class_rows(prob)?;
    ops::count_correct(rows.view(), &label, filter)
}
