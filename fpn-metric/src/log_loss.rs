use crate::{
    bundle::TensorBundle,
    common::*,
    metric::{EvalMetric, MetricState},
    names::{LabelSource, TensorName},
    ops::{self, LabelFilter},
};

/// Added to the gathered probability before taking the logarithm.
pub const LOG_LOSS_EPSILON: f64 = 1e-14;

/// Negative log likelihood of the proposal stage.
#[derive(Debug, Clone)]
pub struct RpnLogLossMetric {
    state: MetricState,
}

impl RpnLogLossMetric {
    pub fn new() -> Self {
        Self {
            state: MetricState::new("RPNLogLoss"),
        }
    }
}

impl Default for RpnLogLossMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalMetric for RpnLogLossMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let prob = preds.get(TensorName::RpnClsProb)?;
        let label = ops::flat_labels(labels.get(TensorName::RpnLabel)?);

        // (b, c, p) -> (b, p, c) -> (b * p, c)
        let rows = ops::channel_first_rows(prob)?;
        let (loss, kept) = log_loss(rows.view(), &label)?;
        self.state.accumulate(loss, kept as f64);
        Ok(())
    }
}

/// Negative log likelihood of the classification stage.
#[derive(Debug, Clone)]
pub struct RcnnLogLossMetric {
    state: MetricState,
    source: LabelSource,
}

impl RcnnLogLossMetric {
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            state: MetricState::new("RCNNLogLoss"),
            source: LabelSource::rcnn(config),
        }
    }
}

impl EvalMetric for RcnnLogLossMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let prob = preds.get(TensorName::RcnnClsProb)?;
        let label = self
            .source
            .select(labels, preds)
            .get(TensorName::RcnnLabel)?;
        let label = ops::flat_labels(label);

        let rows = ops::class_rows(prob)?;
        let (loss, kept) = log_loss(rows.view(), &label)?;
        self.state.accumulate(loss, kept as f64);
        Ok(())
    }
}

/// Sum of `-ln(p[label] + eps)` over the rows with a valid label.
fn log_loss(rows: ArrayView2<f32>, labels: &[i64]) -> Result<(f64, usize), MetricError> {
    ops::check_num_rows(&rows, labels)?;
    let num_classes = rows.ncols();

    izip!(rows.outer_iter(), labels)
        .filter(|(_, label)| LabelFilter::Valid.keep(**label))
        .try_fold((0.0, 0), |(loss, kept), (row, &label)| {
            let class = ops::class_index(label, num_classes)?;
            let prob = row[class] as f64;
            Ok((loss - (prob + LOG_LOSS_EPSILON).ln(), kept + 1))
        })
}
