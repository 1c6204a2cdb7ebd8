use crate::{
    accuracy::{RcnnAccMetric, RcnnFgAccuracy, RpnAccMetric},
    bundle::TensorBundle,
    common::*,
    fg_fraction::RpnFgFraction,
    l1_loss::{RcnnL1LossMetric, RpnL1LossMetric},
    log_loss::{RcnnLogLossMetric, RpnLogLossMetric},
    metric::EvalMetric,
    names::Stage,
};

/// A list of metrics updated together.
#[derive(Debug, Default)]
pub struct MetricSet {
    metrics: Vec<Box<dyn EvalMetric>>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics of the proposal stage.
    pub fn rpn() -> Self {
        let mut set = Self::new();
        set.push(RpnAccMetric::new());
        set.push(RpnLogLossMetric::new());
        set.push(RpnL1LossMetric::new());
        set
    }

    /// Metrics of the classification stage.
    ///
    /// End-to-end training feeds both stages through one pair of bundles, so
    /// the proposal stage metrics are included as well.
    pub fn rcnn(config: &TrainConfig) -> Self {
        let mut set = if config.end2end {
            Self::rpn()
        } else {
            Self::new()
        };
        set.push(RcnnAccMetric::new(config));
        set.push(RcnnLogLossMetric::new(config));
        set.push(RcnnL1LossMetric::new(config));
        set.push(RcnnFgAccuracy::new(config));
        set.push(RpnFgFraction::new(config));
        set
    }

    pub fn for_stage(stage: Stage, config: &TrainConfig) -> Self {
        match stage {
            Stage::Rpn => Self::rpn(),
            Stage::Rcnn => Self::rcnn(config),
        }
    }

    pub fn push<M>(&mut self, metric: M)
    where
        M: 'static + EvalMetric,
    {
        self.metrics.push(Box::new(metric));
    }

    pub fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        self.metrics
            .iter_mut()
            .try_for_each(|metric| metric.update(labels, preds))
    }

    pub fn reset(&mut self) {
        self.metrics.iter_mut().for_each(|metric| metric.reset());
    }

    /// Names and values of all metrics.
    pub fn get_all(&self) -> Vec<(&str, Option<f64>)> {
        self.metrics.iter().map(|metric| metric.get()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn EvalMetric> + '_ {
        self.metrics.iter().map(|metric| metric.as_ref())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .get_all()
            .into_iter()
            .map(|(name, value)| match value {
                Some(value) => format!("{}={:.6}", name, value),
                None => format!("{}=n/a", name),
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", text)
    }
}
