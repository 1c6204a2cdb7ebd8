use crate::{bundle::TensorBundle, common::*};

/// Running numerator and denominator of a metric.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct MetricState {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    sum_metric: f64,
    #[getset(get_copy = "pub")]
    num_inst: f64,
}

impl MetricState {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            sum_metric: 0.0,
            num_inst: 0.0,
        }
    }

    /// Add the contribution of one mini-batch.
    pub fn accumulate(&mut self, sum_metric: f64, num_inst: f64) {
        debug_assert!(num_inst >= 0.0, "num_inst must be non-negative");
        trace!("{}: +{} / +{}", self.name, sum_metric, num_inst);
        self.sum_metric += sum_metric;
        self.num_inst += num_inst;
    }

    pub fn reset(&mut self) {
        self.sum_metric = 0.0;
        self.num_inst = 0.0;
    }

    /// The ratio `sum_metric / num_inst`, or `None` before any instance is counted.
    pub fn value(&self) -> Option<f64> {
        (self.num_inst > 0.0).then(|| self.sum_metric / self.num_inst)
    }
}

/// A metric accumulated over a sequence of mini-batches.
///
/// Updates only ever add to the state. Batches where every sample is
/// filtered out contribute nothing and are not an error.
pub trait EvalMetric: Debug {
    fn state(&self) -> &MetricState;

    fn state_mut(&mut self) -> &mut MetricState;

    /// Accumulate the statistics of one mini-batch.
    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError>;

    fn name(&self) -> &str {
        self.state().name()
    }

    /// The metric name and its current value.
    fn get(&self) -> (&str, Option<f64>) {
        let state = self.state();
        (state.name(), state.value())
    }

    fn reset(&mut self) {
        let state = self.state_mut();
        debug!("reset '{}' at value {:?}", state.name(), state.value());
        state.reset();
    }
}
