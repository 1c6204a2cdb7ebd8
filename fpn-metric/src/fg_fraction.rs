use crate::{
    bundle::TensorBundle,
    common::*,
    metric::{EvalMetric, MetricState},
    names::{LabelSource, TensorName},
};

/// Fraction of foreground samples among the sampled regions.
///
/// A diagnostic of the region sampler. Ignored labels are excluded from both
/// counts. Predictions are only consulted when they carry the sampled label.
#[derive(Debug, Clone)]
pub struct RpnFgFraction {
    state: MetricState,
    source: LabelSource,
}

impl RpnFgFraction {
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            state: MetricState::new("Proposal FG Fraction"),
            source: LabelSource::rcnn(config),
        }
    }
}

impl EvalMetric for RpnFgFraction {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        let label = self
            .source
            .select(labels, preds)
            .get(TensorName::RcnnLabel)?;

        let (num_fg, num_bg) = label.iter().fold((0, 0), |(num_fg, num_bg), &value| {
            let kind = LabelKind::from_value(label_value(value));
            (
                num_fg + kind.is_foreground() as usize,
                num_bg + kind.is_background() as usize,
            )
        });

        self.state.accumulate(num_fg as f64, (num_fg + num_bg) as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fg_fraction_excludes_ignored() {
        let label = array![3.0f32, 0.0, 0.0, -1.0, 1.0, -1.0].into_dyn();
        let labels = TensorBundle::new([TensorName::RcnnLabel], [label]).unwrap();
        let preds = TensorBundle::default();

        let mut metric = RpnFgFraction::new(&TrainConfig::default());
        metric.update(&labels, &preds).unwrap();

        assert_eq!(metric.state().sum_metric(), 2.0);
        assert_eq!(metric.state().num_inst(), 4.0);
        assert_eq!(metric.get(), ("Proposal FG Fraction", Some(0.5)));
    }

    #[test]
    fn fg_fraction_end2end_reads_predictions() {
        let config = TrainConfig {
            end2end: true,
            enable_ohem: false,
        };
        let preds = TensorBundle::new(
            [TensorName::RcnnClsProb, TensorName::RcnnLabel],
            [
                array![[0.5f32, 0.5]].into_dyn(),
                array![1.0f32].into_dyn(),
            ],
        )
        .unwrap();
        let labels = TensorBundle::default();

        let mut metric = RpnFgFraction::new(&config);
        metric.update(&labels, &preds).unwrap();
        assert_eq!(metric.get().1, Some(1.0));
    }
}
