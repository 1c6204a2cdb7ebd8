use crate::{
    bundle::TensorBundle,
    common::*,
    metric::{EvalMetric, MetricState},
    ops::{self, LabelFilter},
};

/// Coefficients of the focal loss formula.
///
/// `alpha` and `gamma` must equal the values configured on the focal loss
/// operator that trains the network. The metric has no way to check this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalLossParams {
    pub alpha: f64,
    pub gamma: f64,
    pub eps: f64,
}

impl Default for FocalLossParams {
    fn default() -> Self {
        Self {
            alpha: 0.25,
            gamma: 2.0,
            eps: 1e-12,
        }
    }
}

/// Focal loss computed from class probabilities and labels.
///
/// Unlike the other metrics it does not look tensors up by name. Labels and
/// predictions are paired by position, and each label tensor flattens to one
/// label per prediction row. Rows labelled `-1` are skipped.
#[derive(Debug, Clone)]
pub struct FocalLossMetric {
    state: MetricState,
    params: FocalLossParams,
}

impl FocalLossMetric {
    pub fn new() -> Self {
        Self::with_params(FocalLossParams::default())
    }

    pub fn with_params(params: FocalLossParams) -> Self {
        Self {
            state: MetricState::new("focalloss"),
            params,
        }
    }

    pub fn params(&self) -> &FocalLossParams {
        &self.params
    }

    /// Accumulate `(label, prediction)` pairs.
    ///
    /// The whole call is validated before the state changes.
    pub fn update_pairs<'a, I>(&mut self, pairs: I) -> Result<(), MetricError>
    where
        I: IntoIterator<Item = (&'a ArrayD<f32>, &'a ArrayD<f32>)>,
    {
        let (loss, num_inst) = pairs.into_iter().try_fold(
            (0.0, 0),
            |(loss, num_inst), (label, pred)| -> Result<_, MetricError> {
                let (pair_loss, pair_num) = self.focal_loss(label, pred)?;
                Ok((loss + pair_loss, num_inst + pair_num))
            },
        )?;

        self.state.accumulate(loss, num_inst as f64);
        Ok(())
    }

    fn focal_loss(
        &self,
        label: &ArrayD<f32>,
        pred: &ArrayD<f32>,
    ) -> Result<(f64, usize), MetricError> {
        let FocalLossParams { alpha, gamma, eps } = self.params;
        let labels = ops::flat_labels(label);
        let rows = ops::leading_rows(pred)?;
        ops::check_num_rows(&rows.view(), &labels)?;

        let num_classes = rows.ncols();
        let (loss, kept) = izip!(rows.outer_iter(), &labels)
            .filter(|(_, label)| LabelFilter::Valid.keep(**label))
            .try_fold(
                (0.0, 0),
                |(loss, kept), (row, &label)| -> Result<_, MetricError> {
                    let class = ops::class_index(label, num_classes)?;
                    let prob = row[class] as f64;
                    let term = alpha * (-(1.0 - prob).powf(gamma) * (prob + eps).ln());
                    Ok((loss + term, kept + 1))
                },
            )?;

        Ok((loss, kept))
    }
}

impl Default for FocalLossMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalMetric for FocalLossMetric {
    fn state(&self) -> &MetricState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MetricState {
        &mut self.state
    }

    fn update(&mut self, labels: &TensorBundle, preds: &TensorBundle) -> Result<(), MetricError> {
        self.update_pairs(izip!(labels.tensors(), preds.tensors()))
    }
}
