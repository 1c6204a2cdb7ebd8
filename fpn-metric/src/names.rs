//! Tensor roles and the name lists each training mode produces.

use crate::{bundle::TensorBundle, common::*};

/// The role of a tensor exchanged between the network and the metrics.
///
/// The string form is the snake case name used by the network outputs,
/// e.g. `TensorName::RcnnClsProb` is `"rcnn_cls_prob"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TensorName {
    RpnClsProb,
    RpnBboxLoss,
    RpnLabel,
    RpnBboxTarget,
    RpnBboxWeight,
    RcnnClsProb,
    RcnnBboxLoss,
    RcnnLabel,
    RcnnBboxTarget,
    RcnnBboxWeight,
}

/// Ordered prediction names and label names.
pub type NamePair = (Vec<TensorName>, Vec<TensorName>);

/// Prediction and label names of the proposal stage.
pub fn resolve_rpn_names() -> NamePair {
    use TensorName::*;

    let pred = vec![RpnClsProb, RpnBboxLoss];
    let label = vec![RpnLabel, RpnBboxTarget, RpnBboxWeight];
    (pred, label)
}

/// Prediction and label names of the classification stage.
///
/// Under hard example mining or end-to-end training the sampled
/// `rcnn_label` is emitted along with the predictions. End-to-end training
/// also prepends the proposal stage predictions and replaces the label list
/// with the proposal stage labels, so the classification label is only
/// reachable from the prediction side.
pub fn resolve_rcnn_names(config: &TrainConfig) -> NamePair {
    use TensorName::*;

    let TrainConfig {
        end2end,
        enable_ohem,
    } = *config;

    let mut pred = vec![RcnnClsProb, RcnnBboxLoss];
    let mut label = vec![RcnnLabel, RcnnBboxTarget, RcnnBboxWeight];

    if enable_ohem || end2end {
        pred.push(RcnnLabel);
    }

    if end2end {
        let (rpn_pred, rpn_label) = resolve_rpn_names();
        pred = rpn_pred.into_iter().chain(pred).collect();
        label = rpn_label;
    }

    (pred, label)
}

/// The bundle that carries the authoritative classification stage label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// `rcnn_label` is re-emitted by the network next to its predictions.
    Predictions,
    /// `rcnn_label` is the supplied ground truth.
    Labels,
}

impl LabelSource {
    pub fn rcnn(config: &TrainConfig) -> Self {
        if config.enable_ohem || config.end2end {
            Self::Predictions
        } else {
            Self::Labels
        }
    }

    pub fn select<'a>(&self, labels: &'a TensorBundle, preds: &'a TensorBundle) -> &'a TensorBundle {
        match self {
            Self::Predictions => preds,
            Self::Labels => labels,
        }
    }
}

/// The sub-network a pair of bundles comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Rpn,
    Rcnn,
}

impl Stage {
    pub fn names(&self, config: &TrainConfig) -> NamePair {
        match self {
            Self::Rpn => resolve_rpn_names(),
            Self::Rcnn => resolve_rcnn_names(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strs(names: &[TensorName]) -> Vec<&str> {
        names.iter().map(|name| name.as_ref()).collect()
    }

    #[test]
    fn tensor_name_strings() {
        assert_eq!(TensorName::RpnClsProb.as_ref(), "rpn_cls_prob");
        assert_eq!(TensorName::RcnnBboxWeight.to_string(), "rcnn_bbox_weight");
        assert_eq!(
            "rcnn_label".parse::<TensorName>().unwrap(),
            TensorName::RcnnLabel
        );
        assert!("rcnn_score".parse::<TensorName>().is_err());
    }

    #[test]
    fn rpn_names() {
        let (pred, label) = resolve_rpn_names();
        assert_eq!(as_strs(&pred), ["rpn_cls_prob", "rpn_bbox_loss"]);
        assert_eq!(
            as_strs(&label),
            ["rpn_label", "rpn_bbox_target", "rpn_bbox_weight"]
        );
    }

    #[test]
    fn label_source() {
        let modes = [
            (false, false, LabelSource::Labels),
            (false, true, LabelSource::Predictions),
            (true, false, LabelSource::Predictions),
            (true, true, LabelSource::Predictions),
        ];

        for (end2end, enable_ohem, expect) in modes {
            let config = TrainConfig {
                end2end,
                enable_ohem,
            };
            assert_eq!(LabelSource::rcnn(&config), expect);
        }
    }
}
