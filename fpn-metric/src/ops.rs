//! Reshaping, filtering and gathering shared by the metrics.

use crate::common::*;

/// Which labels take part in a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFilter {
    /// Every label except `-1`.
    Valid,
    /// Only labels above zero.
    Foreground,
}

impl LabelFilter {
    pub fn keep(&self, label: i64) -> bool {
        let kind = LabelKind::from_value(label);
        match self {
            Self::Valid => kind.is_valid(),
            Self::Foreground => kind.is_foreground(),
        }
    }
}

/// Flatten a label tensor into integer labels.
pub(crate) fn flat_labels(label: &ArrayD<f32>) -> Vec<i64> {
    label.iter().map(|&value| label_value(value)).collect()
}

/// Count the labels accepted by `filter`.
pub(crate) fn count_labels(label: &ArrayD<f32>, filter: LabelFilter) -> usize {
    label
        .iter()
        .filter(|&&value| filter.keep(label_value(value)))
        .count()
}

/// Index of the first maximum, zero for an empty row.
pub(crate) fn argmax<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.into_iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index).unwrap_or(0)
}

/// View a tensor whose last dimension holds the classes as `(N, num_classes)`.
pub(crate) fn class_rows(prob: &ArrayD<f32>) -> Result<CowArray<'_, f32, Ix2>, MetricError> {
    let num_classes = match prob.shape().last() {
        Some(&num_classes) if num_classes > 0 => num_classes,
        _ => {
            return Err(MetricError::ShapeMismatch(format!(
                "invalid class probability shape {:?}",
                prob.shape()
            )))
        }
    };
    let num_rows = prob.len() / num_classes;
    let rows = prob
        .as_standard_layout()
        .into_shape((num_rows, num_classes))?;
    Ok(rows)
}

/// Turn a channel-first tensor `(batch, classes, positions...)` into
/// `(batch * positions, classes)` rows ordered batch first.
pub(crate) fn channel_first_rows(prob: &ArrayD<f32>) -> Result<Array2<f32>, MetricError> {
    let shape = prob.shape();
    if shape.len() < 2 || shape[1] == 0 {
        return Err(MetricError::ShapeMismatch(format!(
            "expect (batch, classes, positions...) probabilities, but get shape {:?}",
            shape
        )));
    }

    let batch = shape[0];
    let num_classes = shape[1];
    let positions: usize = shape[2..].iter().product();

    let prob = prob.as_standard_layout();
    let prob = prob.view().into_shape((batch, num_classes, positions))?;
    let rows = prob
        .permuted_axes([0, 2, 1])
        .as_standard_layout()
        .into_owned()
        .into_shape((batch * positions, num_classes))?;
    Ok(rows)
}

/// Take rows by leading index, `(N, ...)` as `(N, rest)`.
pub(crate) fn leading_rows(pred: &ArrayD<f32>) -> Result<CowArray<'_, f32, Ix2>, MetricError> {
    let num_rows = *pred.shape().first().ok_or_else(|| {
        MetricError::ShapeMismatch("prediction must have at least one dimension".into())
    })?;
    let num_cols = if num_rows == 0 {
        0
    } else {
        pred.len() / num_rows
    };
    let rows = pred.as_standard_layout().into_shape((num_rows, num_cols))?;
    Ok(rows)
}

pub(crate) fn check_num_rows(rows: &ArrayView2<f32>, labels: &[i64]) -> Result<(), MetricError> {
    if rows.nrows() != labels.len() {
        return Err(MetricError::ShapeMismatch(format!(
            "{} prediction rows for {} labels",
            rows.nrows(),
            labels.len()
        )));
    }
    Ok(())
}

/// Column index of `label` in a row of `num_classes` entries.
pub(crate) fn class_index(label: i64, num_classes: usize) -> Result<usize, MetricError> {
    usize::try_from(label)
        .ok()
        .filter(|&class| class < num_classes)
        .ok_or(MetricError::LabelOutOfRange { label, num_classes })
}

/// Count `(correct, kept)` of row-wise argmax predictions against labels.
pub(crate) fn count_correct(
    rows: ArrayView2<f32>,
    labels: &[i64],
    filter: LabelFilter,
) -> Result<(usize, usize), MetricError> {
    check_num_rows(&rows, labels)?;

    let (correct, kept) = izip!(rows.outer_iter(), labels)
        .filter(|(_, label)| filter.keep(**label))
        .fold((0, 0), |(correct, kept), (row, &label)| {
            let pred = argmax(row.iter()) as i64;
            (correct + (pred == label) as usize, kept + 1)
        });
    Ok((correct, kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.2f32, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[0.7f32, 0.1]), 0);
        assert_eq!(argmax(&[0.0f32; 0]), 0);
    }

    #[test]
    fn label_filters() {
        assert!(LabelFilter::Valid.keep(0));
        assert!(!LabelFilter::Valid.keep(-1));
        assert!(LabelFilter::Foreground.keep(2));
        assert!(!LabelFilter::Foreground.keep(0));

        let label = array![[1.0f32, -1.0, 0.0], [2.0, 0.0, -1.0]].into_dyn();
        assert_eq!(count_labels(&label, LabelFilter::Valid), 4);
        assert_eq!(count_labels(&label, LabelFilter::Foreground), 2);
    }

    #[test]
    fn channel_first_layout() {
        // batch 2, classes 2, positions 3
        let data: Vec<f32> = (0..12).map(|value| value as f32).collect();
        let prob = ArrayD::from_shape_vec(IxDyn(&[2, 2, 3]), data).unwrap();
        let rows = channel_first_rows(&prob).unwrap();

        assert_eq!(rows.dim(), (6, 2));
        assert_eq!(rows.row(0).to_vec(), [0.0, 3.0]);
        assert_eq!(rows.row(2).to_vec(), [2.0, 5.0]);
        assert_eq!(rows.row(3).to_vec(), [6.0, 9.0]);
    }

    #[test]
    fn channel_first_spatial_layout() {
        // batch 1, classes 2, height 2, width 2
        let data: Vec<f32> = (0..8).map(|value| value as f32).collect();
        let prob = ArrayD::from_shape_vec(IxDyn(&[1, 2, 2, 2]), data).unwrap();
        let rows = channel_first_rows(&prob).unwrap();

        assert_eq!(rows.dim(), (4, 2));
        assert_eq!(rows.row(1).to_vec(), [1.0, 5.0]);
    }

    #[test]
    fn class_rows_reshape() {
        let prob = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 4]));
        assert_eq!(class_rows(&prob).unwrap().dim(), (6, 4));

        let prob = ArrayD::<f32>::zeros(IxDyn(&[2, 0]));
        assert!(class_rows(&prob).is_err());
    }

    #[test]
    fn class_index_range() {
        assert_eq!(class_index(1, 2).unwrap(), 1);
        assert!(class_index(2, 2).is_err());
        assert!(class_index(-2, 2).is_err());
    }
}
