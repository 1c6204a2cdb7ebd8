use crate::common::*;

/// Concatenate tensors along the first axis, padding the other axes.
///
/// The output has the sum of the first dimensions and the maximum of every
/// other dimension. Cells not covered by an input are filled with `pad`.
/// Tensors of rank 1 to 4 are supported and all inputs must share the rank.
pub fn tensor_vstack<A, S, D>(tensors: &[ArrayBase<S, D>], pad: A) -> Result<Array<A, D>, ImageError>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    let first = tensors.first().ok_or(ImageError::EmptyInput("tensor list"))?;
    let ndim = first.ndim();
    if !(1..=4).contains(&ndim) {
        return Err(ImageError::UnsupportedRank(ndim));
    }
    if let Some(tensor) = tensors.iter().find(|tensor| tensor.ndim() != ndim) {
        return Err(ImageError::RankMismatch {
            expected: ndim,
            found: tensor.ndim(),
        });
    }

    let mut dim = first.raw_dim();
    dim[0] = tensors.iter().map(|tensor| tensor.len_of(Axis(0))).sum();
    for axis in 1..ndim {
        dim[axis] = tensors
            .iter()
            .map(|tensor| tensor.len_of(Axis(axis)))
            .max()
            .unwrap_or(0);
    }

    let mut output = Array::from_elem(dim, pad);
    let mut offset = 0;

    for tensor in tensors {
        let rows = tensor.len_of(Axis(0));
        output
            .slice_each_axis_mut(|AxisDescription { axis, .. }| {
                if axis.index() == 0 {
                    Slice::from(offset..offset + rows)
                } else {
                    Slice::from(..tensor.len_of(axis))
                }
            })
            .assign(tensor);
        offset += rows;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vstack_rank2_zero_fill() {
        let a = array![[1, 2], [3, 4]];
        let b = array![[5, 6, 7]];

        let stacked = tensor_vstack(&[a, b], 0).unwrap();
        assert_eq!(stacked, array![[1, 2, 0], [3, 4, 0], [5, 6, 7]]);
    }

    #[test]
    fn vstack_uneven_first_dims() {
        let a = Array3::from_elem((1, 2, 2), 1.0f32);
        let b = Array3::from_elem((3, 1, 3), 2.0f32);

        let stacked = tensor_vstack(&[a, b], -1.0).unwrap();
        assert_eq!(stacked.dim(), (4, 2, 3));
        assert_eq!(stacked[[0, 1, 1]], 1.0);
        assert_eq!(stacked[[0, 1, 2]], -1.0);
        assert_eq!(stacked[[3, 0, 2]], 2.0);
        assert_eq!(stacked[[3, 1, 0]], -1.0);
    }

    #[test]
    fn vstack_rank1_and_views() {
        let a = array![1u8, 2];
        let b = array![3u8];
        let stacked = tensor_vstack(&[a.view(), b.view()], 0).unwrap();
        assert_eq!(stacked, array![1, 2, 3]);
    }

    #[test]
    fn vstack_rank_errors() {
        let empty: [Array2<f32>; 0] = [];
        assert!(matches!(
            tensor_vstack(&empty, 0.0),
            Err(ImageError::EmptyInput(_))
        ));

        let rank5 = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 1, 1, 1]));
        assert!(matches!(
            tensor_vstack(&[rank5], 0.0),
            Err(ImageError::UnsupportedRank(5))
        ));

        let a = ArrayD::<f32>::zeros(IxDyn(&[1, 2]));
        let b = ArrayD::<f32>::zeros(IxDyn(&[1, 2, 3]));
        assert!(matches!(
            tensor_vstack(&[a, b], 0.0),
            Err(ImageError::RankMismatch {
                expected: 2,
                found: 3
            })
        ));
    }
}
