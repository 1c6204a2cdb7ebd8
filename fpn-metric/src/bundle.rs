use crate::{common::*, names::TensorName};

/// Tensors of one mini-batch indexed by role.
///
/// The bundle keeps the order of the names it is built from, which must be
/// the order the producer emits its outputs in.
#[derive(Debug, Clone, Default)]
pub struct TensorBundle {
    tensors: IndexMap<TensorName, ArrayD<f32>>,
}

impl TensorBundle {
    /// Pair up the resolved `names` with the producer's `tensors`.
    pub fn new<N, T>(names: N, tensors: T) -> Result<Self, MetricError>
    where
        N: IntoIterator<Item = TensorName>,
        T: IntoIterator<Item = ArrayD<f32>>,
    {
        let names: Vec<_> = names.into_iter().collect();
        let tensors: Vec<_> = tensors.into_iter().collect();

        if names.len() != tensors.len() {
            return Err(MetricError::BundleLength {
                num_tensors: tensors.len(),
                names,
            });
        }

        let mut map = IndexMap::with_capacity(names.len());
        for (name, tensor) in izip!(names, tensors) {
            if map.insert(name, tensor).is_some() {
                return Err(MetricError::DuplicateTensor(name));
            }
        }

        Ok(Self { tensors: map })
    }

    /// Like [new](TensorBundle::new), with names given as strings.
    pub fn from_str_names<S, T>(names: &[S], tensors: T) -> Result<Self, MetricError>
    where
        S: AsRef<str>,
        T: IntoIterator<Item = ArrayD<f32>>,
    {
        let names: Vec<TensorName> = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                name.parse()
                    .map_err(|_| MetricError::UnknownTensorName(name.to_string()))
            })
            .collect::<Result<_, _>>()?;
        Self::new(names, tensors)
    }

    pub fn get(&self, name: TensorName) -> Result<&ArrayD<f32>, MetricError> {
        self.tensors
            .get(&name)
            .ok_or(MetricError::MissingTensor(name))
    }

    pub fn contains(&self, name: TensorName) -> bool {
        self.tensors.contains_key(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = TensorName> + '_ {
        self.tensors.keys().copied()
    }

    /// Tensors in producer order.
    pub fn tensors(&self) -> impl Iterator<Item = &ArrayD<f32>> + '_ {
        self.tensors.values()
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }
}
