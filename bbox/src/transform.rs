use super::TLBR;
use crate::common::*;

/// Axis-aligned affine map `y' = y * sy + ty`, `x' = x * sx + tx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    /// Uniform scaling about the origin.
    pub fn from_scale(scale: T) -> Self {
        Self {
            sy: scale,
            sx: scale,
            ty: T::zero(),
            tx: T::zero(),
        }
    }

    /// Pure translation.
    pub fn from_translation(ty: T, tx: T) -> Self {
        Self {
            sy: T::one(),
            sx: T::one(),
            ty,
            tx,
        }
    }
}

impl<T> Mul<&TLBR<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = TLBR<T>;

    fn mul(self, rhs: &TLBR<T>) -> Self::Output {
        rhs.transform(self)
    }
}
