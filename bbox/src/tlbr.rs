use super::Rect;
use crate::{common::*, Transform};

/// Bounding box in TLBR format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        TLBR {
            t: self.t * transform.sy + transform.ty,
            l: self.l * transform.sx + transform.tx,
            b: self.b * transform.sy + transform.ty,
            r: self.r * transform.sx + transform.tx,
        }
    }
}

impl<T> TLBR<T>
where
    T: Float,
{
    /// Round every coordinate to the nearest integer.
    pub fn round(&self) -> Self {
        TLBR {
            t: self.t.round(),
            l: self.l.round(),
            b: self.b.round(),
            r: self.r.round(),
        }
    }

    /// Clamp the box into an image of `height` by `width` pixels.
    ///
    /// Coordinates are pixel indices, so the valid range along each axis is
    /// `[0, size - 1]`.
    pub fn clip_to_image(&self, height: T, width: T) -> Self {
        let zero = T::zero();
        let max_y = (height - T::one()).max(zero);
        let max_x = (width - T::one()).max(zero);
        let clamp = |value: T, max: T| value.max(zero).min(max);

        TLBR {
            t: clamp(self.t, max_y),
            l: clamp(self.l, max_x),
            b: clamp(self.b, max_y),
            r: clamp(self.r, max_x),
        }
    }

    /// Clamp the box to the boundary of `region`.
    pub fn clamp_within<R>(&self, region: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let clamp = |value: T, min: T, max: T| value.max(min).min(max);

        TLBR {
            t: clamp(self.t, region.t(), region.b()),
            l: clamp(self.l, region.l(), region.r()),
            b: clamp(self.b, region.t(), region.b()),
            r: clamp(self.r, region.l(), region.r()),
        }
    }
}

impl<T> Rect for TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let b = t + h;
        let r = l + w;
        Self::try_from_tlbr([t, l, b, r])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;

    #[test]
    fn clip_to_image_bounds() {
        let rect = TLBR::from_tlbr([-3.0, 5.0, 40.0, 70.0]);
        let clipped = rect.clip_to_image(32.0, 64.0);
        assert_eq!(clipped.tlbr(), [0.0, 5.0, 31.0, 63.0]);
    }

    #[test]
    fn clamp_within_region() {
        let region = TLBR::from_tlbr([10.0, 10.0, 20.0, 20.0]);
        let rect = TLBR::from_tlbr([5.0, 12.0, 15.0, 30.0]);
        assert_eq!(rect.clamp_within(&region).tlbr(), [10.0, 12.0, 15.0, 20.0]);
    }

    #[test]
    fn round_coordinates() {
        let rect = TLBR::from_tlbr([0.4, 1.6, 2.5, 3.49]);
        assert_eq!(rect.round().tlbr(), [0.0, 2.0, 3.0, 3.0]);
    }
}
