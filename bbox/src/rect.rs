use super::TLBR;
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    fn from_tlbr(tlbr: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_tlbr(tlbr).unwrap()
    }

    fn from_tlhw(tlhw: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_tlhw(tlhw).unwrap()
    }

    /// Build a rectangle from the `[x1, y1, x2, y2]` corner order used by roidb records.
    fn try_from_xyxy(xyxy: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized,
    {
        let [x1, y1, x2, y2] = xyxy;
        Self::try_from_tlbr([y1, x1, y2, x2])
    }

    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    fn xyxy(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.r(), self.b()]
    }

    fn hw(&self) -> [Self::Type; 2] {
        [self.h(), self.w()]
    }

    fn to_tlbr(&self) -> TLBR<Self::Type> {
        TLBR {
            t: self.t(),
            l: self.l(),
            b: self.b(),
            r: self.r(),
        }
    }

    fn area(&self) -> <Self::Type as Mul<Self::Type>>::Output
    where
        Self::Type: Mul<Self::Type>,
    {
        self.h() * self.w()
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    fn intersect_with<R>(&self, other: &R) -> Option<TLBR<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let t = self.t().max(other.t());
        let l = self.l().max(other.l());
        let b = self.b().min(other.b());
        let r = self.r().min(other.r());
        (b > t && r > l).then(|| TLBR::from_tlbr([t, l, b, r]))
    }

    fn intersection_area_with<R>(&self, other: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        self.intersect_with(other)
            .map(|rect| rect.area())
            .unwrap_or_else(Self::Type::zero)
    }

    /// The fraction of this rectangle's own area that lies inside `region`.
    ///
    /// The denominator is the area of `self`, not the union area, so the
    /// value measures how much of a box is covered by a region.
    /// Degenerate rectangles with zero area are never covered.
    fn coverage_by<R>(&self, region: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        let area = self.area();
        if area <= Self::Type::zero() {
            return Self::Type::zero();
        }
        self.intersection_area_with(region) / area
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn xyxy_order() {
        let rect = TLBR::try_from_xyxy([1.0, 2.0, 5.0, 10.0]).unwrap();
        assert_eq!(rect.tlbr(), [2.0, 1.0, 10.0, 5.0]);
        assert_eq!(rect.xyxy(), [1.0, 2.0, 5.0, 10.0]);
        assert!(TLBR::try_from_xyxy([5.0, 2.0, 1.0, 10.0]).is_err());
    }

    #[test]
    fn coverage_is_relative_to_own_area() {
        let small = TLBR::from_tlbr([0.0, 0.0, 2.0, 2.0]);
        let large = TLBR::from_tlbr([0.0, 0.0, 4.0, 4.0]);

        assert_abs_diff_eq!(small.intersection_area_with(&large), 4.0);
        assert_abs_diff_eq!(small.coverage_by(&large), 1.0);
        assert_abs_diff_eq!(large.coverage_by(&small), 0.25);
    }

    #[test]
    fn coverage_of_disjoint_and_degenerate() {
        let rect = TLBR::from_tlbr([0.0, 0.0, 2.0, 2.0]);
        let far = TLBR::from_tlbr([5.0, 5.0, 6.0, 6.0]);
        let flat = TLBR::from_tlbr([1.0, 1.0, 1.0, 3.0]);

        assert_abs_diff_eq!(rect.coverage_by(&far), 0.0);
        assert_abs_diff_eq!(flat.coverage_by(&rect), 0.0);
    }
}
