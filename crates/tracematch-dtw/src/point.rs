//! Fixed-dimension point type.

use std::ops::Index;

use crate::error::DtwError;

/// A point with `D` finite coordinates. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<const D: usize>([f64; D]);

impl<const D: usize> Point<D> {
    /// Create a point, validating that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    pub fn new(coords: [f64; D]) -> Result<Self, DtwError> {
        if let Some(axis) = coords.iter().position(|c| !c.is_finite()) {
            return Err(DtwError::NonFiniteCoordinate { index: 0, axis });
        }
        Ok(Self(coords))
    }

    /// Create a point from a runtime slice, checking its length against `D`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `coords.len() != D` |
    /// | [`DtwError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    pub fn from_slice(coords: &[f64]) -> Result<Self, DtwError> {
        let array: [f64; D] = coords.try_into().map_err(|_| DtwError::DimensionMismatch {
            expected: D,
            found: coords.len(),
        })?;
        Self::new(array)
    }

    /// Return the dimension of this point type.
    #[must_use]
    pub const fn dimension() -> usize {
        D
    }

    /// Return the coordinates.
    #[must_use]
    pub fn coords(&self) -> &[f64; D] {
        &self.0
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// This is the local cost used by every DTW matrix. The square root is
    /// deliberately not taken here.
    #[inline]
    #[must_use]
    pub fn squared_distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.squared_distance(other).sqrt()
    }
}

impl<const D: usize> Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, axis: usize) -> &Self::Output {
        &self.0[axis]
    }
}

impl<const D: usize> TryFrom<[f64; D]> for Point<D> {
    type Error = DtwError;

    fn try_from(coords: [f64; D]) -> Result<Self, Self::Error> {
        Self::new(coords)
    }
}

impl<const D: usize> AsRef<[f64]> for Point<D> {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_3d() {
        let a = Point::new([0.0, 0.0, 0.0]).unwrap();
        let b = Point::new([1.0, 2.0, 2.0]).unwrap();
        assert_eq!(a.squared_distance(&b), 9.0);
        assert_eq!(a.distance(&b), 3.0);
    }

    #[test]
    fn squared_distance_is_symmetric() {
        let a = Point::new([1.5, -2.0]).unwrap();
        let b = Point::new([-0.5, 4.0]).unwrap();
        assert_eq!(a.squared_distance(&b), b.squared_distance(&a));
    }

    #[test]
    fn rejects_nan() {
        let result = Point::new([1.0, f64::NAN, 3.0]);
        assert!(matches!(
            result,
            Err(DtwError::NonFiniteCoordinate { index: 0, axis: 1 })
        ));
    }

    #[test]
    fn rejects_infinity() {
        let result = Point::new([f64::NEG_INFINITY]);
        assert!(matches!(result, Err(DtwError::NonFiniteCoordinate { axis: 0, .. })));
    }

    #[test]
    fn from_slice_checks_dimension() {
        let result = Point::<3>::from_slice(&[1.0, 2.0]);
        assert_eq!(
            result,
            Err(DtwError::DimensionMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn from_slice_accepts_matching_dimension() {
        let p = Point::<3>::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
        assert_eq!(p[2], 3.0);
        assert_eq!(Point::<3>::dimension(), 3);
    }
}
