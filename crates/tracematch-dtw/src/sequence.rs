//! Append-only point sequences.

use std::ops::Index;

use crate::error::DtwError;
use crate::point::Point;

/// Ordered, append-only collection of `D`-dimensional points.
///
/// A sequence may be empty while a live query is being collected; alignment
/// entry points reject empty sequences with [`DtwError::EmptySequence`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence<const D: usize>(Vec<Point<D>>);

impl<const D: usize> Sequence<D> {
    /// Create an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap already-validated points.
    #[must_use]
    pub fn from_points(points: Vec<Point<D>>) -> Self {
        Self(points)
    }

    /// Build a sequence from runtime rows, validating each row's dimension and
    /// finiteness.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | A row does not have exactly `D` values |
    /// | [`DtwError::NonFiniteCoordinate`] | A value is NaN or infinite; `index` is the row |
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, DtwError> {
        let points = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                Point::from_slice(row.as_ref()).map_err(|e| match e {
                    DtwError::NonFiniteCoordinate { axis, .. } => {
                        DtwError::NonFiniteCoordinate { index, axis }
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(points))
    }

    /// Append a single point.
    pub fn push(&mut self, point: Point<D>) {
        self.0.push(point);
    }

    /// Append every point of `points`.
    pub fn extend_from_slice(&mut self, points: &[Point<D>]) {
        self.0.extend_from_slice(points);
    }

    /// Return the points as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Point<D>] {
        &self.0
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the sequence has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point<D>> {
        self.0.last()
    }

    /// Iterate over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point<D>> {
        self.0.iter()
    }

    /// Remove every point, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Fail with [`DtwError::EmptySequence`] if the sequence has no points.
    pub(crate) fn ensure_non_empty(&self) -> Result<(), DtwError> {
        if self.0.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        Ok(())
    }

    /// Return the points of `self` that follow `prefix`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidAppend`] | `self` is shorter than `prefix`, or a shared point differs |
    pub fn suffix_after(&self, prefix: &Self) -> Result<&[Point<D>], DtwError> {
        if let Some(position) = self
            .0
            .iter()
            .zip(prefix.0.iter())
            .position(|(new, old)| new != old)
        {
            return Err(DtwError::InvalidAppend { position });
        }
        if self.0.len() < prefix.0.len() {
            return Err(DtwError::InvalidAppend {
                position: self.0.len(),
            });
        }
        Ok(&self.0[prefix.0.len()..])
    }
}

impl Sequence<1> {
    /// Build a one-dimensional sequence from scalar samples.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NonFiniteCoordinate`] | A value is NaN or infinite |
    pub fn from_scalars(values: &[f64]) -> Result<Self, DtwError> {
        let points = values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                Point::new([v]).map_err(|_| DtwError::NonFiniteCoordinate { index, axis: 0 })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(points))
    }
}

impl<const D: usize> Index<usize> for Sequence<D> {
    type Output = Point<D>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> AsRef<[Point<D>]> for Sequence<D> {
    fn as_ref(&self) -> &[Point<D>] {
        &self.0
    }
}

impl<const D: usize> FromIterator<Point<D>> for Sequence<D> {
    fn from_iter<I: IntoIterator<Item = Point<D>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, const D: usize> IntoIterator for &'a Sequence<D> {
    type Item = &'a Point<D>;
    type IntoIter = std::slice::Iter<'a, Point<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
