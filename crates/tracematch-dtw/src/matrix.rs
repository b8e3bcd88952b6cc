//! Flat row-major grid shared by the cost and accumulated-cost matrices.

use std::ops::{Index, IndexMut};

/// Row-major `rows x width` grid of `f64` stored in one contiguous buffer.
///
/// The width is fixed at construction (the reference length). Rows are
/// appended as the query grows, an O(width) buffer extension each, and only
/// dropped from the end when an extension is rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    width: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create an empty matrix with the given row width.
    pub(crate) fn with_width(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    /// Return the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// Return true if the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the value at `(row, col)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.width || row >= self.rows() {
            return None;
        }
        Some(self.data[row * self.width + col])
    }

    /// Return one row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Return the last row, if any.
    #[must_use]
    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows().checked_sub(1).map(|r| self.row(r))
    }

    /// Append `count` zero-filled rows.
    pub(crate) fn push_zero_rows(&mut self, count: usize) {
        self.data.resize(self.data.len() + count * self.width, 0.0);
    }

    /// Append one row. `row.len()` must equal the width.
    pub(crate) fn push_row(&mut self, row: impl IntoIterator<Item = f64>) {
        let before = self.data.len();
        self.data.extend(row);
        debug_assert_eq!(self.data.len() - before, self.width);
    }

    /// Drop every row from index `rows` onward.
    pub(crate) fn truncate_rows(&mut self, rows: usize) {
        self.data.truncate(rows * self.width);
    }

    /// Iterate over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows()).map(move |r| self.row(r))
    }

    /// Copy the matrix out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Return the underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(col < self.width, "column {col} out of bounds for width {}", self.width);
        &self.data[row * self.width + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(col < self.width, "column {col} out of bounds for width {}", self.width);
        &mut self.data[row * self.width + col]
    }
}
