//! 2-D arrays with a per-entry validity mask.
//!
//! `nalgebra` matrices carry no notion of missing data, so every derived
//! quantity is built through [`MaskedArray2D::from_fn`], whose closure
//! returns `None` for entries that cannot be computed. Invalidity therefore
//! flows through each stencil explicitly.

use std::ops::Index;

use nalgebra::DMatrix;

use crate::error::{GridError, Result};

/// A real-valued 2-D array with an optional mask (`true` = invalid).
///
/// Invalid entries hold NaN in the underlying data so they can never be
/// mistaken for a numeric zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray2D {
    data: DMatrix<f64>,
    mask: Option<DMatrix<bool>>,
}

impl MaskedArray2D {
    /// Wrap a matrix; NaN entries become invalid.
    pub fn new(data: DMatrix<f64>) -> Self {
        let mask = if data.iter().any(|v| v.is_nan()) {
            Some(data.map(|v| v.is_nan()))
        } else {
            None
        };
        Self { data, mask }
    }

    /// Wrap a matrix with an explicit invalid mask of the same shape.
    pub fn with_mask(data: DMatrix<f64>, mask: DMatrix<bool>) -> Result<Self> {
        if data.shape() != mask.shape() {
            return Err(GridError::shape(format!(
                "mask shape {:?} does not match data shape {:?}",
                mask.shape(),
                data.shape()
            )));
        }
        let data = DMatrix::from_fn(data.nrows(), data.ncols(), |r, c| {
            if mask[(r, c)] {
                f64::NAN
            } else {
                data[(r, c)]
            }
        });
        Ok(Self::normalized(data, mask))
    }

    /// Build an array entry by entry; `None` marks an invalid entry.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f64>,
    {
        let mut mask = DMatrix::from_element(nrows, ncols, false);
        let data = DMatrix::from_fn(nrows, ncols, |r, c| match f(r, c) {
            Some(v) if !v.is_nan() => v,
            _ => {
                mask[(r, c)] = true;
                f64::NAN
            }
        });
        Self::normalized(data, mask)
    }

    /// Build from nested rows. Ragged input is a shape error.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(GridError::shape(format!(
                "array must be two dimensional: row {} has {} columns, expected {}",
                idx,
                row.len(),
                ncols
            )));
        }
        Ok(Self::new(DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c])))
    }

    /// Mask entries where either `x` or `y` is NaN, in both arrays.
    pub fn masked_pair(x: DMatrix<f64>, y: DMatrix<f64>) -> Result<(Self, Self)> {
        if x.shape() != y.shape() {
            return Err(GridError::shape(format!(
                "x and y must be the same size: {:?} vs {:?}",
                x.shape(),
                y.shape()
            )));
        }
        let invalid = x.zip_map(&y, |a, b| a.is_nan() || b.is_nan());
        Ok((Self::with_mask(x, invalid.clone())?, Self::with_mask(y, invalid)?))
    }

    fn normalized(data: DMatrix<f64>, mask: DMatrix<bool>) -> Self {
        let mask = if mask.iter().any(|&m| m) { Some(mask) } else { None };
        Self { data, mask }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Raw values; invalid entries are NaN.
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// The invalid mask, or `None` when every entry is valid.
    pub fn mask(&self) -> Option<&DMatrix<bool>> {
        self.mask.as_ref()
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask.as_ref().map_or(false, |m| m[(row, col)])
    }

    /// Value at `(row, col)`, or `None` if invalid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if self.is_masked(row, col) {
            None
        } else {
            Some(self.data[(row, col)])
        }
    }

    /// Number of invalid entries.
    pub fn count_masked(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |m| m.iter().filter(|&&v| v).count())
    }

    /// Copy with invalid entries replaced by `fill`.
    pub fn filled(&self, fill: f64) -> DMatrix<f64> {
        DMatrix::from_fn(self.nrows(), self.ncols(), |r, c| {
            self.get(r, c).unwrap_or(fill)
        })
    }

    /// Apply `f` to valid entries; invalid entries stay invalid.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self::from_fn(self.nrows(), self.ncols(), |r, c| self.get(r, c).map(&f))
    }

    /// Smallest and largest valid value.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut out: Option<(f64, f64)> = None;
        for r in 0..self.nrows() {
            for c in 0..self.ncols() {
                if let Some(v) = self.get(r, c) {
                    out = Some(match out {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
            }
        }
        out
    }
}

impl From<DMatrix<f64>> for MaskedArray2D {
    fn from(data: DMatrix<f64>) -> Self {
        Self::new(data)
    }
}

/// Indexes the raw data; invalid entries read as NaN.
impl Index<(usize, usize)> for MaskedArray2D {
    type Output = f64;

    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.data[idx]
    }
}
