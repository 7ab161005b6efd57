//! Arakawa C-grid metrics derived from a vertex array.
//!
//! Layout, for vertex arrays of shape `(R, C)`:
//!
//! ```text
//!   psi ── v ── psi        rho   (R-1, C-1)  cell centres
//!    │          │          u     (R-1, C-2)  interior vertical edges
//!    u   rho    u          v     (R-2, C-1)  interior horizontal edges
//!    │          │          psi   (R-2, C-2)  interior vertices
//!   psi ── v ── psi
//! ```
//!
//! Every accessor is a pure function of the current vertices and
//! `mask_rho`; nothing is cached between calls.

use std::f64::consts::PI;
use std::sync::Arc;

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::masked::MaskedArray2D;
use crate::polygon::Polygon;
use crate::spacing::{PlanarSpacing, SpacingStrategy};

/// Curvilinear orthogonal C-grid built from vertex (node) coordinates.
#[derive(Debug, Clone)]
pub struct GridMetrics {
    x: MaskedArray2D,
    y: MaskedArray2D,
    mask_rho: DMatrix<f64>,
    spacing: Arc<dyn SpacingStrategy>,
    version: u64,
}

#[inline]
fn mean4(a: Option<f64>, b: Option<f64>, c: Option<f64>, d: Option<f64>) -> Option<f64> {
    Some(0.25 * (a? + b? + c? + d?))
}

/// Mask entries are exactly 0 (inactive) or 1 (active).
pub(crate) fn check_mask_value(value: f64) -> Result<()> {
    if value == 0.0 || value == 1.0 {
        Ok(())
    } else {
        Err(GridError::value(format!(
            "mask values must be 0 or 1, got {}",
            value
        )))
    }
}

#[inline]
fn mean2(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(0.5 * (a? + b?))
}

impl GridMetrics {
    /// Build a grid from vertex coordinates.
    ///
    /// NaN in either array marks the vertex invalid in both. Cells touching
    /// an invalid vertex start inactive in `mask_rho`.
    pub fn new(x: DMatrix<f64>, y: DMatrix<f64>) -> Result<Self> {
        let (x, y) = MaskedArray2D::masked_pair(x, y)?;
        if x.nrows() < 2 || x.ncols() < 2 {
            return Err(GridError::shape(format!(
                "a grid needs at least 2x2 vertices, got {:?}",
                x.shape()
            )));
        }
        let mut grid = Self {
            mask_rho: DMatrix::from_element(x.nrows() - 1, x.ncols() - 1, 1.0),
            x,
            y,
            spacing: Arc::new(PlanarSpacing),
            version: 0,
        };
        grid.apply_vertex_mask();
        Ok(grid)
    }

    /// Build from nested rows. Ragged input is a shape error.
    pub fn from_rows(x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Self> {
        let x = MaskedArray2D::from_rows(x)?;
        let y = MaskedArray2D::from_rows(y)?;
        Self::new(x.data().clone(), y.data().clone())
    }

    /// Replace the cell-width strategy.
    pub fn with_spacing(mut self, spacing: Arc<dyn SpacingStrategy>) -> Self {
        self.spacing = spacing;
        self.version += 1;
        self
    }

    /// Bumped on every mutation of the mask or spacing strategy.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Vertex shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    /// Cell (rho) shape `(rows - 1, cols - 1)`.
    pub fn cell_shape(&self) -> (usize, usize) {
        self.mask_rho.shape()
    }

    /// Vertex x.
    pub fn x(&self) -> &MaskedArray2D {
        &self.x
    }

    /// Vertex y.
    pub fn y(&self) -> &MaskedArray2D {
        &self.y
    }

    pub fn x_vert(&self) -> &MaskedArray2D {
        &self.x
    }

    pub fn y_vert(&self) -> &MaskedArray2D {
        &self.y
    }

    fn vertex_valid(&self, j: usize, i: usize) -> bool {
        !self.x.is_masked(j, i)
    }

    fn rho_of(a: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = a.shape();
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| {
            mean4(a.get(j + 1, i + 1), a.get(j + 1, i), a.get(j, i + 1), a.get(j, i))
        })
    }

    fn u_of(a: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = a.shape();
        MaskedArray2D::from_fn(rows - 1, cols.saturating_sub(2), |j, i| {
            mean2(a.get(j, i + 1), a.get(j + 1, i + 1))
        })
    }

    fn v_of(a: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = a.shape();
        MaskedArray2D::from_fn(rows.saturating_sub(2), cols - 1, |j, i| {
            mean2(a.get(j + 1, i), a.get(j + 1, i + 1))
        })
    }

    fn psi_of(a: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = a.shape();
        MaskedArray2D::from_fn(rows.saturating_sub(2), cols.saturating_sub(2), |j, i| {
            a.get(j + 1, i + 1)
        })
    }

    /// Cell centroids, x.
    pub fn x_rho(&self) -> MaskedArray2D {
        Self::rho_of(&self.x)
    }

    /// Cell centroids, y.
    pub fn y_rho(&self) -> MaskedArray2D {
        Self::rho_of(&self.y)
    }

    pub fn x_u(&self) -> MaskedArray2D {
        Self::u_of(&self.x)
    }

    pub fn y_u(&self) -> MaskedArray2D {
        Self::u_of(&self.y)
    }

    pub fn x_v(&self) -> MaskedArray2D {
        Self::v_of(&self.x)
    }

    pub fn y_v(&self) -> MaskedArray2D {
        Self::v_of(&self.y)
    }

    pub fn x_psi(&self) -> MaskedArray2D {
        Self::psi_of(&self.x)
    }

    pub fn y_psi(&self) -> MaskedArray2D {
        Self::psi_of(&self.y)
    }

    // ------------------------------------------------------------------
    // Masks
    // ------------------------------------------------------------------

    /// Zero every cell that has an invalid corner.
    fn apply_vertex_mask(&mut self) {
        if self.x.mask().is_none() {
            return;
        }
        let (rows, cols) = self.mask_rho.shape();
        for j in 0..rows {
            for i in 0..cols {
                let valid = self.vertex_valid(j, i)
                    && self.vertex_valid(j + 1, i)
                    && self.vertex_valid(j, i + 1)
                    && self.vertex_valid(j + 1, i + 1);
                if !valid {
                    self.mask_rho[(j, i)] = 0.0;
                }
            }
        }
    }

    /// Cell mask: 1 for active cells, 0 for inactive ones.
    pub fn mask_rho(&self) -> &DMatrix<f64> {
        &self.mask_rho
    }

    /// Same as [`GridMetrics::mask_rho`].
    pub fn mask(&self) -> &DMatrix<f64> {
        &self.mask_rho
    }

    /// Replace the cell mask.
    ///
    /// Entries must be 0 or 1. Cells with an invalid corner vertex are
    /// forced back to 0.
    pub fn set_mask_rho(&mut self, mask: DMatrix<f64>) -> Result<()> {
        if mask.shape() != self.mask_rho.shape() {
            return Err(GridError::shape(format!(
                "mask_rho must have shape {:?}, got {:?}",
                self.mask_rho.shape(),
                mask.shape()
            )));
        }
        mask.iter().try_for_each(|v| check_mask_value(*v))?;
        self.mask_rho = mask;
        self.apply_vertex_mask();
        self.version += 1;
        Ok(())
    }

    /// Product of horizontally adjacent rho entries.
    pub fn mask_u(&self) -> DMatrix<f64> {
        let m = &self.mask_rho;
        DMatrix::from_fn(m.nrows(), m.ncols() - 1, |j, i| m[(j, i + 1)] * m[(j, i)])
    }

    /// Product of vertically adjacent rho entries.
    pub fn mask_v(&self) -> DMatrix<f64> {
        let m = &self.mask_rho;
        DMatrix::from_fn(m.nrows() - 1, m.ncols(), |j, i| m[(j + 1, i)] * m[(j, i)])
    }

    /// Product of the four rho entries around each psi point.
    pub fn mask_psi(&self) -> DMatrix<f64> {
        let m = &self.mask_rho;
        DMatrix::from_fn(m.nrows() - 1, m.ncols() - 1, |j, i| {
            m[(j + 1, i + 1)] * m[(j, i + 1)] * m[(j + 1, i)] * m[(j, i)]
        })
    }

    /// Set `mask_rho` to `mask_value` for every cell whose centre lies
    /// inside `polygon`. Cells outside are untouched.
    ///
    /// Returns the number of cells whose centre was inside. `mask_value`
    /// must be 0 or 1.
    pub fn mask_polygon(&mut self, polygon: &Polygon, mask_value: f64) -> Result<usize> {
        check_mask_value(mask_value)?;
        let x_rho = self.x_rho();
        let y_rho = self.y_rho();
        let (rows, cols) = self.mask_rho.shape();

        let mut mask = self.mask_rho.clone();
        let mut inside = 0;
        for j in 0..rows {
            for i in 0..cols {
                let (Some(px), Some(py)) = (x_rho.get(j, i), y_rho.get(j, i)) else {
                    continue;
                };
                if polygon.contains(px, py) {
                    mask[(j, i)] = mask_value;
                    inside += 1;
                }
            }
        }

        debug!(cells = inside, mask_value, "masked polygon");
        self.mask_rho = mask;
        self.apply_vertex_mask();
        self.version += 1;
        Ok(inside)
    }

    // ------------------------------------------------------------------
    // Spacing
    // ------------------------------------------------------------------

    /// Cell width along the column direction.
    pub fn dx(&self) -> MaskedArray2D {
        self.spacing.dx(&self.x, &self.y)
    }

    /// Cell width along the row direction.
    pub fn dy(&self) -> MaskedArray2D {
        self.spacing.dy(&self.x, &self.y)
    }

    fn reciprocal(a: &MaskedArray2D) -> MaskedArray2D {
        MaskedArray2D::from_fn(a.nrows(), a.ncols(), |j, i| {
            a.get(j, i).filter(|v| *v != 0.0).map(|v| 1.0 / v)
        })
    }

    /// `1 / dx`; zero widths give invalid entries.
    pub fn pm(&self) -> MaskedArray2D {
        Self::reciprocal(&self.dx())
    }

    /// `1 / dy`; zero widths give invalid entries.
    pub fn pn(&self) -> MaskedArray2D {
        Self::reciprocal(&self.dy())
    }

    /// Centred difference of `dy` along columns. The outer rim is zero.
    pub fn dndx(&self) -> MaskedArray2D {
        let dy = self.dy();
        let (rows, cols) = dy.shape();
        MaskedArray2D::from_fn(rows, cols, |j, i| {
            if j == 0 || i == 0 || j + 1 == rows || i + 1 == cols {
                return Some(0.0);
            }
            Some(0.5 * (dy.get(j, i + 1)? - dy.get(j, i - 1)?))
        })
    }

    /// Centred difference of `dx` along rows. The outer rim is zero.
    pub fn dmde(&self) -> MaskedArray2D {
        let dx = self.dx();
        let (rows, cols) = dx.shape();
        MaskedArray2D::from_fn(rows, cols, |j, i| {
            if j == 0 || i == 0 || j + 1 == rows || i + 1 == cols {
                return Some(0.0);
            }
            Some(0.5 * (dx.get(j + 1, i)? - dx.get(j - 1, i)?))
        })
    }

    // ------------------------------------------------------------------
    // Angles
    // ------------------------------------------------------------------

    /// Grid angle at each vertex, in radians.
    ///
    /// Interior vertices average the four adjacent edge angles, edge
    /// vertices three and corners two.
    pub fn angle(&self) -> MaskedArray2D {
        let (rows, cols) = self.shape();
        debug!(rows, cols, "computing vertex angle");
        let (x, y) = (&self.x, &self.y);

        // ud: along columns, (rows, cols - 1); lr: along rows, (rows - 1, cols)
        let ud = MaskedArray2D::from_fn(rows, cols - 1, |j, i| {
            Some((y.get(j, i + 1)? - y.get(j, i)?).atan2(x.get(j, i + 1)? - x.get(j, i)?))
        });
        let lr = MaskedArray2D::from_fn(rows - 1, cols, |j, i| {
            Some((y.get(j + 1, i)? - y.get(j, i)?).atan2(x.get(j + 1, i)? - x.get(j, i)?) - PI / 2.0)
        });

        let (last_r, last_c) = (rows - 1, cols - 1);
        MaskedArray2D::from_fn(rows, cols, |j, i| {
            let top = j == 0;
            let bottom = j == last_r;
            let left = i == 0;
            let right = i == last_c;
            match (top || bottom, left || right) {
                // corners
                (true, true) => {
                    let lr_j = if top { 0 } else { last_r - 1 };
                    let ud_i = if left { 0 } else { last_c - 1 };
                    Some(0.5 * (lr.get(lr_j, i)? + ud.get(j, ud_i)?))
                }
                // first/last row
                (true, false) => {
                    let lr_j = if top { 0 } else { last_r - 1 };
                    Some((1.0 / 3.0) * (lr.get(lr_j, i)? + ud.get(j, i)? + ud.get(j, i - 1)?))
                }
                // first/last column
                (false, true) => {
                    let ud_i = if left { 0 } else { last_c - 1 };
                    Some((1.0 / 3.0) * (ud.get(j, ud_i)? + lr.get(j, i)? + lr.get(j - 1, i)?))
                }
                (false, false) => Some(
                    0.25 * (ud.get(j, i)? + ud.get(j, i - 1)? + lr.get(j, i)? + lr.get(j - 1, i)?),
                ),
            }
        })
    }

    /// Grid angle at cell centres: direction of the line joining the
    /// midpoints of each cell's left and right edges.
    pub fn angle_rho(&self) -> MaskedArray2D {
        let (rows, cols) = self.shape();
        let (x, y) = (&self.x, &self.y);
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| {
            let dx = mean2(x.get(j + 1, i + 1), x.get(j, i + 1))? - mean2(x.get(j + 1, i), x.get(j, i))?;
            let dy = mean2(y.get(j + 1, i + 1), y.get(j, i + 1))? - mean2(y.get(j + 1, i), y.get(j, i))?;
            Some(dy.atan2(dx))
        })
    }

    /// Deviation from orthogonality of each cell, in radians.
    ///
    /// The angle between the row and column edges is measured at all four
    /// corners of the cell; the result is the mean absolute angle minus
    /// π/2. Cells with a degenerate (zero-length) edge are invalid.
    pub fn orthogonality(&self) -> MaskedArray2D {
        let (rows, cols) = self.shape();
        debug!(rows, cols, "computing orthogonality");
        let (x, y) = (&self.x, &self.y);

        let unit = |dx: f64, dy: f64| -> Option<(f64, f64)> {
            let len = dx.hypot(dy);
            (len > 0.0).then(|| (dx / len, dy / len))
        };
        // du: unit tangent from (j, i) to (j, i + 1); dv: from (j, i) to (j + 1, i)
        let du = |j: usize, i: usize| -> Option<(f64, f64)> {
            unit(x.get(j, i + 1)? - x.get(j, i)?, y.get(j, i + 1)? - y.get(j, i)?)
        };
        let dv = |j: usize, i: usize| -> Option<(f64, f64)> {
            unit(x.get(j + 1, i)? - x.get(j, i)?, y.get(j + 1, i)? - y.get(j, i)?)
        };
        let angle = |u: (f64, f64), v: (f64, f64)| (u.0 * v.0 + u.1 * v.1).clamp(-1.0, 1.0).acos();

        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| {
            let ang1 = angle(du(j, i)?, dv(j, i)?);
            let ang2 = angle(du(j + 1, i)?, dv(j, i)?);
            let ang3 = angle(du(j, i)?, dv(j, i + 1)?);
            let ang4 = angle(du(j + 1, i)?, dv(j, i + 1)?);
            let mean = (ang1.abs() + ang2.abs() + ang3.abs() + ang4.abs()) / 4.0;
            Some(mean - PI / 2.0)
        })
    }

    /// Same as [`GridMetrics::orthogonality`].
    pub fn calculate_orthogonality(&self) -> MaskedArray2D {
        self.orthogonality()
    }
}
