//! Cell-width strategies.
//!
//! [`GridMetrics`](crate::GridMetrics) delegates `dx`/`dy` to a
//! [`SpacingStrategy`]: planar Euclidean distances by default, or
//! great-circle distances for grids laid out in a projected lon/lat system.

use std::fmt::Debug;
use std::sync::Arc;

use projection::{Geodesic, Projection, Vincenty};
use tracing::debug;

use crate::masked::MaskedArray2D;

/// Computes cell widths from vertex coordinates.
///
/// Both methods return arrays with one entry per cell, i.e. shape
/// `(rows - 1, cols - 1)` of the vertex arrays.
pub trait SpacingStrategy: Debug + Send + Sync {
    /// Width of each cell along the column (i) direction.
    fn dx(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D;

    /// Width of each cell along the row (j) direction.
    fn dy(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D;
}

#[inline]
fn mid(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(0.5 * (a? + b?))
}

/// Euclidean distance between edge midpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarSpacing;

impl SpacingStrategy for PlanarSpacing {
    fn dx(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = x.shape();
        // Midpoints of the vertical edges, differenced along columns.
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| {
            let x0 = mid(x.get(j + 1, i), x.get(j, i))?;
            let x1 = mid(x.get(j + 1, i + 1), x.get(j, i + 1))?;
            let y0 = mid(y.get(j + 1, i), y.get(j, i))?;
            let y1 = mid(y.get(j + 1, i + 1), y.get(j, i + 1))?;
            Some((x1 - x0).hypot(y1 - y0))
        })
    }

    fn dy(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = x.shape();
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| {
            let x0 = mid(x.get(j, i + 1), x.get(j, i))?;
            let x1 = mid(x.get(j + 1, i + 1), x.get(j + 1, i))?;
            let y0 = mid(y.get(j, i + 1), y.get(j, i))?;
            let y1 = mid(y.get(j + 1, i + 1), y.get(j + 1, i))?;
            Some((x1 - x0).hypot(y1 - y0))
        })
    }
}

/// Geodesic distances between lon/lat vertices.
///
/// Vertex coordinates are planar; they are unprojected through
/// `projection` before measuring. Each cell width is the mean of the two
/// bounding edge lengths.
#[derive(Debug, Clone)]
pub struct GreatCircleSpacing {
    projection: Arc<dyn Projection>,
    geodesic: Arc<dyn Geodesic>,
}

impl GreatCircleSpacing {
    pub fn new(projection: Arc<dyn Projection>, geodesic: Arc<dyn Geodesic>) -> Self {
        Self {
            projection,
            geodesic,
        }
    }

    /// Great-circle spacing on the WGS84 ellipsoid.
    pub fn wgs84(projection: Arc<dyn Projection>) -> Self {
        Self::new(projection, Arc::new(Vincenty::wgs84()))
    }

    fn lonlat(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> Vec<Option<(f64, f64)>> {
        let (rows, cols) = x.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for j in 0..rows {
            for i in 0..cols {
                out.push(match (x.get(j, i), y.get(j, i)) {
                    (Some(px), Some(py)) => Some(self.projection.unproject(px, py)),
                    _ => None,
                });
            }
        }
        out
    }

    fn distance(&self, a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<f64> {
        let (lon1, lat1) = a?;
        let (lon2, lat2) = b?;
        self.geodesic.distance(lon1, lat1, lon2, lat2)
    }
}

impl SpacingStrategy for GreatCircleSpacing {
    fn dx(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = x.shape();
        debug!(rows, cols, "great-circle dx");
        let ll = self.lonlat(x, y);
        let at = |j: usize, i: usize| ll[j * cols + i];
        // d[j, i]: edge from vertex (j, i) to (j, i + 1)
        let d = MaskedArray2D::from_fn(rows, cols - 1, |j, i| self.distance(at(j, i + 1), at(j, i)));
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| mid(d.get(j + 1, i), d.get(j, i)))
    }

    fn dy(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> MaskedArray2D {
        let (rows, cols) = x.shape();
        debug!(rows, cols, "great-circle dy");
        let ll = self.lonlat(x, y);
        let at = |j: usize, i: usize| ll[j * cols + i];
        let d = MaskedArray2D::from_fn(rows - 1, cols, |j, i| self.distance(at(j + 1, i), at(j, i)));
        MaskedArray2D::from_fn(rows - 1, cols - 1, |j, i| mid(d.get(j, i + 1), d.get(j, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use projection::Identity;
    use test_utils::{assert_approx_eq, rectilinear_grid};

    fn arrays(nrows: usize, ncols: usize, dx: f64, dy: f64) -> (MaskedArray2D, MaskedArray2D) {
        let grid = rectilinear_grid(nrows, ncols, dx, dy);
        MaskedArray2D::masked_pair(
            DMatrix::from_row_slice(nrows, ncols, &grid.x),
            DMatrix::from_row_slice(nrows, ncols, &grid.y),
        )
        .unwrap()
    }

    #[test]
    fn test_planar_rectilinear() {
        let (x, y) = arrays(3, 4, 2.0, 0.5);
        let dx = PlanarSpacing.dx(&x, &y);
        let dy = PlanarSpacing.dy(&x, &y);
        assert_eq!(dx.shape(), (2, 3));
        assert_eq!(dy.shape(), (2, 3));
        assert!(dx.data().iter().all(|v| (v - 2.0).abs() < 1e-12));
        assert!(dy.data().iter().all(|v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_great_circle_on_equator() {
        // One-degree cells straddling the equator, coordinates already lon/lat.
        let (x, y) = arrays(3, 3, 1.0, 1.0);
        let y = y.map(|v| v - 1.0);
        let spacing = GreatCircleSpacing::wgs84(Arc::new(Identity));
        let dx = spacing.dx(&x, &y);
        let dy = spacing.dy(&x, &y);
        assert_eq!(dx.shape(), (2, 2));
        // Mean of the equator (111.3 km) and 1° latitude (slightly shorter) edges.
        assert!(dx.get(0, 0).unwrap() < 111_320.0);
        assert!(dx.get(0, 0).unwrap() > 111_290.0);
        assert_approx_eq!(dx.get(0, 0).unwrap(), dx.get(1, 0).unwrap(), 1e-6);
        assert_approx_eq!(dy.get(0, 0).unwrap(), 110_575.0, 5.0);
    }

    #[test]
    fn test_masked_vertex_propagates() {
        let grid = rectilinear_grid(3, 3, 1.0, 1.0).with_invalid(1, 1);
        let (x, y) = MaskedArray2D::masked_pair(
            DMatrix::from_row_slice(3, 3, &grid.x),
            DMatrix::from_row_slice(3, 3, &grid.y),
        )
        .unwrap();
        let dx = PlanarSpacing.dx(&x, &y);
        assert_eq!(dx.count_masked(), 4);

        let gc = GreatCircleSpacing::wgs84(Arc::new(Identity)).dx(&x, &y);
        assert_eq!(gc.count_masked(), 4);
    }
}
