//! C-grids laid out in geographic coordinates.
//!
//! Vertices are held in a projected (planar) system so that angles and
//! orthogonality are measured in the plane; a conformal projection such as
//! Mercator or Lambert Conformal Conic should be used. Cell widths can use
//! great-circle distances instead of planar ones.

use std::sync::Arc;

use nalgebra::DMatrix;
use projection::{Geodesic, Projection};

use crate::error::{GridError, Result};
use crate::masked::MaskedArray2D;
use crate::metrics::GridMetrics;
use crate::polygon::Polygon;
use crate::spacing::{GreatCircleSpacing, PlanarSpacing};

/// Earth's rotation rate in rad/s.
pub const EARTH_ROTATION_RATE: f64 = 7.29e-5;

/// Coriolis parameter `2Ω·sin(lat)` for a latitude in degrees.
pub fn coriolis(lat: f64) -> f64 {
    2.0 * EARTH_ROTATION_RATE * lat.to_radians().sin()
}

/// A [`GridMetrics`] with a projection back to lon/lat.
#[derive(Debug, Clone)]
pub struct GeoGridMetrics {
    metrics: GridMetrics,
    lon: MaskedArray2D,
    lat: MaskedArray2D,
    projection: Arc<dyn Projection>,
    use_gcdist: bool,
}

impl GeoGridMetrics {
    /// Build from lon/lat vertices (degrees).
    ///
    /// Vertices that fail to project are treated as missing.
    pub fn from_lonlat(
        lon: DMatrix<f64>,
        lat: DMatrix<f64>,
        projection: Arc<dyn Projection>,
        use_gcdist: bool,
    ) -> Result<Self> {
        let (lon, lat) = MaskedArray2D::masked_pair(lon, lat)?;
        let (x, y) = Self::transform(&lon, &lat, |a, b| projection.project(a, b));
        let metrics = GridMetrics::new(x.filled(f64::NAN), y.filled(f64::NAN))?;

        // Keep lon/lat invalid wherever the planar vertex is.
        let (rows, cols) = lon.shape();
        let planar = metrics.x();
        let lon = MaskedArray2D::from_fn(rows, cols, |j, i| {
            lon.get(j, i).filter(|_| !planar.is_masked(j, i))
        });
        let lat = MaskedArray2D::from_fn(rows, cols, |j, i| {
            lat.get(j, i).filter(|_| !planar.is_masked(j, i))
        });
        Ok(Self::assemble(metrics, lon, lat, projection, use_gcdist))
    }

    /// Build from planar vertices produced in `projection`'s system.
    pub fn from_planar(
        x: DMatrix<f64>,
        y: DMatrix<f64>,
        projection: Arc<dyn Projection>,
        use_gcdist: bool,
    ) -> Result<Self> {
        let metrics = GridMetrics::new(x, y)?;
        let (lon, lat) = Self::transform(metrics.x(), metrics.y(), |a, b| projection.unproject(a, b));
        Ok(Self::assemble(metrics, lon, lat, projection, use_gcdist))
    }

    /// Measure great-circle widths with `geodesic` instead of WGS84 Vincenty.
    pub fn with_geodesic(mut self, geodesic: Arc<dyn Geodesic>) -> Self {
        if self.use_gcdist {
            self.metrics = self.metrics.with_spacing(Arc::new(GreatCircleSpacing::new(
                self.projection.clone(),
                geodesic,
            )));
        }
        self
    }

    fn assemble(
        metrics: GridMetrics,
        lon: MaskedArray2D,
        lat: MaskedArray2D,
        projection: Arc<dyn Projection>,
        use_gcdist: bool,
    ) -> Self {
        let metrics = if use_gcdist {
            metrics.with_spacing(Arc::new(GreatCircleSpacing::wgs84(projection.clone())))
        } else {
            metrics.with_spacing(Arc::new(PlanarSpacing))
        };
        Self {
            metrics,
            lon,
            lat,
            projection,
            use_gcdist,
        }
    }

    /// Map a pair of arrays through `f`, keeping the mask; non-finite
    /// results become invalid in both outputs.
    fn transform(
        a: &MaskedArray2D,
        b: &MaskedArray2D,
        f: impl Fn(f64, f64) -> (f64, f64),
    ) -> (MaskedArray2D, MaskedArray2D) {
        let (rows, cols) = a.shape();
        let pairs: Vec<Option<(f64, f64)>> = (0..rows * cols)
            .map(|k| {
                let (j, i) = (k / cols, k % cols);
                let (p, q) = f(a.get(j, i)?, b.get(j, i)?);
                (p.is_finite() && q.is_finite()).then_some((p, q))
            })
            .collect();
        (
            MaskedArray2D::from_fn(rows, cols, |j, i| pairs[j * cols + i].map(|p| p.0)),
            MaskedArray2D::from_fn(rows, cols, |j, i| pairs[j * cols + i].map(|p| p.1)),
        )
    }

    fn unproject(&self, x: &MaskedArray2D, y: &MaskedArray2D) -> (MaskedArray2D, MaskedArray2D) {
        Self::transform(x, y, |a, b| self.projection.unproject(a, b))
    }

    /// The planar grid.
    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Mutable access to the planar grid, e.g. for masking.
    pub fn metrics_mut(&mut self) -> &mut GridMetrics {
        &mut self.metrics
    }

    pub fn into_metrics(self) -> GridMetrics {
        self.metrics
    }

    pub fn projection(&self) -> &Arc<dyn Projection> {
        &self.projection
    }

    /// Whether `dx`/`dy` use great-circle distances.
    pub fn use_gcdist(&self) -> bool {
        self.use_gcdist
    }

    /// Vertex longitudes.
    pub fn lon_vert(&self) -> &MaskedArray2D {
        &self.lon
    }

    /// Vertex latitudes.
    pub fn lat_vert(&self) -> &MaskedArray2D {
        &self.lat
    }

    /// `(lon_rho, lat_rho)`
    pub fn lonlat_rho(&self) -> (MaskedArray2D, MaskedArray2D) {
        self.unproject(&self.metrics.x_rho(), &self.metrics.y_rho())
    }

    /// `(lon_u, lat_u)`
    pub fn lonlat_u(&self) -> (MaskedArray2D, MaskedArray2D) {
        self.unproject(&self.metrics.x_u(), &self.metrics.y_u())
    }

    /// `(lon_v, lat_v)`
    pub fn lonlat_v(&self) -> (MaskedArray2D, MaskedArray2D) {
        self.unproject(&self.metrics.x_v(), &self.metrics.y_v())
    }

    /// `(lon_psi, lat_psi)`
    pub fn lonlat_psi(&self) -> (MaskedArray2D, MaskedArray2D) {
        self.unproject(&self.metrics.x_psi(), &self.metrics.y_psi())
    }

    /// Coriolis parameter at cell centres, in 1/s.
    pub fn coriolis(&self) -> MaskedArray2D {
        let (_, lat_rho) = self.lonlat_rho();
        lat_rho.map(coriolis)
    }

    /// Mask cells whose centre falls inside a lon/lat polygon.
    ///
    /// The polygon is projected into the grid's planar system first.
    pub fn mask_polygon_geo(&mut self, lonlat: &Polygon, mask_value: f64) -> Result<usize> {
        let planar = lonlat.map(|lon, lat| self.projection.project(lon, lat));
        if planar.vertices().iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(GridError::value(
                "polygon falls outside the domain of the projection",
            ));
        }
        self.metrics.mask_polygon(&planar, mask_value)
    }
}
