//! The projection service used by geographic grids.

use std::fmt::Debug;

/// A forward/inverse map projection between lon/lat degrees and planar meters.
///
/// Implementations must be pure: the same input always maps to the same
/// output, so derived grid quantities are reproducible.
pub trait Projection: Debug + Send + Sync {
    /// Convert geographic coordinates (lon, lat in degrees) to planar (x, y).
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Convert planar (x, y) back to geographic (lon, lat in degrees).
    fn unproject(&self, x: f64, y: f64) -> (f64, f64);

    /// Project parallel slices of longitudes and latitudes.
    fn project_all(&self, lon: &[f64], lat: &[f64]) -> (Vec<f64>, Vec<f64>) {
        lon.iter()
            .zip(lat)
            .map(|(&lon, &lat)| self.project(lon, lat))
            .unzip()
    }

    /// Unproject parallel slices of x and y.
    fn unproject_all(&self, x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        x.iter()
            .zip(y)
            .map(|(&x, &y)| self.unproject(x, y))
            .unzip()
    }
}

/// Pass-through projection: coordinates are already planar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

/// Wrap a longitude difference into [-π, π].
#[inline]
pub(crate) fn wrap_pi(mut dlon: f64) -> f64 {
    use std::f64::consts::PI;
    while dlon > PI {
        dlon -= 2.0 * PI;
    }
    while dlon < -PI {
        dlon += 2.0 * PI;
    }
    dlon
}
