//! Mercator projection on a sphere.
//!
//! Conformal, with the familiar stretch toward the poles. Latitudes of
//! exactly ±90° have no finite image and project to NaN.

use crate::transform::wrap_pi;
use crate::{Ellipsoid, Projection};

/// Spherical Mercator with a configurable central meridian.
#[derive(Debug, Clone, Copy)]
pub struct Mercator {
    /// Central meridian in degrees
    pub lon0: f64,
    /// Sphere radius in meters
    pub radius: f64,
}

impl Mercator {
    /// Mercator on the semi-major axis of `ellipsoid`.
    pub fn new(lon0: f64, ellipsoid: Ellipsoid) -> Self {
        Self {
            lon0,
            radius: ellipsoid.a,
        }
    }
}

impl Default for Mercator {
    fn default() -> Self {
        Self::new(0.0, Ellipsoid::WGS84)
    }
}

/// Latitude in radians to the Mercator ordinate on the unit sphere.
#[inline]
fn lat_to_merc_y(lat_rad: f64) -> f64 {
    lat_rad.tan().asinh()
}

/// Mercator ordinate on the unit sphere back to latitude in degrees.
#[inline]
fn merc_y_to_lat(merc_y: f64) -> f64 {
    merc_y.sinh().atan().to_degrees()
}

impl Projection for Mercator {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        if lat.abs() >= 90.0 {
            return (f64::NAN, f64::NAN);
        }
        let dlon = wrap_pi((lon - self.lon0).to_radians());
        (
            self.radius * dlon,
            self.radius * lat_to_merc_y(lat.to_radians()),
        )
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = self.lon0 + (x / self.radius).to_degrees();
        (lon, merc_y_to_lat(y / self.radius))
    }
}
