//! Lambert Conformal Conic projection.
//!
//! A conformal projection, so grid angles measured in the projected plane
//! are true angles. It maps a cone tangent or secant to a spherical Earth
//! onto a flat plane.
//!
//! The projection parameters include:
//! - Origin latitude (lat0) and central meridian (lon0)
//! - Standard parallel(s): latin1 and latin2 (can be equal for tangent cone)
//! - False easting/northing added to the projected coordinates

use std::f64::consts::PI;

use crate::transform::wrap_pi;
use crate::{Projection, ProjectionError, Result};

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Earth radius (meters)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Mean Earth radius used by the spherical form.
    pub const EARTH_RADIUS: f64 = 6_371_229.0;

    /// Create a projection from parameters in degrees.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of origin
    /// * `lon0_deg` - Central meridian
    /// * `latin1_deg` - First standard parallel
    /// * `latin2_deg` - Second standard parallel
    pub fn new(lat0_deg: f64, lon0_deg: f64, latin1_deg: f64, latin2_deg: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latin1_deg) || !(-90.0..=90.0).contains(&latin2_deg) {
            return Err(ProjectionError::invalid_parameter(
                "latin",
                "standard parallels must be within [-90, 90]",
            ));
        }
        if (latin1_deg + latin2_deg).abs() < 1e-10 {
            return Err(ProjectionError::invalid_parameter(
                "latin",
                "standard parallels must not be symmetric about the equator",
            ));
        }

        let to_rad = PI / 180.0;
        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = Self::EARTH_RADIUS * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            latin1,
            latin2,
            false_easting: 0.0,
            false_northing: 0.0,
            earth_radius: Self::EARTH_RADIUS,
            n,
            f,
            rho0,
        })
    }

    /// Set the false easting and northing.
    pub fn with_false_origin(mut self, easting: f64, northing: f64) -> Self {
        self.false_easting = easting;
        self.false_northing = northing;
        self
    }

    /// Cone constant of the projection.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn rho(&self, lat: f64) -> f64 {
        self.earth_radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n)
    }
}

impl Projection for LambertConformal {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        let rho = self.rho(lat);
        let theta = self.n * wrap_pi(lon - self.lon0);

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let dy = self.rho0 - y;
        let mut rho = (x * x + dy * dy).sqrt();
        let (xs, dys) = if self.n < 0.0 {
            rho = -rho;
            (-x, -dy)
        } else {
            (x, dy)
        };

        let theta = xs.atan2(dys);
        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lon.to_degrees(), lat.to_degrees())
    }
}
