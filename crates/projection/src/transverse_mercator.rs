//! Transverse Mercator and UTM.
//!
//! Series expansion about the central meridian (Snyder, "Map Projections:
//! A Working Manual", eqs. 8-9 to 8-25). Accurate to well under a meter
//! within a few degrees of the central meridian.

use crate::{Ellipsoid, Projection, ProjectionError, Result};

/// Transverse Mercator on an ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct TransverseMercator {
    /// Central meridian in degrees
    pub central_meridian: f64,
    /// Scale factor at the central meridian
    pub scale_factor: f64,
    /// False easting in meters
    pub false_easting: f64,
    /// False northing in meters
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
}

impl TransverseMercator {
    /// UTM scale factor at the central meridian.
    pub const UTM_SCALE: f64 = 0.9996;

    pub fn new(central_meridian: f64, scale_factor: f64, ellipsoid: Ellipsoid) -> Self {
        Self {
            central_meridian,
            scale_factor,
            false_easting: 0.0,
            false_northing: 0.0,
            ellipsoid,
        }
    }

    /// UTM projection for a zone (1-60) and hemisphere on WGS84.
    pub fn utm(zone: u8, northern: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::invalid_parameter(
                "zone",
                format!("UTM zone must be 1-60, got {}", zone),
            ));
        }
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
        Ok(Self {
            central_meridian,
            scale_factor: Self::UTM_SCALE,
            false_easting: 500_000.0,
            false_northing: if northern { 0.0 } else { 10_000_000.0 },
            ellipsoid: Ellipsoid::WGS84,
        })
    }

    /// Meridian arc length from the equator to `lat` (radians).
    fn meridian_arc(&self, lat: f64) -> f64 {
        let e2 = self.ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.ellipsoid.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }
}

impl Projection for TransverseMercator {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let ep2 = self.ellipsoid.ep2();
        let k0 = self.scale_factor;

        let phi = lat.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let big_a = (lon - self.central_meridian).to_radians() * cos_phi;
        let m = self.meridian_arc(phi);

        let x = k0
            * n
            * (big_a
                + (1.0 - t + c) * big_a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * big_a.powi(5) / 120.0)
            + self.false_easting;

        let y = k0
            * (m + n
                * tan_phi
                * (big_a.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * big_a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * big_a.powi(6)
                        / 720.0))
            + self.false_northing;

        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let ep2 = self.ellipsoid.ep2();
        let k0 = self.scale_factor;

        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let root = (1.0 - e2).sqrt();
        let e1 = (1.0 - root) / (1.0 + root);

        let m = y / k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));

        // Footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();
        let w = 1.0 - e2 * sin1 * sin1;
        let n1 = a / w.sqrt();
        let r1 = a * (1.0 - e2) / w.powf(1.5);
        let t1 = tan1 * tan1;
        let c1 = ep2 * cos1 * cos1;
        let d = x / (n1 * k0);

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let dlon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos1;

        (self.central_meridian + dlon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_utm_zone_10_known_point() {
        let utm = TransverseMercator::utm(10, true).unwrap();
        assert_approx_eq!(utm.central_meridian, -123.0, 1e-12);

        let (x, y) = utm.project(-122.7, 44.5);
        assert_approx_eq!(x, 523_849.0, 5.0);
        assert_approx_eq!(y, 4_927_453.0, 5.0);
    }

    #[test]
    fn test_central_meridian_has_false_easting() {
        let utm = TransverseMercator::utm(33, true).unwrap();
        let (x, _) = utm.project(15.0, 60.0);
        assert_approx_eq!(x, 500_000.0, 1e-6);
    }

    #[test]
    fn test_roundtrip_both_hemispheres() {
        for &(zone, northern, lon, lat) in &[
            (10u8, true, -121.9, 37.2),
            (32, true, 8.1, 61.4),
            (56, false, 151.2, -33.9),
        ] {
            let utm = TransverseMercator::utm(zone, northern).unwrap();
            let (x, y) = utm.project(lon, lat);
            let (lon2, lat2) = utm.unproject(x, y);
            assert_approx_eq!(lon2, lon, 1e-7);
            assert_approx_eq!(lat2, lat, 1e-7);
        }
    }

    #[test]
    fn test_rejects_bad_zone() {
        assert!(TransverseMercator::utm(0, true).is_err());
        assert!(TransverseMercator::utm(61, false).is_err());
    }
}
