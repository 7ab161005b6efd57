//! Ellipsoidal geodesics.
//!
//! The inverse problem (distance and azimuths between two points) is solved
//! with Vincenty's iterative formulae, which are accurate to well under a
//! millimeter on WGS84 for all but nearly antipodal point pairs.

use std::fmt::Debug;

use crate::Ellipsoid;

/// Solution of the inverse geodesic problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicInverse {
    /// Forward azimuth at the first point, degrees clockwise from north
    pub az1: f64,
    /// Back azimuth at the second point (pointing to the first), degrees
    pub az2: f64,
    /// Distance along the geodesic in meters
    pub distance: f64,
}

/// A geodesy service able to measure great-circle distances.
pub trait Geodesic: Debug + Send + Sync {
    /// Solve the inverse problem between (lon1, lat1) and (lon2, lat2) in degrees.
    ///
    /// Returns `None` when the solution cannot be determined (e.g. the
    /// iteration does not converge for nearly antipodal points, or an input
    /// is NaN).
    fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<GeodesicInverse>;

    /// Geodesic distance in meters, `None` when undetermined.
    fn distance(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<f64> {
        self.inverse(lon1, lat1, lon2, lat2).map(|g| g.distance)
    }
}

/// Vincenty inverse solution on an ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vincenty {
    pub ellipsoid: Ellipsoid,
}

impl Vincenty {
    const MAX_ITER: usize = 200;
    const TOLERANCE: f64 = 1e-12;

    /// Create a solver on the given ellipsoid.
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    /// Solver on WGS84.
    pub fn wgs84() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl Geodesic for Vincenty {
    fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<GeodesicInverse> {
        if !(lon1.is_finite() && lat1.is_finite() && lon2.is_finite() && lat2.is_finite()) {
            return None;
        }

        let a = self.ellipsoid.a;
        let f = self.ellipsoid.f;
        let b = self.ellipsoid.b();

        let l = (lon2 - lon1).to_radians();

        // Reduced latitudes
        let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
        let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        let mut sin_lambda;
        let mut cos_lambda;
        let mut sin_sigma;
        let mut cos_sigma;
        let mut sigma;
        let mut cos_sq_alpha;
        let mut cos_2sigma_m;
        let mut converged = false;

        let mut iter = 0;
        loop {
            (sin_lambda, cos_lambda) = lambda.sin_cos();

            sin_sigma = ((cos_u2 * sin_lambda).powi(2)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
            .sqrt();

            if sin_sigma == 0.0 {
                // Coincident points
                return Some(GeodesicInverse {
                    az1: 0.0,
                    az2: 180.0,
                    distance: 0.0,
                });
            }

            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            sigma = sin_sigma.atan2(cos_sigma);

            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

            // Equatorial lines have cos_sq_alpha == 0
            cos_2sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };

            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

            let lambda_prev = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            iter += 1;
            if (lambda - lambda_prev).abs() < Self::TOLERANCE {
                converged = true;
                break;
            }
            if iter >= Self::MAX_ITER {
                break;
            }
        }

        if !converged {
            return None;
        }

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a =
            1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        let distance = b * big_a * (sigma - delta_sigma);

        let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        let alpha2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

        Some(GeodesicInverse {
            az1: normalize_azimuth(alpha1.to_degrees()),
            az2: normalize_azimuth(alpha2.to_degrees() + 180.0),
            distance,
        })
    }
}

/// Normalize an azimuth into (-180, 180].
fn normalize_azimuth(mut az: f64) -> f64 {
    while az > 180.0 {
        az -= 360.0;
    }
    while az <= -180.0 {
        az += 360.0;
    }
    az
}
