//! Reference ellipsoids.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ProjectionError;

/// An ellipsoid of revolution described by its semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major (equatorial) axis in meters
    pub a: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84, the default for lon/lat boundaries.
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// GRS80.
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    /// A sphere with the mean Earth radius.
    pub const SPHERE: Ellipsoid = Ellipsoid {
        a: 6_371_229.0,
        f: 0.0,
    };

    /// Semi-minor (polar) axis in meters.
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Second eccentricity squared.
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl FromStr for Ellipsoid {
    type Err = ProjectionError;

    /// Parse an ellipsoid name (case-insensitive), e.g. `"WGS84"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WGS84" | "WGS-84" => Ok(Self::WGS84),
            "GRS80" => Ok(Self::GRS80),
            "SPHERE" => Ok(Self::SPHERE),
            _ => Err(ProjectionError::UnknownEllipsoid(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_axes() {
        let e = Ellipsoid::WGS84;
        assert!((e.b() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.e2() - 0.006_694_379_990_14).abs() < 1e-12);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("wgs84".parse::<Ellipsoid>().unwrap(), Ellipsoid::WGS84);
        assert_eq!("GRS80".parse::<Ellipsoid>().unwrap(), Ellipsoid::GRS80);
        assert!("clarke1866".parse::<Ellipsoid>().is_err());
    }
}
