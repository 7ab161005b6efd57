//! Boundary polygons annotated with turning values.

use serde::{Deserialize, Serialize};

use projection::Projection;

use crate::error::{GridError, Result};

/// A closed boundary with one turning value (β) per point.
///
/// β is +1 for a convex corner, −1 for a concave one and 0 elsewhere; a
/// boundary that maps to a rectangle has β summing to 4. `ul_idx` names the
/// point that becomes the upper-left corner of the generated grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundaryRepr", into = "BoundaryRepr")]
pub struct Boundary {
    x: Vec<f64>,
    y: Vec<f64>,
    beta: Vec<f64>,
    ul_idx: usize,
}

/// Unvalidated boundary as it appears in files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoundaryRepr {
    x: Vec<f64>,
    y: Vec<f64>,
    beta: Vec<f64>,
    #[serde(default)]
    ul_idx: usize,
}

impl TryFrom<BoundaryRepr> for Boundary {
    type Error = GridError;

    fn try_from(repr: BoundaryRepr) -> Result<Self> {
        Self::new(repr.x, repr.y, repr.beta, repr.ul_idx)
    }
}

impl From<Boundary> for BoundaryRepr {
    fn from(boundary: Boundary) -> Self {
        Self {
            x: boundary.x,
            y: boundary.y,
            beta: boundary.beta,
            ul_idx: boundary.ul_idx,
        }
    }
}

impl Boundary {
    /// Allowed deviation of `sum(beta)` from 4.
    pub const BETA_SUM_TOLERANCE: f64 = 1e-9;

    /// Validate and build a boundary.
    pub fn new(x: Vec<f64>, y: Vec<f64>, beta: Vec<f64>, ul_idx: usize) -> Result<Self> {
        if x.len() != y.len() || x.len() != beta.len() {
            return Err(GridError::shape(format!(
                "boundary x, y and beta must have equal lengths, got {}, {} and {}",
                x.len(),
                y.len(),
                beta.len()
            )));
        }
        if x.len() < 3 {
            return Err(GridError::value(format!(
                "boundary must contain at least 3 points, got {}",
                x.len()
            )));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(GridError::value("boundary coordinates must be finite"));
        }
        if let Some(b) = beta
            .iter()
            .find(|b| ![-1.0, 0.0, 1.0].iter().any(|t| (*b - t).abs() <= Self::BETA_SUM_TOLERANCE))
        {
            return Err(GridError::value(format!(
                "beta values must be -1, 0 or 1, got {}",
                b
            )));
        }
        let sum: f64 = beta.iter().sum();
        if (sum - 4.0).abs() > Self::BETA_SUM_TOLERANCE {
            return Err(GridError::value(format!("sum of beta must be 4.0, got {}", sum)));
        }
        if ul_idx >= x.len() {
            return Err(GridError::value(format!(
                "ul_idx {} is out of range for {} boundary points",
                ul_idx,
                x.len()
            )));
        }
        Ok(Self { x, y, beta, ul_idx })
    }

    /// Project a lon/lat boundary into planar coordinates.
    pub fn reprojected(&self, projection: &dyn Projection) -> Result<Self> {
        let (x, y) = projection.project_all(&self.x, &self.y);
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(GridError::value(
                "boundary falls outside the domain of the projection",
            ));
        }
        Ok(Self {
            x,
            y,
            beta: self.beta.clone(),
            ul_idx: self.ul_idx,
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    pub fn ul_idx(&self) -> usize {
        self.ul_idx
    }

    /// Number of boundary points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::{Identity, Mercator};
    use test_utils::{BOUNDARY_BETA, BOUNDARY_X, BOUNDARY_Y};

    fn pentagon(beta: &[f64]) -> Result<Boundary> {
        Boundary::new(BOUNDARY_X.to_vec(), BOUNDARY_Y.to_vec(), beta.to_vec(), 0)
    }

    #[test]
    fn test_valid_boundary() {
        let boundary = pentagon(&BOUNDARY_BETA).unwrap();
        assert_eq!(boundary.len(), 5);
        assert_eq!(boundary.ul_idx(), 0);
    }

    #[test]
    fn test_beta_sum_rejected() {
        let err = pentagon(&[1.0, 1.0, 0.0, 1.0, 0.5]).unwrap_err();
        assert!(matches!(err, GridError::Value(_)));

        let err = pentagon(&[1.0, 1.0, 0.0, 1.0, 0.0]).unwrap_err();
        assert!(err.to_string().contains("sum of beta"));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Boundary::new(vec![0.0, 1.0, 1.0], vec![0.0, 0.0], vec![1.0, 1.0, 1.0], 0)
            .unwrap_err();
        assert!(matches!(err, GridError::Shape(_)));
    }

    #[test]
    fn test_ul_idx_out_of_range() {
        let err = Boundary::new(BOUNDARY_X.to_vec(), BOUNDARY_Y.to_vec(), BOUNDARY_BETA.to_vec(), 5)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_reprojection() {
        let boundary = pentagon(&BOUNDARY_BETA).unwrap();
        assert_eq!(boundary.reprojected(&Identity).unwrap(), boundary);

        let merc = boundary.reprojected(&Mercator::default()).unwrap();
        assert!(merc.x()[2] > 200_000.0);
        assert_eq!(merc.beta(), boundary.beta());
    }

    #[test]
    fn test_deserialize_validates() {
        let boundary: Boundary = serde_json::from_str(
            r#"{"x": [0, 1, 2, 1, 0], "y": [0, 0, 0.5, 1, 1], "beta": [1, 1, 0, 1, 1]}"#,
        )
        .unwrap();
        assert_eq!(boundary, pentagon(&BOUNDARY_BETA).unwrap());

        let err = serde_json::from_str::<Boundary>(
            r#"{"x": [0, 1], "y": [0, 0, 1], "beta": [1, 1, 1.5], "ul_idx": 9}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("equal lengths"));

        let err = serde_json::from_str::<Boundary>(
            r#"{"x": [0, 1, 2, 1, 0], "y": [0, 0, 0.5, 1, 1], "beta": [1, 1, 0, 1, 0]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("sum of beta"));
    }

    #[test]
    fn test_serialize_round_trips() {
        let boundary = pentagon(&BOUNDARY_BETA).unwrap();
        let json = serde_json::to_string(&boundary).unwrap();
        let back: Boundary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, boundary);
    }
}
