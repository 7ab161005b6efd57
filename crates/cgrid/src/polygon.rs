//! Polygons and point-in-polygon tests for cell masking.

use crate::error::{GridError, Result};

/// A simple polygon in the grid's coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    /// Build from vertex pairs; at least 3 are required.
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GridError::value(format!(
                "polygon must contain at least 3 points, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Build from rows of exactly two columns.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| r.len() != 2) {
            return Err(GridError::value(format!(
                "polygon must have two columns of points, found a row with {}",
                row.len()
            )));
        }
        Self::new(rows.iter().map(|r| (r[0], r[1])).collect())
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Apply `f` to every vertex.
    pub fn map(&self, f: impl Fn(f64, f64) -> (f64, f64)) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&(x, y)| f(x, y)).collect(),
        }
    }

    /// Even-odd ray casting.
    ///
    /// Edge crossings are half-open in y, so a point on a left or bottom
    /// edge counts as inside and one on a right or top edge as outside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];

            if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

impl TryFrom<Vec<(f64, f64)>> for Polygon {
    type Error = GridError;

    fn try_from(vertices: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(vertices)
    }
}
