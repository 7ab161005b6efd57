//! Boundary-to-grid solver boundary.
//!
//! The conformal mapping itself lives outside this crate. A [`GridSolver`]
//! takes the boundary, node counts and tunables, and hands back a flat
//! buffer of vertices or a failure.

mod command;

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;

use nalgebra::DMatrix;

use crate::boundary::Boundary;
use crate::config::SolverOptions;
use crate::error::{GridError, Result};

pub use command::CommandSolver;

/// Everything a solver needs for one call.
#[derive(Debug, Clone, Copy)]
pub struct SolverRequest<'a> {
    pub boundary: &'a Boundary,
    /// Node count along y.
    pub ny: usize,
    /// Node count along x.
    pub nx: usize,
    /// Optional seed grid in normalised [0, 1] coordinates, shape `(ny, nx)`.
    pub seed: Option<(&'a DMatrix<f64>, &'a DMatrix<f64>)>,
    pub options: &'a SolverOptions,
}

/// Flat row-major solver output. NaN marks a missing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    pub ny: usize,
    pub nx: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl RawGrid {
    pub fn new(ny: usize, nx: usize, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { ny, nx, x, y }
    }

    /// Reshape into `(ny, nx)` arrays.
    pub fn into_arrays(self) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
        let expected = self.ny * self.nx;
        if self.x.len() != expected || self.y.len() != expected {
            return Err(GridError::shape(format!(
                "solver returned {} x and {} y values, expected {} for a {}x{} grid",
                self.x.len(),
                self.y.len(),
                expected,
                self.ny,
                self.nx
            )));
        }
        Ok((
            DMatrix::from_row_slice(self.ny, self.nx, &self.x),
            DMatrix::from_row_slice(self.ny, self.nx, &self.y),
        ))
    }

    /// Number of missing vertices.
    pub fn nan_count(&self) -> usize {
        self.x
            .iter()
            .zip(&self.y)
            .filter(|(x, y)| x.is_nan() || y.is_nan())
            .count()
    }
}

/// A boundary-to-grid solver.
///
/// Implementations must be stateless per call: a call either returns a
/// complete grid or fails, and holds nothing afterwards.
pub trait GridSolver: Debug + Send + Sync {
    fn solve(&self, request: &SolverRequest<'_>) -> Result<RawGrid>;
}

/// In-process solver that replays precomputed grids keyed by node counts.
///
/// Useful for exercising sessions without the external program.
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    grids: HashMap<(usize, usize), RawGrid>,
    failure: Option<String>,
    calls: Mutex<Vec<ScriptedCall>>,
}

/// What a [`ScriptedSolver`] was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedCall {
    pub ny: usize,
    pub nx: usize,
    pub seed: Option<(DMatrix<f64>, DMatrix<f64>)>,
    pub beta: Vec<f64>,
}

impl ScriptedSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row-major grid for its node counts.
    pub fn with_grid(mut self, ny: usize, nx: usize, x: Vec<f64>, y: Vec<f64>) -> Self {
        self.grids.insert((ny, nx), RawGrid::new(ny, nx, x, y));
        self
    }

    /// Fail every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl GridSolver for ScriptedSolver {
    fn solve(&self, request: &SolverRequest<'_>) -> Result<RawGrid> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ScriptedCall {
                ny: request.ny,
                nx: request.nx,
                seed: request.seed.map(|(x, y)| (x.clone(), y.clone())),
                beta: request.boundary.beta().to_vec(),
            });
        }

        if let Some(message) = &self.failure {
            return Err(GridError::solver_failed(message.clone()));
        }

        self.grids
            .get(&(request.ny, request.nx))
            .cloned()
            .ok_or_else(|| {
                GridError::solver_failed(format!(
                    "no scripted grid for {}x{} nodes",
                    request.ny, request.nx
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary() -> Boundary {
        Boundary::new(
            vec![0.0, 1.0, 2.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.5, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, 1.0, 1.0],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_into_arrays_is_row_major() {
        let raw = RawGrid::new(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], vec![0.0; 6]);
        let (x, y) = raw.into_arrays().unwrap();
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(x[(0, 2)], 2.0);
        assert_eq!(x[(1, 0)], 3.0);
        assert_eq!(y.shape(), (2, 3));
    }

    #[test]
    fn test_into_arrays_length_mismatch() {
        let raw = RawGrid::new(2, 3, vec![0.0; 5], vec![0.0; 6]);
        assert!(matches!(raw.into_arrays(), Err(GridError::Shape(_))));
    }

    #[test]
    fn test_nan_count() {
        let raw = RawGrid::new(1, 3, vec![0.0, f64::NAN, 1.0], vec![f64::NAN, f64::NAN, 0.0]);
        assert_eq!(raw.nan_count(), 2);
    }

    #[test]
    fn test_scripted_solver_replays_and_records() {
        let solver = ScriptedSolver::new().with_grid(2, 2, vec![0.0, 1.0, 0.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]);
        let boundary = boundary();
        let options = SolverOptions::default();
        let request = SolverRequest {
            boundary: &boundary,
            ny: 2,
            nx: 2,
            seed: None,
            options: &options,
        };

        let raw = solver.solve(&request).unwrap();
        assert_eq!(raw.x, vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(solver.call_count(), 1);
        assert_eq!(solver.calls()[0].beta, vec![1.0, 1.0, 0.0, 1.0, 1.0]);

        let request = SolverRequest { ny: 3, ..request };
        assert!(matches!(solver.solve(&request), Err(GridError::SolverFailed(_))));
        assert_eq!(solver.call_count(), 2);
    }

    #[test]
    fn test_scripted_failure() {
        let solver = ScriptedSolver::failing("did not converge");
        let boundary = boundary();
        let options = SolverOptions::default();
        let request = SolverRequest {
            boundary: &boundary,
            ny: 2,
            nx: 2,
            seed: None,
            options: &options,
        };
        let err = solver.solve(&request).unwrap_err();
        assert!(err.to_string().contains("did not converge"));
    }
}
