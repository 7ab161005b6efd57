//! Shared test utilities for the cgrid workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float and matrix assertions
//! - Vertex grid generators
//! - Reference grids with known derived quantities
//! - Throwaway solver scripts for subprocess tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_matrix_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod scripts;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use scripts::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Compare a matrix against nested reference rows.
///
/// `actual` must provide `nrows()`, `ncols()` and `(row, col)` indexing
/// (a `nalgebra::DMatrix<f64>` does). A NaN in `expected` only matches a NaN
/// in `actual`, which is how masked entries show up once filled.
///
/// ```ignore
/// assert_matrix_approx_eq!(grid.x_rho().filled(f64::NAN), fixtures::BASIC_X_RHO, 1.5e-2);
/// ```
#[macro_export]
macro_rules! assert_matrix_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        match (&$actual, &$expected) {
            (actual, expected) => {
                let epsilon: f64 = $epsilon as f64;
                assert_eq!(
                    (actual.nrows(), actual.ncols()),
                    (expected.len(), expected.first().map_or(0, |row| row.len())),
                    "matrix shape mismatch"
                );
                for (r, row) in expected.iter().enumerate() {
                    for (c, want) in row.iter().enumerate() {
                        let want: f64 = *want;
                        let got: f64 = actual[(r, c)];
                        let ok = if want.is_nan() {
                            got.is_nan()
                        } else {
                            (got - want).abs() <= epsilon
                        };
                        if !ok {
                            panic!(
                                "assertion failed at [{}, {}]: `{:?}` != `{:?}` within `{:?}`",
                                r, c, got, want, epsilon
                            );
                        }
                    }
                }
            }
        }
    };
}
