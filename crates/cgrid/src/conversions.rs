//! Conversions between staggered point sets.

use nalgebra::DMatrix;

use crate::error::{GridError, Result};

/// Derive `(mask_u, mask_v, mask_psi)` from a 0/1 rho mask.
pub fn uvp_masks(rmask: &DMatrix<f64>) -> Result<(DMatrix<f64>, DMatrix<f64>, DMatrix<f64>)> {
    if rmask.iter().any(|v| *v != 0.0 && *v != 1.0) {
        return Err(GridError::value("rmask array must contain only ones and zeros"));
    }
    let (rows, cols) = rmask.shape();
    if rows == 0 || cols == 0 {
        return Err(GridError::shape("rmask must not be empty"));
    }

    let m = rmask;
    let umask = DMatrix::from_fn(rows, cols - 1, |j, i| m[(j, i)] * m[(j, i + 1)]);
    let vmask = DMatrix::from_fn(rows - 1, cols, |j, i| m[(j, i)] * m[(j + 1, i)]);
    let pmask = DMatrix::from_fn(rows - 1, cols - 1, |j, i| {
        m[(j, i)] * m[(j, i + 1)] * m[(j + 1, i)] * m[(j + 1, i + 1)]
    });
    Ok((umask, vmask, pmask))
}

/// Reconstruct vertex positions from cell centres and metrics.
///
/// Interior vertices are the mean of the four surrounding centres. Edge
/// vertices step outward from their inner neighbour by the mean cell width
/// (`1/pm` across east/west edges, `1/pn` across north/south edges) along
/// the mean cell angle. Corners close each corner cell so that its centroid
/// matches the given rho point.
///
/// All inputs share the rho shape `(M, L)`, with `M, L >= 2`; the result
/// has shape `(M + 1, L + 1)`.
pub fn rho_to_vert(
    x_rho: &DMatrix<f64>,
    y_rho: &DMatrix<f64>,
    pm: &DMatrix<f64>,
    pn: &DMatrix<f64>,
    angle: &DMatrix<f64>,
) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
    let shape = x_rho.shape();
    for (name, arr) in [("y_rho", y_rho), ("pm", pm), ("pn", pn), ("angle", angle)] {
        if arr.shape() != shape {
            return Err(GridError::shape(format!(
                "{} has shape {:?}, expected {:?}",
                name,
                arr.shape(),
                shape
            )));
        }
    }
    let (m, l) = shape;
    if m < 2 || l < 2 {
        return Err(GridError::shape(format!(
            "rho arrays must be at least 2x2, got {:?}",
            shape
        )));
    }

    let (rows, cols) = (m + 1, l + 1);
    let mut x = DMatrix::from_element(rows, cols, f64::NAN);
    let mut y = DMatrix::from_element(rows, cols, f64::NAN);

    for j in 1..rows - 1 {
        for i in 1..cols - 1 {
            x[(j, i)] = 0.25 * (x_rho[(j, i)] + x_rho[(j, i - 1)] + x_rho[(j - 1, i)] + x_rho[(j - 1, i - 1)]);
            y[(j, i)] = 0.25 * (y_rho[(j, i)] + y_rho[(j, i - 1)] + y_rho[(j - 1, i)] + y_rho[(j - 1, i - 1)]);
        }
    }

    // East and west sides: step by the mean dx along the angle.
    for j in 1..rows - 1 {
        for (edge, inner, c, sign) in [(cols - 1, cols - 2, l - 1, 1.0), (0, 1, 0, -1.0)] {
            let theta = 0.5 * (angle[(j - 1, c)] + angle[(j, c)]);
            let dx = 0.5 * (1.0 / pm[(j - 1, c)] + 1.0 / pm[(j, c)]);
            x[(j, edge)] = x[(j, inner)] + sign * dx * theta.cos();
            y[(j, edge)] = y[(j, inner)] + sign * dx * theta.sin();
        }
    }

    // North and south sides: step by the mean dy normal to the angle.
    for i in 1..cols - 1 {
        for (edge, inner, r, sign) in [(rows - 1, rows - 2, m - 1, 1.0), (0, 1, 0, -1.0)] {
            let theta = 0.5 * (angle[(r, i - 1)] + angle[(r, i)]);
            let dy = 0.5 * (1.0 / pn[(r, i - 1)] + 1.0 / pn[(r, i)]);
            x[(edge, i)] = x[(inner, i)] - sign * dy * theta.sin();
            y[(edge, i)] = y[(inner, i)] + sign * dy * theta.cos();
        }
    }

    // Corners
    let (lr, lc) = (rows - 1, cols - 1);
    for (arr, rho) in [(&mut x, x_rho), (&mut y, y_rho)] {
        arr[(0, 0)] = 4.0 * rho[(0, 0)] - arr[(1, 0)] - arr[(0, 1)] - arr[(1, 1)];
        arr[(lr, 0)] = 4.0 * rho[(m - 1, 0)] - arr[(lr - 1, 0)] - arr[(lr, 1)] - arr[(lr - 1, 1)];
        arr[(0, lc)] = 4.0 * rho[(0, l - 1)] - arr[(0, lc - 1)] - arr[(1, lc)] - arr[(1, lc - 1)];
        arr[(lr, lc)] =
            4.0 * rho[(m - 1, l - 1)] - arr[(lr - 1, lc - 1)] - arr[(lr - 1, lc)] - arr[(lr, lc - 1)];
    }

    Ok((x, y))
}
