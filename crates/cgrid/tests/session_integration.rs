//! End-to-end sessions against reference grids for the pentagon boundary
//! `x=[0,1,2,1,0], y=[0,0,0.5,1,1], beta=[1,1,0,1,1]`.

use std::sync::Arc;

use nalgebra::DMatrix;
use projection::{Identity, Mercator, Projection};

use cgrid::{
    Axis, Boundary, Focus, GridError, GridGenerationSession, Polygon, ScriptedSolver,
};
use test_utils::fixtures::*;
use test_utils::{assert_approx_eq, assert_matrix_approx_eq};

fn pentagon() -> Boundary {
    Boundary::new(
        BOUNDARY_X.to_vec(),
        BOUNDARY_Y.to_vec(),
        BOUNDARY_BETA.to_vec(),
        0,
    )
    .unwrap()
}

fn reference_solver() -> Arc<ScriptedSolver> {
    let (ny, nx) = BASIC_SHAPE;
    let (fy, fx) = FOCUSED_SHAPE;
    Arc::new(
        ScriptedSolver::new()
            .with_grid(ny, nx, flatten(&BASIC_X), flatten(&BASIC_Y))
            .with_grid(fy, fx, flatten(&FOCUSED_X), flatten(&FOCUSED_Y)),
    )
}

fn basic_session(solver: Arc<ScriptedSolver>) -> GridGenerationSession {
    let (ny, nx) = BASIC_SHAPE;
    GridGenerationSession::builder(pentagon(), ny, nx)
        .solver(solver)
        .build()
        .unwrap()
}

#[test]
fn test_basic_vertices() {
    let session = basic_session(reference_solver());
    let grid = session.grid().unwrap();

    assert_eq!(grid.shape(), (10, 5));
    assert_approx_eq!(grid.x_vert().get(0, 0).unwrap(), 1.0, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.x_vert().data(), BASIC_X, 0.0);
    assert_matrix_approx_eq!(grid.y_vert().data(), BASIC_Y, 0.0);
}

#[test]
fn test_basic_point_sets() {
    let session = basic_session(reference_solver());
    let grid = session.grid().unwrap();

    assert_matrix_approx_eq!(grid.x_rho().data(), BASIC_X_RHO, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.y_rho().data(), BASIC_Y_RHO, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.x_u().data(), BASIC_X_U, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.y_u().data(), BASIC_Y_U, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.x_v().data(), BASIC_X_V, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.y_v().data(), BASIC_Y_V, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.x_psi().data(), BASIC_X_PSI, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.y_psi().data(), BASIC_Y_PSI, REFERENCE_TOLERANCE);
}

#[test]
fn test_psi_is_interior_of_vertices() {
    let session = basic_session(reference_solver());
    let grid = session.grid().unwrap();

    let (rows, cols) = grid.shape();
    let x_psi = grid.x_psi();
    let y_psi = grid.y_psi();
    for j in 0..rows - 2 {
        for i in 0..cols - 2 {
            assert_eq!(x_psi.get(j, i), grid.x_vert().get(j + 1, i + 1));
            assert_eq!(y_psi.get(j, i), grid.y_vert().get(j + 1, i + 1));
        }
    }
}

#[test]
fn test_island_mask() {
    let mut session = basic_session(reference_solver());
    let island = Polygon::new(ISLAND.to_vec()).unwrap();

    let grid = session.grid_mut().unwrap();
    grid.mask_polygon(&island, 0.0).unwrap();
    assert_matrix_approx_eq!(grid.mask_rho(), ISLAND_MASK_RHO, 0.0);

    // Sub-masks follow mask_rho.
    let mask_u = grid.mask_u();
    assert_eq!(mask_u[(1, 2)], 0.0);
    assert_eq!(mask_u[(1, 1)], 1.0);
}

#[test]
fn test_focused_session() {
    let solver = reference_solver();
    let mut focus = Focus::new();
    for (axis, pos, factor, extent) in FOCUSED_FOCI {
        let axis: Axis = axis.to_string().parse().unwrap();
        focus.add_focus(pos, axis, factor, extent).unwrap();
    }

    let (ny, nx) = FOCUSED_SHAPE;
    let session = GridGenerationSession::builder(pentagon(), ny, nx)
        .solver(solver.clone())
        .focus(focus)
        .build()
        .unwrap();

    let grid = session.grid().unwrap();
    assert_matrix_approx_eq!(grid.x_rho().data(), FOCUSED_X_RHO, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(grid.y_rho().data(), FOCUSED_Y_RHO, REFERENCE_TOLERANCE);

    let calls = solver.calls();
    assert_eq!(calls.len(), 1);
    let (sx, sy) = calls[0].seed.clone().unwrap();
    assert_eq!(sx.shape(), (ny, nx));
    assert_approx_eq!(sx[(3, 1)], 0.1265, 1e-3);
    // Contraction at x = 0.5 pulls columns toward the middle.
    assert!(sx[(0, 5)] - sx[(0, 4)] < 1.0 / (nx - 1) as f64);
    // Expansion at y = 0.75 spreads rows there.
    assert!(sy[(6, 0)] - sy[(5, 0)] > 1.0 / (ny - 1) as f64);
}

#[test]
fn test_bad_beta_constructs_nothing() {
    let result = Boundary::new(
        BOUNDARY_X.to_vec(),
        BOUNDARY_Y.to_vec(),
        vec![1.0, 1.0, 0.0, 1.0, 0.5],
        0,
    );
    assert!(matches!(result, Err(GridError::Value(_))));
    assert!(result.unwrap_err().is_validation());
}

#[test]
fn test_regenerate_after_shape_change() {
    let solver = reference_solver();
    let mut session = basic_session(solver.clone());
    session.set_shape(FOCUSED_SHAPE.0, FOCUSED_SHAPE.1).unwrap();
    assert!(!session.is_built());
    session.generate().unwrap();

    assert_eq!(session.generation(), 2);
    assert_eq!(session.grid().unwrap().shape(), FOCUSED_SHAPE);
    assert_eq!(solver.call_count(), 2);
    // A fresh grid starts with a fresh mask.
    assert!(session.grid().unwrap().mask_rho().iter().all(|&m| m == 1.0));
}

#[test]
fn test_mask_does_not_survive_regeneration() {
    let mut session = basic_session(reference_solver());
    let island = Polygon::new(ISLAND.to_vec()).unwrap();
    session.grid_mut().unwrap().mask_polygon(&island, 0.0).unwrap();

    session.regenerate().unwrap();
    assert!(session.grid().unwrap().mask_rho().iter().all(|&m| m == 1.0));
}

#[test]
fn test_missing_vertex_masks_touching_cells() {
    let (ny, nx) = BASIC_SHAPE;
    let mut x = flatten(&BASIC_X);
    x[4 * nx + 2] = f64::NAN;
    let solver = Arc::new(ScriptedSolver::new().with_grid(ny, nx, x, flatten(&BASIC_Y)));

    let session = GridGenerationSession::builder(pentagon(), ny, nx)
        .solver(solver)
        .build()
        .unwrap();
    let grid = session.grid().unwrap();
    let mask = grid.mask_rho();

    for (j, i) in [(3, 1), (3, 2), (4, 1), (4, 2)] {
        assert_eq!(mask[(j, i)], 0.0, "cell ({}, {})", j, i);
    }
    assert_eq!(mask.iter().filter(|&&m| m == 0.0).count(), 4);

    let x_rho = grid.x_rho();
    assert!(x_rho.is_masked(3, 1));
    assert_approx_eq!(x_rho.get(0, 0).unwrap(), BASIC_X_RHO[0][0], REFERENCE_TOLERANCE);
}

#[test]
fn test_solver_failure_surfaces() {
    let solver = Arc::new(ScriptedSolver::failing("sigma iteration diverged"));
    let (ny, nx) = BASIC_SHAPE;
    let err = GridGenerationSession::builder(pentagon(), ny, nx)
        .solver(solver)
        .build()
        .unwrap_err();
    assert!(matches!(err, GridError::SolverFailed(_)));
}

#[test]
fn test_identity_geo_session() {
    let (ny, nx) = BASIC_SHAPE;
    let session = GridGenerationSession::builder(pentagon(), ny, nx)
        .solver(reference_solver())
        .projection(Arc::new(Identity))
        .use_gcdist(false)
        .build()
        .unwrap();

    let geo = session.geo_grid().unwrap();
    let (lon_rho, lat_rho) = geo.lonlat_rho();
    assert_matrix_approx_eq!(lon_rho.data(), BASIC_X_RHO, REFERENCE_TOLERANCE);
    assert_matrix_approx_eq!(lat_rho.data(), BASIC_Y_RHO, REFERENCE_TOLERANCE);
    assert!(!geo.use_gcdist());
}

#[test]
fn test_mercator_geo_session() {
    let mercator = Arc::new(Mercator::default());
    let lon: Vec<f64> = BOUNDARY_X.iter().map(|x| -70.0 + x).collect();
    let lat: Vec<f64> = BOUNDARY_Y.iter().map(|y| 41.0 + y).collect();
    let boundary = Boundary::new(lon, lat, BOUNDARY_BETA.to_vec(), 0).unwrap();

    // Solver output lives in the projected plane.
    let (ny, nx) = (3, 4);
    let lon_vert = DMatrix::from_fn(ny, nx, |_, i| -70.0 + i as f64 * 0.5);
    let lat_vert = DMatrix::from_fn(ny, nx, |j, _| 41.0 + j as f64 * 0.5);
    let mut px = Vec::new();
    let mut py = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let (x, y) = mercator.project(lon_vert[(j, i)], lat_vert[(j, i)]);
            px.push(x);
            py.push(y);
        }
    }
    let solver = Arc::new(ScriptedSolver::new().with_grid(ny, nx, px, py));

    let mut session = GridGenerationSession::builder(boundary, ny, nx)
        .solver(solver)
        .projection(mercator.clone())
        .build()
        .unwrap();

    let (bx, by) = mercator.project(-70.0, 41.0);
    assert_approx_eq!(session.boundary().x()[0], bx, 1e-6);
    assert_approx_eq!(session.boundary().y()[0], by, 1e-6);

    let geo = session.geo_grid().unwrap();
    assert!(geo.use_gcdist());
    for j in 0..ny {
        for i in 0..nx {
            assert_approx_eq!(geo.lon_vert().get(j, i).unwrap(), lon_vert[(j, i)], 1e-9);
            assert_approx_eq!(geo.lat_vert().get(j, i).unwrap(), lat_vert[(j, i)], 1e-9);
        }
    }

    // Half a degree of latitude is about 55.5 km.
    assert_approx_eq!(geo.metrics().dy().get(0, 0).unwrap(), 55_500.0, 100.0);
    assert!(geo.coriolis().get(0, 0).unwrap() > 0.0);

    let patch = Polygon::new(vec![(-69.9, 41.1), (-69.1, 41.1), (-69.1, 41.9), (-69.9, 41.9)]).unwrap();
    let inside = session.geo_grid_mut().unwrap().mask_polygon_geo(&patch, 0.0).unwrap();
    assert_eq!(inside, 4);
    assert_eq!(session.grid().unwrap().mask_rho()[(0, 2)], 1.0);
}
