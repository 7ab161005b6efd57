//! `CommandSolver` against throwaway solver scripts.
#![cfg(unix)]

use std::sync::Arc;

use cgrid::{
    uniform_grid, Boundary, CommandSolver, GridError, GridGenerationSession, GridSolver,
    GridgenConfig, SolverOptions, SolverRequest,
};
use test_utils::fixtures::{BOUNDARY_BETA, BOUNDARY_X, BOUNDARY_Y};
use test_utils::shell_script;

fn pentagon() -> Boundary {
    Boundary::new(
        BOUNDARY_X.to_vec(),
        BOUNDARY_Y.to_vec(),
        BOUNDARY_BETA.to_vec(),
        0,
    )
    .unwrap()
}

const UNIT_SQUARE_REPLY: &str = r#"cat > /dev/null
echo '{"x": [0.0, 1.0, 0.0, 1.0], "y": [0.0, 0.0, 1.0, 1.0]}'
"#;

#[test]
fn test_solve_reads_reply() {
    let script = shell_script("gridgen", UNIT_SQUARE_REPLY);
    let solver = CommandSolver::new(script.path());
    let boundary = pentagon();
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
    assert_eq!(raw.y, vec![0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_request_reaches_stdin() {
    let script = shell_script(
        "gridgen",
        r#"cat > "$(dirname "$0")/request.json"
echo '{"x": [0.0, 1.0, 0.0, 1.0], "y": [0.0, 0.0, 1.0, 1.0]}'
"#,
    );
    let solver = CommandSolver::new(script.path());
    let boundary = pentagon();
    let options = SolverOptions {
        nnodes: 20,
        ..Default::default()
    };
    let request = SolverRequest {
        boundary: &boundary,
        ny: 2,
        nx: 2,
        seed: None,
        options: &options,
    };
    solver.solve(&request).unwrap();

    let saved = script.path().with_file_name("request.json");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
    assert_eq!(value["xbry"], serde_json::json!(BOUNDARY_X));
    assert_eq!(value["nnodes"], 20);
    assert_eq!(value["ul_idx"], 0);
    assert!(value["xgrid"].is_null());
}

#[test]
fn test_nonzero_exit_is_solver_failure() {
    let script = shell_script(
        "gridgen",
        "cat > /dev/null\necho 'boundary self-intersects' >&2\nexit 3\n",
    );
    let solver = CommandSolver::new(script.path());
    let boundary = pentagon();
    let options = SolverOptions::default();
    let request = SolverRequest {
        boundary: &boundary,
        ny: 2,
        nx: 2,
        seed: None,
        options: &options,
    };

    match solver.solve(&request) {
        Err(GridError::SolverFailed(msg)) => assert!(msg.contains("boundary self-intersects")),
        other => panic!("expected solver failure, got {:?}", other),
    }
}

#[test]
fn test_error_reply_is_solver_failure() {
    let script = shell_script(
        "gridgen",
        "cat > /dev/null\necho '{\"error\": \"no convergence\"}'\n",
    );
    let solver = CommandSolver::new(script.path());
    let boundary = pentagon();
    let options = SolverOptions::default();
    let request = SolverRequest {
        boundary: &boundary,
        ny: 2,
        nx: 2,
        seed: None,
        options: &options,
    };
    assert!(matches!(solver.solve(&request), Err(GridError::SolverFailed(_))));
}

#[test]
fn test_unread_request_is_solver_failure() {
    // Exits successfully without touching stdin.
    let script = shell_script(
        "gridgen",
        "echo '{\"x\": [0.0, 1.0, 0.0, 1.0], \"y\": [0.0, 0.0, 1.0, 1.0]}'\n",
    );
    let solver = CommandSolver::new(script.path());
    let boundary = pentagon();
    let options = SolverOptions::default();
    // Large enough to overflow the pipe buffer, so the write must fail.
    let (sx, sy) = uniform_grid(300, 300);
    let request = SolverRequest {
        boundary: &boundary,
        ny: 300,
        nx: 300,
        seed: Some((&sx, &sy)),
        options: &options,
    };

    match solver.solve(&request) {
        Err(GridError::SolverFailed(msg)) => assert!(msg.contains("failed to send request")),
        other => panic!("expected solver failure, got {:?}", other),
    }
}

#[test]
fn test_spawn_failure_is_resource_unavailable() {
    let solver = CommandSolver::new("/nonexistent/cgrid/gridgen");
    let boundary = pentagon();
    let options = SolverOptions::default();
    let request = SolverRequest {
        boundary: &boundary,
        ny: 2,
        nx: 2,
        seed: None,
        options: &options,
    };
    assert!(matches!(
        solver.solve(&request),
        Err(GridError::ResourceUnavailable(_))
    ));
}

#[test]
fn test_locate_on_search_path() {
    let script = shell_script("gridgen", UNIT_SQUARE_REPLY);
    let dir = script.path().parent().unwrap().to_path_buf();
    let config = GridgenConfig {
        solver_search_paths: vec!["/nonexistent/cgrid".into(), dir],
        ..GridgenConfig::default()
    };

    let solver = CommandSolver::locate(&config).unwrap();
    assert_eq!(solver.program(), script.path());
}

#[test]
fn test_locate_skips_non_executable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("gridgen"), "not a program").unwrap();
    let config = GridgenConfig {
        solver_search_paths: vec![dir.path().to_path_buf()],
        ..GridgenConfig::default()
    };
    assert!(matches!(
        CommandSolver::locate(&config),
        Err(GridError::ResourceUnavailable(_))
    ));
}

#[test]
fn test_session_with_located_solver() {
    let script = shell_script("my-gridgen", UNIT_SQUARE_REPLY);
    let config = GridgenConfig {
        solver_command: Some(script.path().to_path_buf()),
        ..GridgenConfig::default()
    };

    let session = GridGenerationSession::builder(pentagon(), 2, 2)
        .config(config)
        .build()
        .unwrap();
    let grid = session.grid().unwrap();
    assert_eq!(grid.cell_shape(), (1, 1));
    assert_eq!(grid.x_rho().get(0, 0), Some(0.5));

    // An explicit solver wins over the config.
    let explicit: Arc<dyn GridSolver> = Arc::new(CommandSolver::new(script.path()));
    let session = GridGenerationSession::builder(pentagon(), 2, 2)
        .solver(explicit)
        .build()
        .unwrap();
    assert!(session.is_built());
}
