//! Environment and file based configuration.
//!
//! Kept in its own test binary with a single test so the environment
//! changes can't race other tests.

use std::io::Write;
use std::path::PathBuf;

use cgrid::{GridError, GridgenConfig, SolverOptions};

#[test]
fn test_config_sources() {
    std::env::set_var("GRIDGEN_NNODES", "18");
    std::env::set_var("GRIDGEN_PRECISION", "1e-6");
    std::env::set_var("GRIDGEN_NEWTON", "false");
    std::env::set_var("GRIDGEN_THIN", "0");
    std::env::set_var("GRIDGEN_VERBOSE", "TRUE");
    std::env::set_var("GRIDGEN_NPPE", "not a number");
    std::env::set_var("GRIDGEN_SOLVER", "/opt/gridgen/bin/gridgen");
    std::env::set_var("GRIDGEN_USE_GCDIST", "false");

    let options = SolverOptions::from_env();
    assert_eq!(options.nnodes, 18);
    assert_eq!(options.precision, 1e-6);
    assert!(!options.newton);
    assert!(!options.thin);
    assert!(options.verbose);
    // unparsable values keep the default
    assert_eq!(options.nppe, 3);

    let config = GridgenConfig::from_env();
    assert_eq!(config.solver, options);
    assert_eq!(
        config.solver_command,
        Some(PathBuf::from("/opt/gridgen/bin/gridgen"))
    );
    assert!(!config.use_gcdist);

    for key in [
        "GRIDGEN_NNODES",
        "GRIDGEN_PRECISION",
        "GRIDGEN_NEWTON",
        "GRIDGEN_THIN",
        "GRIDGEN_VERBOSE",
        "GRIDGEN_NPPE",
        "GRIDGEN_SOLVER",
        "GRIDGEN_USE_GCDIST",
    ] {
        std::env::remove_var(key);
    }
    assert_eq!(SolverOptions::from_env(), SolverOptions::default());

    // YAML file
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "solver:\n  nnodes: 12\n  precision: 1.0e-3\nsolver_search_paths: [/srv/bin]\nuse_gcdist: false"
    )
    .unwrap();
    let config = GridgenConfig::from_file(file.path()).unwrap();
    assert_eq!(config.solver.nnodes, 12);
    assert_eq!(config.solver.nppe, 3);
    assert_eq!(config.solver_search_paths, vec![PathBuf::from("/srv/bin")]);

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    writeln!(bad, "solver:\n  precision: 0.0").unwrap();
    assert!(matches!(
        GridgenConfig::from_file(bad.path()),
        Err(GridError::Config(_))
    ));

    assert!(matches!(
        GridgenConfig::from_file("/nonexistent/cgrid.yaml"),
        Err(GridError::Io(_))
    ));
}
