//! Configuration for grid generation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Tunables passed through to the external grid solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Number of nodes used by the conformal mapping. Roughly
    /// `-log10(precision)` or slightly more.
    pub nnodes: usize,

    /// Precision of the mapping. 1e-12 suits lon/lat magnitudes; relax to
    /// around 1e-3 for projected coordinates.
    pub precision: f64,

    /// Number of points per internal edge.
    pub nppe: usize,

    /// Use Gauss-Newton with Broyden update for the sigmas instead of
    /// simple iteration.
    pub newton: bool,

    /// Set when parts of the domain are narrow in one direction.
    pub thin: bool,

    /// Check that the boundary is a simple polygon before solving.
    pub check_simple_polygon: bool,

    /// Let the solver print progress.
    pub verbose: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            nnodes: 14,
            precision: 1.0e-12,
            nppe: 3,
            newton: true,
            thin: true,
            check_simple_polygon: true,
            verbose: false,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl SolverOptions {
    /// Load solver options from environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("GRIDGEN_NNODES") {
            if let Ok(n) = val.parse() {
                options.nnodes = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDGEN_PRECISION") {
            if let Ok(p) = val.parse() {
                options.precision = p;
            }
        }

        if let Ok(val) = std::env::var("GRIDGEN_NPPE") {
            if let Ok(n) = val.parse() {
                options.nppe = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDGEN_NEWTON") {
            options.newton = env_flag(&val);
        }

        if let Ok(val) = std::env::var("GRIDGEN_THIN") {
            options.thin = env_flag(&val);
        }

        if let Ok(val) = std::env::var("GRIDGEN_CHECKSIMPLEPOLY") {
            options.check_simple_polygon = env_flag(&val);
        }

        if let Ok(val) = std::env::var("GRIDGEN_VERBOSE") {
            options.verbose = env_flag(&val);
        }

        options
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.nnodes == 0 {
            return Err(GridError::config("nnodes must be > 0"));
        }

        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(GridError::config("precision must be a positive number"));
        }

        if self.nppe == 0 {
            return Err(GridError::config("nppe must be > 0"));
        }

        Ok(())
    }
}

/// Top-level configuration: solver tunables plus where to find the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridgenConfig {
    pub solver: SolverOptions,

    /// Explicit solver program. A bare name is looked up on the search paths.
    pub solver_command: Option<PathBuf>,

    /// Directories searched for the `gridgen` program.
    pub solver_search_paths: Vec<PathBuf>,

    /// Use great-circle distances for cell widths of geographic grids.
    pub use_gcdist: bool,
}

impl Default for GridgenConfig {
    fn default() -> Self {
        let mut solver_search_paths = Vec::new();
        if let Ok(prefix) = std::env::var("PREFIX") {
            solver_search_paths.push(PathBuf::from(prefix).join("bin"));
        }
        solver_search_paths.push(PathBuf::from("/usr/local/bin"));
        solver_search_paths.push(PathBuf::from("/usr/bin"));

        Self {
            solver: SolverOptions::default(),
            solver_command: None,
            solver_search_paths,
            use_gcdist: true,
        }
    }
}

impl GridgenConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            solver: SolverOptions::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("GRIDGEN_SOLVER") {
            if !val.is_empty() {
                config.solver_command = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("GRIDGEN_USE_GCDIST") {
            config.use_gcdist = env_flag(&val);
        }

        config
    }

    /// Parse configuration from a YAML document. Missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()
    }
}
