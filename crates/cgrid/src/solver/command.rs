//! Solver backed by an external `gridgen` program.
//!
//! The request is written to the program's stdin as a single JSON object and
//! the reply is read from stdout:
//!
//! ```text
//! {"x": [..], "y": [..]}      row-major, null for a missing vertex
//! {"error": "..."}            the solve failed
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{GridSolver, RawGrid, SolverRequest};
use crate::config::GridgenConfig;
use crate::error::{GridError, Result};

const PROGRAM_NAME: &str = "gridgen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSolver {
    program: PathBuf,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    xbry: &'a [f64],
    ybry: &'a [f64],
    beta: &'a [f64],
    ul_idx: usize,
    nx: usize,
    ny: usize,
    xgrid: Option<Vec<f64>>,
    ygrid: Option<Vec<f64>>,
    nnodes: usize,
    newton: bool,
    precision: f64,
    checksimplepoly: bool,
    thin: bool,
    nppe: usize,
    verbose: bool,
}

#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    x: Option<Vec<Option<f64>>>,
    #[serde(default)]
    y: Option<Vec<Option<f64>>>,
    #[serde(default)]
    error: Option<String>,
}

fn row_major(m: &nalgebra::DMatrix<f64>) -> Vec<f64> {
    // nalgebra stores column-major
    m.transpose().as_slice().to_vec()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl CommandSolver {
    /// Use `program` without checking that it exists.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Find the solver program.
    ///
    /// An explicit `solver_command` containing a path separator is used as
    /// is; a bare name (or the default `gridgen`) is looked up on the
    /// configured search paths.
    pub fn locate(config: &GridgenConfig) -> Result<Self> {
        let name = config
            .solver_command
            .clone()
            .unwrap_or_else(|| PathBuf::from(PROGRAM_NAME));

        if name.components().count() > 1 || name.is_absolute() {
            if is_executable(&name) {
                return Ok(Self::new(name));
            }
            return Err(GridError::resource_unavailable(format!(
                "grid solver {} is missing or not executable",
                name.display()
            )));
        }

        config
            .solver_search_paths
            .iter()
            .map(|dir| dir.join(&name))
            .find(|candidate| is_executable(candidate))
            .map(Self::new)
            .ok_or_else(|| {
                GridError::resource_unavailable(format!(
                    "grid solver {} not found in {:?}",
                    name.display(),
                    config.solver_search_paths
                ))
            })
    }

    fn encode(request: &SolverRequest<'_>) -> Result<Vec<u8>> {
        let boundary = request.boundary;
        let options = request.options;
        let wire = WireRequest {
            xbry: boundary.x(),
            ybry: boundary.y(),
            beta: boundary.beta(),
            ul_idx: boundary.ul_idx(),
            nx: request.nx,
            ny: request.ny,
            xgrid: request.seed.map(|(x, _)| row_major(x)),
            ygrid: request.seed.map(|(_, y)| row_major(y)),
            nnodes: options.nnodes,
            newton: options.newton,
            precision: options.precision,
            checksimplepoly: options.check_simple_polygon,
            thin: options.thin,
            nppe: options.nppe,
            verbose: options.verbose,
        };
        Ok(serde_json::to_vec(&wire)?)
    }

    fn decode(ny: usize, nx: usize, stdout: &[u8]) -> Result<RawGrid> {
        let reply: WireReply = serde_json::from_slice(stdout)
            .map_err(|e| GridError::solver_failed(format!("malformed solver reply: {}", e)))?;

        if let Some(error) = reply.error {
            return Err(GridError::solver_failed(error));
        }

        let unpack = |v: Vec<Option<f64>>| -> Vec<f64> {
            v.into_iter().map(|p| p.unwrap_or(f64::NAN)).collect()
        };
        match (reply.x, reply.y) {
            (Some(x), Some(y)) => Ok(RawGrid::new(ny, nx, unpack(x), unpack(y))),
            _ => Err(GridError::solver_failed(
                "solver reply has neither vertices nor an error",
            )),
        }
    }
}

impl GridSolver for CommandSolver {
    #[instrument(skip(self, request), fields(program = %self.program.display(), ny = request.ny, nx = request.nx))]
    fn solve(&self, request: &SolverRequest<'_>) -> Result<RawGrid> {
        let input = Self::encode(request)?;

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                GridError::resource_unavailable(format!(
                    "failed to start grid solver {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Feed stdin from its own thread so a chatty child can't deadlock
        // on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output()?;
        let written = match writer {
            Some(writer) => writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
            None => Err(std::io::Error::other("solver stdin was not captured")),
        };

        debug!(
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "grid solver exited"
        );

        if !output.status.success() {
            return Err(GridError::solver_failed(format!(
                "grid solver exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if let Err(e) = written {
            warn!(error = %e, "grid solver did not read the whole request");
            return Err(GridError::solver_failed(format!(
                "failed to send request to grid solver: {}",
                e
            )));
        }

        Self::decode(request.ny, request.nx, &output.stdout)
    }
}
