//! Grid generation sessions.
//!
//! A session owns a boundary and the knobs that shape the grid (node counts,
//! focus, solver options). Generating runs the focus seed through the solver
//! and wraps the result in [`GridMetrics`], or [`GeoGridMetrics`] when the
//! boundary was given in lon/lat with a projection.
//!
//! ```text
//! Unbuilt --generate--> Built --set_shape/set_focus--> Unbuilt
//!                         |                               |
//!                         +--regenerate--> Regenerating --+--> Built
//! ```

use std::sync::Arc;

use projection::Projection;
use tracing::{info, instrument, warn};

use crate::boundary::Boundary;
use crate::config::{GridgenConfig, SolverOptions};
use crate::error::{GridError, Result};
use crate::focus::Focus;
use crate::geo::GeoGridMetrics;
use crate::metrics::GridMetrics;
use crate::solver::{CommandSolver, GridSolver, SolverRequest};

/// A generated grid.
#[derive(Debug, Clone)]
pub enum GeneratedGrid {
    Planar(GridMetrics),
    Geographic(GeoGridMetrics),
}

impl GeneratedGrid {
    /// The planar metrics, whichever flavour this is.
    pub fn metrics(&self) -> &GridMetrics {
        match self {
            Self::Planar(m) => m,
            Self::Geographic(g) => g.metrics(),
        }
    }

    pub fn metrics_mut(&mut self) -> &mut GridMetrics {
        match self {
            Self::Planar(m) => m,
            Self::Geographic(g) => g.metrics_mut(),
        }
    }

    pub fn as_geographic(&self) -> Option<&GeoGridMetrics> {
        match self {
            Self::Planar(_) => None,
            Self::Geographic(g) => Some(g),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    /// No grid for the current shape/focus.
    Unbuilt,
    Built(GeneratedGrid),
    /// A solve is in progress; the previous grid has been dropped.
    Regenerating,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unbuilt => "unbuilt",
            Self::Built(_) => "built",
            Self::Regenerating => "regenerating",
        }
    }
}

/// Builder for [`GridGenerationSession`].
#[derive(Debug)]
pub struct SessionBuilder {
    boundary: Boundary,
    ny: usize,
    nx: usize,
    focus: Option<Focus>,
    options: Option<SolverOptions>,
    solver: Option<Arc<dyn GridSolver>>,
    projection: Option<Arc<dyn Projection>>,
    use_gcdist: Option<bool>,
    autogen: bool,
    config: GridgenConfig,
}

impl SessionBuilder {
    /// Start a session for `boundary` with `ny` x `nx` nodes.
    pub fn new(boundary: Boundary, ny: usize, nx: usize) -> Self {
        Self {
            boundary,
            ny,
            nx,
            focus: None,
            options: None,
            solver: None,
            projection: None,
            use_gcdist: None,
            autogen: true,
            config: GridgenConfig::default(),
        }
    }

    pub fn focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Solver tunables. Defaults to the config's.
    pub fn options(mut self, options: SolverOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Solver to use instead of locating the `gridgen` program.
    pub fn solver(mut self, solver: Arc<dyn GridSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Treat the boundary as lon/lat and generate in `projection`'s plane.
    pub fn projection(mut self, projection: Arc<dyn Projection>) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn use_gcdist(mut self, use_gcdist: bool) -> Self {
        self.use_gcdist = Some(use_gcdist);
        self
    }

    /// Generate immediately on `build` (the default).
    pub fn autogen(mut self, autogen: bool) -> Self {
        self.autogen = autogen;
        self
    }

    pub fn config(mut self, config: GridgenConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate everything and create the session.
    ///
    /// Nothing is returned on failure; with `autogen` a solver failure
    /// fails the whole build.
    pub fn build(self) -> Result<GridGenerationSession> {
        validate_shape(self.ny, self.nx)?;
        let options = self.options.unwrap_or_else(|| self.config.solver.clone());
        options.validate()?;

        let boundary = match &self.projection {
            Some(projection) => self.boundary.reprojected(projection.as_ref())?,
            None => self.boundary,
        };

        let solver = match self.solver {
            Some(solver) => solver,
            None => Arc::new(CommandSolver::locate(&self.config)?),
        };

        let mut session = GridGenerationSession {
            boundary,
            ny: self.ny,
            nx: self.nx,
            focus: self.focus,
            options,
            solver,
            projection: self.projection,
            use_gcdist: self.use_gcdist.unwrap_or(self.config.use_gcdist),
            state: SessionState::Unbuilt,
            generation: 0,
        };

        if self.autogen {
            session.generate()?;
        }
        Ok(session)
    }
}

fn validate_shape(ny: usize, nx: usize) -> Result<()> {
    if ny < 2 || nx < 2 {
        return Err(GridError::shape(format!(
            "grid needs at least 2 nodes in each direction, got {}x{}",
            ny, nx
        )));
    }
    Ok(())
}

/// Orchestrates focus, solver and metrics for one boundary.
#[derive(Debug)]
pub struct GridGenerationSession {
    boundary: Boundary,
    ny: usize,
    nx: usize,
    focus: Option<Focus>,
    options: SolverOptions,
    solver: Arc<dyn GridSolver>,
    projection: Option<Arc<dyn Projection>>,
    use_gcdist: bool,
    state: SessionState,
    generation: u64,
}

impl GridGenerationSession {
    pub fn builder(boundary: Boundary, ny: usize, nx: usize) -> SessionBuilder {
        SessionBuilder::new(boundary, ny, nx)
    }

    /// Build the grid if there isn't one for the current settings.
    pub fn generate(&mut self) -> Result<&GeneratedGrid> {
        if !self.is_built() {
            self.regenerate()?;
        }
        self.built()
    }

    /// Drop any existing grid and solve again from scratch.
    ///
    /// On failure the session is left unbuilt.
    #[instrument(skip(self), fields(ny = self.ny, nx = self.nx, generation = self.generation))]
    pub fn regenerate(&mut self) -> Result<&GeneratedGrid> {
        // Release the previous grid before the solver runs.
        self.state = SessionState::Regenerating;

        match self.solve() {
            Ok(grid) => {
                self.generation += 1;
                info!(
                    generation = self.generation,
                    cells = ?grid.metrics().cell_shape(),
                    "grid generated"
                );
                self.state = SessionState::Built(grid);
                self.built()
            }
            Err(e) => {
                self.state = SessionState::Unbuilt;
                Err(e)
            }
        }
    }

    fn solve(&self) -> Result<GeneratedGrid> {
        let seed = match &self.focus {
            Some(focus) => Some(focus.seed_grid(self.ny, self.nx)?),
            None => None,
        };
        let request = SolverRequest {
            boundary: &self.boundary,
            ny: self.ny,
            nx: self.nx,
            seed: seed.as_ref().map(|(x, y)| (x, y)),
            options: &self.options,
        };

        let raw = self.solver.solve(&request)?;
        let missing = raw.nan_count();
        if missing > 0 {
            warn!(vertices = missing, "solver output has missing vertices, masking them");
        }
        let (x, y) = raw.into_arrays()?;

        Ok(match &self.projection {
            Some(projection) => GeneratedGrid::Geographic(GeoGridMetrics::from_planar(
                x,
                y,
                projection.clone(),
                self.use_gcdist,
            )?),
            None => GeneratedGrid::Planar(GridMetrics::new(x, y)?),
        })
    }

    fn built(&self) -> Result<&GeneratedGrid> {
        match &self.state {
            SessionState::Built(grid) => Ok(grid),
            other => Err(GridError::value(format!("grid is {}", other.name()))),
        }
    }

    /// Change the node counts. The current grid is discarded.
    pub fn set_shape(&mut self, ny: usize, nx: usize) -> Result<()> {
        validate_shape(ny, nx)?;
        self.ny = ny;
        self.nx = nx;
        self.state = SessionState::Unbuilt;
        Ok(())
    }

    /// Change the focus. The current grid is discarded.
    pub fn set_focus(&mut self, focus: Option<Focus>) {
        self.focus = focus;
        self.state = SessionState::Unbuilt;
    }

    /// The generated grid.
    pub fn grid(&self) -> Result<&GridMetrics> {
        self.built().map(GeneratedGrid::metrics)
    }

    /// Mutable access for masking.
    pub fn grid_mut(&mut self) -> Result<&mut GridMetrics> {
        match &mut self.state {
            SessionState::Built(grid) => Ok(grid.metrics_mut()),
            other => Err(GridError::value(format!("grid is {}", other.name()))),
        }
    }

    /// The generated grid with its lon/lat views. Fails for planar sessions.
    pub fn geo_grid(&self) -> Result<&GeoGridMetrics> {
        self.built()?
            .as_geographic()
            .ok_or_else(|| GridError::value("session has no projection"))
    }

    pub fn geo_grid_mut(&mut self) -> Result<&mut GeoGridMetrics> {
        match &mut self.state {
            SessionState::Built(GeneratedGrid::Geographic(grid)) => Ok(grid),
            SessionState::Built(GeneratedGrid::Planar(_)) => {
                Err(GridError::value("session has no projection"))
            }
            other => Err(GridError::value(format!("grid is {}", other.name()))),
        }
    }

    /// Boundary in the planar system the solver sees.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// `(ny, nx)` node counts.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn projection(&self) -> Option<&Arc<dyn Projection>> {
        self.projection.as_ref()
    }

    /// Number of successful generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, SessionState::Built(_))
    }
}
