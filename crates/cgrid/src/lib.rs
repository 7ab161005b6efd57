//! Arakawa C-grid metric engine.
//!
//! Turns a structured array of grid vertices (possibly with missing
//! entries) into the full staggered C-grid used by ocean and atmosphere
//! models:
//!
//! ```text
//!   psi ---- v ---- psi          psi: vertices (interior)
//!    |              |            rho: cell centres
//!    u     rho      u            u:   east/west edge midpoints
//!    |              |            v:   north/south edge midpoints
//!   psi ---- v ---- psi
//! ```
//!
//! The pieces:
//!
//! - [`GridMetrics`]: point sets, cell widths (`dx`, `dy`, `pm`, `pn`),
//!   metric derivatives, angles, orthogonality and the cell masks.
//! - [`GeoGridMetrics`]: the same in a projected plane with lon/lat views,
//!   great-circle widths and the Coriolis parameter.
//! - [`Focus`]: resolution control applied to the solver's seed grid.
//! - [`GridGenerationSession`]: boundary → focus → [`GridSolver`] →
//!   metrics, with regeneration when the shape or focus changes.
//!
//! # Example
//!
//! ```
//! use cgrid::{GridMetrics, Polygon};
//!
//! let x = vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]];
//! let y = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]];
//! let mut grid = GridMetrics::from_rows(&x, &y)?;
//!
//! let island = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])?;
//! assert_eq!(grid.mask_polygon(&island, 0.0)?, 1);
//! assert_eq!(grid.mask_u()[(0, 0)], 0.0);
//! # Ok::<(), cgrid::GridError>(())
//! ```

pub mod boundary;
pub mod config;
pub mod conversions;
pub mod error;
pub mod focus;
pub mod geo;
pub mod masked;
pub mod metrics;
pub mod polygon;
pub mod session;
pub mod solver;
pub mod spacing;

pub use boundary::Boundary;
pub use config::{GridgenConfig, SolverOptions};
pub use conversions::{rho_to_vert, uvp_masks};
pub use error::{GridError, Result};
pub use focus::{approximate_erf, uniform_grid, Axis, Focus, FocusPoint};
pub use geo::{coriolis, GeoGridMetrics, EARTH_ROTATION_RATE};
pub use masked::MaskedArray2D;
pub use metrics::GridMetrics;
pub use polygon::Polygon;
pub use session::{GeneratedGrid, GridGenerationSession, SessionBuilder, SessionState};
pub use solver::{CommandSolver, GridSolver, RawGrid, ScriptedCall, ScriptedSolver, SolverRequest};
pub use spacing::{GreatCircleSpacing, PlanarSpacing, SpacingStrategy};
