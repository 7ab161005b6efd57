//! Coordinate reference system transformations and geodesy.
//!
//! Implements map projections and ellipsoidal distances from scratch
//! without external dependencies. Grids built in geographic coordinates use
//! a [`Projection`] to obtain planar vertex positions (angles are measured in
//! the projected plane, so a conformal projection should be used) and a
//! [`Geodesic`] to measure great-circle cell widths.

pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod lambert;
pub mod mercator;
pub mod transform;
pub mod transverse_mercator;

pub use ellipsoid::Ellipsoid;
pub use error::{ProjectionError, Result};
pub use geodesic::{Geodesic, GeodesicInverse, Vincenty};
pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use transform::{Identity, Projection};
pub use transverse_mercator::TransverseMercator;
