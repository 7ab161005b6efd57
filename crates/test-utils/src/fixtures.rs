//! Reference grids with known derived quantities.
//!
//! The vertex arrays are the converged output of the orthogonal grid
//! generator for a five-point boundary, rounded to two decimals. Derived
//! arrays were computed from the unrounded grid, so comparisons against
//! them need a tolerance of about `1.5e-2`.

/// Boundary x coordinates of the five-point test polygon.
pub const BOUNDARY_X: [f64; 5] = [0.0, 1.0, 2.0, 1.0, 0.0];

/// Boundary y coordinates of the five-point test polygon.
pub const BOUNDARY_Y: [f64; 5] = [0.0, 0.0, 0.5, 1.0, 1.0];

/// Turning angles (in units of 90 degrees) of the test polygon.
pub const BOUNDARY_BETA: [f64; 5] = [1.0, 1.0, 0.0, 1.0, 1.0];

/// Tolerance for comparing against the rounded reference arrays.
pub const REFERENCE_TOLERANCE: f64 = 1.5e-2;

/// Node counts (ny, nx) of the basic grid.
pub const BASIC_SHAPE: (usize, usize) = (10, 5);

/// Vertex x of the basic grid.
pub const BASIC_X: [[f64; 5]; 10] = [
    [1.0, 1.12, 2.0, 1.12, 1.0],
    [0.96, 1.03, 1.17, 1.03, 0.96],
    [0.87, 0.91, 0.96, 0.91, 0.87],
    [0.77, 0.78, 0.8, 0.78, 0.77],
    [0.65, 0.65, 0.66, 0.65, 0.65],
    [0.52, 0.52, 0.53, 0.52, 0.52],
    [0.39, 0.39, 0.39, 0.39, 0.39],
    [0.26, 0.26, 0.26, 0.26, 0.26],
    [0.13, 0.13, 0.13, 0.13, 0.13],
    [0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Vertex y of the basic grid.
pub const BASIC_Y: [[f64; 5]; 10] = [
    [0.0, 0.06, 0.5, 0.94, 1.0],
    [0.0, 0.16, 0.5, 0.84, 1.0],
    [0.0, 0.21, 0.5, 0.79, 1.0],
    [0.0, 0.23, 0.5, 0.77, 1.0],
    [0.0, 0.24, 0.5, 0.76, 1.0],
    [0.0, 0.25, 0.5, 0.75, 1.0],
    [0.0, 0.25, 0.5, 0.75, 1.0],
    [0.0, 0.25, 0.5, 0.75, 1.0],
    [0.0, 0.25, 0.5, 0.75, 1.0],
    [0.0, 0.25, 0.5, 0.75, 1.0],
];

/// x at rho points of the basic grid.
pub const BASIC_X_RHO: [[f64; 4]; 9] = [
    [1.03, 1.33, 1.33, 1.03],
    [0.94, 1.02, 1.02, 0.94],
    [0.83, 0.87, 0.87, 0.83],
    [0.71, 0.73, 0.73, 0.71],
    [0.59, 0.59, 0.59, 0.59],
    [0.46, 0.46, 0.46, 0.46],
    [0.33, 0.33, 0.33, 0.33],
    [0.2, 0.2, 0.2, 0.2],
    [0.07, 0.07, 0.07, 0.07],
];

/// y at rho points of the basic grid.
pub const BASIC_Y_RHO: [[f64; 4]; 9] = [
    [0.05, 0.3, 0.7, 0.95],
    [0.09, 0.34, 0.66, 0.91],
    [0.11, 0.36, 0.64, 0.89],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
];

/// x at u points of the basic grid.
pub const BASIC_X_U: [[f64; 3]; 9] = [
    [1.08, 1.58, 1.08],
    [0.97, 1.06, 0.97],
    [0.85, 0.88, 0.85],
    [0.72, 0.73, 0.72],
    [0.59, 0.59, 0.59],
    [0.46, 0.46, 0.46],
    [0.33, 0.33, 0.33],
    [0.2, 0.2, 0.2],
    [0.07, 0.07, 0.07],
];

/// y at u points of the basic grid.
pub const BASIC_Y_U: [[f64; 3]; 9] = [
    [0.11, 0.5, 0.89],
    [0.18, 0.5, 0.82],
    [0.22, 0.5, 0.78],
    [0.24, 0.5, 0.76],
    [0.24, 0.5, 0.76],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
];

/// x at v points of the basic grid.
pub const BASIC_X_V: [[f64; 4]; 8] = [
    [1.0, 1.1, 1.1, 1.0],
    [0.89, 0.94, 0.94, 0.89],
    [0.78, 0.79, 0.79, 0.78],
    [0.65, 0.66, 0.66, 0.65],
    [0.52, 0.53, 0.53, 0.52],
    [0.39, 0.39, 0.39, 0.39],
    [0.26, 0.26, 0.26, 0.26],
    [0.13, 0.13, 0.13, 0.13],
];

/// y at v points of the basic grid.
pub const BASIC_Y_V: [[f64; 4]; 8] = [
    [0.08, 0.33, 0.67, 0.92],
    [0.1, 0.35, 0.65, 0.9],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
    [0.12, 0.37, 0.63, 0.88],
];

/// x at psi points of the basic grid.
pub const BASIC_X_PSI: [[f64; 3]; 8] = [
    [1.03, 1.17, 1.03],
    [0.91, 0.96, 0.91],
    [0.78, 0.8, 0.78],
    [0.65, 0.66, 0.65],
    [0.52, 0.53, 0.52],
    [0.39, 0.39, 0.39],
    [0.26, 0.26, 0.26],
    [0.13, 0.13, 0.13],
];

/// y at psi points of the basic grid.
pub const BASIC_Y_PSI: [[f64; 3]; 8] = [
    [0.16, 0.5, 0.84],
    [0.21, 0.5, 0.79],
    [0.23, 0.5, 0.77],
    [0.24, 0.5, 0.76],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
    [0.25, 0.5, 0.75],
];

/// Node counts (ny, nx) of the focused grid.
pub const FOCUSED_SHAPE: (usize, usize) = (9, 9);

/// Focus applied to the focused grid: (axis, pos, factor, extent).
pub const FOCUSED_FOCI: [(char, f64, f64, f64); 2] = [('x', 0.5, 2.0, 3.0), ('y', 0.75, 0.5, 2.0)];

/// Vertex x of the focused grid.
pub const FOCUSED_X: [[f64; 9]; 9] = [
    [1.0, 1.04, 1.12, 1.27, 2.0, 1.27, 1.12, 1.04, 1.0],
    [0.95, 0.97, 1.02, 1.1, 1.15, 1.1, 1.02, 0.97, 0.95],
    [0.86, 0.87, 0.89, 0.92, 0.93, 0.92, 0.89, 0.87, 0.86],
    [0.73, 0.74, 0.75, 0.76, 0.76, 0.76, 0.75, 0.74, 0.73],
    [0.59, 0.59, 0.6, 0.6, 0.6, 0.6, 0.6, 0.59, 0.59],
    [0.45, 0.45, 0.45, 0.45, 0.45, 0.45, 0.45, 0.45, 0.45],
    [0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3],
    [0.15, 0.15, 0.15, 0.15, 0.15, 0.15, 0.15, 0.15, 0.15],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Vertex y of the focused grid.
pub const FOCUSED_Y: [[f64; 9]; 9] = [
    [0.0, 0.02, 0.06, 0.14, 0.5, 0.86, 0.94, 0.98, 1.0],
    [0.0, 0.07, 0.16, 0.3, 0.5, 0.7, 0.84, 0.93, 1.0],
    [0.0, 0.1, 0.21, 0.35, 0.5, 0.65, 0.79, 0.9, 1.0],
    [0.0, 0.12, 0.24, 0.37, 0.5, 0.63, 0.76, 0.88, 1.0],
    [0.0, 0.12, 0.25, 0.37, 0.5, 0.63, 0.75, 0.88, 1.0],
    [0.0, 0.12, 0.25, 0.37, 0.5, 0.63, 0.75, 0.88, 1.0],
    [0.0, 0.13, 0.25, 0.38, 0.5, 0.62, 0.75, 0.87, 1.0],
    [0.0, 0.13, 0.25, 0.38, 0.5, 0.62, 0.75, 0.87, 1.0],
    [0.0, 0.13, 0.25, 0.38, 0.5, 0.62, 0.75, 0.87, 1.0],
];

/// x at rho points of the focused grid.
pub const FOCUSED_X_RHO: [[f64; 8]; 8] = [
    [0.99, 1.04, 1.13, 1.38, 1.38, 1.13, 1.04, 0.99],
    [0.91, 0.94, 0.98, 1.02, 1.02, 0.98, 0.94, 0.91],
    [0.8, 0.81, 0.83, 0.84, 0.84, 0.83, 0.81, 0.8],
    [0.66, 0.67, 0.68, 0.68, 0.68, 0.68, 0.67, 0.66],
    [0.52, 0.52, 0.52, 0.53, 0.53, 0.52, 0.52, 0.52],
    [0.37, 0.37, 0.37, 0.37, 0.37, 0.37, 0.37, 0.37],
    [0.22, 0.22, 0.22, 0.22, 0.22, 0.22, 0.22, 0.22],
    [0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07],
];

/// y at rho points of the focused grid.
pub const FOCUSED_Y_RHO: [[f64; 8]; 8] = [
    [0.02, 0.08, 0.16, 0.36, 0.64, 0.84, 0.92, 0.98],
    [0.04, 0.14, 0.26, 0.41, 0.59, 0.74, 0.86, 0.96],
    [0.05, 0.17, 0.29, 0.43, 0.57, 0.71, 0.83, 0.95],
    [0.06, 0.18, 0.3, 0.43, 0.57, 0.7, 0.82, 0.94],
    [0.06, 0.19, 0.31, 0.44, 0.56, 0.69, 0.81, 0.94],
    [0.06, 0.19, 0.31, 0.44, 0.56, 0.69, 0.81, 0.94],
    [0.06, 0.19, 0.31, 0.44, 0.56, 0.69, 0.81, 0.94],
    [0.06, 0.19, 0.31, 0.44, 0.56, 0.69, 0.81, 0.94],
];

/// Square island carved out of the basic grid with mask value 0.
pub const ISLAND: [(f64, f64); 4] = [(0.5, 1.0), (1.0, 1.0), (1.0, 0.5), (0.5, 0.5)];

/// `mask_rho` of the basic grid after masking [`ISLAND`].
pub const ISLAND_MASK_RHO: [[f64; 4]; 9] = [
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
];

/// Focus fixtures on ten evenly spaced points over [0, 1].
pub mod focus {
    /// A single focus point at 0.25 with factor 3 and extent 0.2.
    pub const SIMPLE: [f64; 10] = [0.0, 0.106, 0.17, 0.222, 0.307, 0.43, 0.569, 0.712, 0.856, 1.0];

    /// x after focusing at 0.25 (factor 3, extent 0.1) then 0.75 (factor 2, extent 0.2).
    pub const FULL_X: [f64; 10] = [0.0, 0.148, 0.248, 0.313, 0.446, 0.59, 0.711, 0.796, 0.881, 1.0];

    /// y after focusing at 0.5 (factor 2, extent 0.3).
    pub const FULL_Y: [f64; 10] = [0.0, 0.142, 0.27, 0.377, 0.462, 0.538, 0.623, 0.73, 0.858, 1.0];

    /// Tolerance of the focus fixtures.
    pub const TOLERANCE: f64 = 1.5e-3;
}

/// Flatten nested rows into a row-major vector.
pub fn flatten<const C: usize>(rows: &[[f64; C]]) -> Vec<f64> {
    rows.iter().flat_map(|row| row.iter().copied()).collect()
}
