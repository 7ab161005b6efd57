//! Vertex grid generators with predictable geometry.
//!
//! Every generator returns row-major `(x, y)` vectors of `nrows * ncols`
//! vertices, row 0 first.

/// A generated vertex grid in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    pub nrows: usize,
    pub ncols: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl VertexGrid {
    fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> (f64, f64)) -> Self {
        let mut x = Vec::with_capacity(nrows * ncols);
        let mut y = Vec::with_capacity(nrows * ncols);
        for row in 0..nrows {
            for col in 0..ncols {
                let (px, py) = f(row, col);
                x.push(px);
                y.push(py);
            }
        }
        Self { nrows, ncols, x, y }
    }

    /// Index of vertex (row, col) in the flat vectors.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.ncols + col
    }

    /// Replace vertex (row, col) with NaN, marking it invalid.
    pub fn with_invalid(mut self, row: usize, col: usize) -> Self {
        let idx = self.index(row, col);
        self.x[idx] = f64::NAN;
        self.y[idx] = f64::NAN;
        self
    }
}

/// Creates an axis-aligned grid with constant spacing.
///
/// Vertex (row, col) sits at `(col * dx, row * dy)`.
///
/// # Example
///
/// ```
/// use test_utils::rectilinear_grid;
///
/// let grid = rectilinear_grid(3, 4, 2.0, 1.0);
/// assert_eq!(grid.x.len(), 12);
/// assert_eq!(grid.x[1], 2.0); // row 0, col 1
/// assert_eq!(grid.y[4], 1.0); // row 1, col 0
/// ```
pub fn rectilinear_grid(nrows: usize, ncols: usize, dx: f64, dy: f64) -> VertexGrid {
    VertexGrid::from_fn(nrows, ncols, |row, col| (col as f64 * dx, row as f64 * dy))
}

/// Creates a rectilinear grid rotated counter-clockwise by `theta` radians.
pub fn rotated_grid(nrows: usize, ncols: usize, dx: f64, dy: f64, theta: f64) -> VertexGrid {
    let (s, c) = theta.sin_cos();
    VertexGrid::from_fn(nrows, ncols, |row, col| {
        let (px, py) = (col as f64 * dx, row as f64 * dy);
        (px * c - py * s, px * s + py * c)
    })
}

/// Creates a sheared grid: rows are offset in x by `shear * row`.
///
/// Cells are parallelograms whose interior angle departs from 90 degrees
/// by `atan(shear)` when `dx == dy == 1`.
pub fn skewed_grid(nrows: usize, ncols: usize, shear: f64) -> VertexGrid {
    VertexGrid::from_fn(nrows, ncols, |row, col| {
        (col as f64 + shear * row as f64, row as f64)
    })
}

/// Creates a grid whose column spacing grows geometrically by `ratio`.
///
/// Useful for exercising the spacing derivatives, which vanish on a
/// uniform grid.
pub fn stretched_grid(nrows: usize, ncols: usize, ratio: f64) -> VertexGrid {
    let mut edges = Vec::with_capacity(ncols);
    let mut pos = 0.0;
    let mut step = 1.0;
    for _ in 0..ncols {
        edges.push(pos);
        pos += step;
        step *= ratio;
    }
    VertexGrid::from_fn(nrows, ncols, |row, col| (edges[col], row as f64))
}
