use exposure_common::{snap_to_lattice, Point};
use std::{error::Error, fmt, ops::Index};

/// (row, column) address of a lattice location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    #[inline(always)]
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }

    /// Number of lattice steps to `other` along both axes.
    pub fn manhattan_steps(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// The four axis-aligned lattice moves, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RowUp,
    ColUp,
    RowDown,
    ColDown,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::RowUp, Direction::ColUp, Direction::RowDown, Direction::ColDown];

    /// (row, col) offset of the move.
    #[inline(always)]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::RowUp => (1, 0),
            Direction::ColUp => (0, 1),
            Direction::RowDown => (-1, 0),
            Direction::ColDown => (0, -1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    InvalidSpacing(f32),
    /// Single-location lattice: no move is ever legal.
    DegenerateLattice,
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidSpacing(d) => write!(f, "grid spacing must be positive, got {}", d),
            GridError::DegenerateLattice => {
                write!(f, "field is smaller than one grid step along both axes")
            }
            GridError::OutOfBounds { row, col, rows, cols } => write!(
                f,
                "grid index ({}, {}) outside [0, {}]x[0, {}]",
                row, col, rows, cols
            ),
        }
    }
}

impl Error for GridError {}

/// Immutable lattice of field locations at spacing `delta_s`.
///
/// Holds `(rows + 1) * (cols + 1)` points stored row-major; location `(r, c)`
/// sits at `(c * delta_s, r * delta_s)`.
#[derive(Debug, Clone)]
pub struct Grid {
    delta_s: f32,
    cols: usize, // K
    rows: usize, // L
    locations: Vec<Point>,
}

impl Grid {
    pub fn build(width: f32, height: f32, delta_s: f32) -> Result<Self, GridError> {
        if !delta_s.is_finite() || delta_s <= 0.0 {
            return Err(GridError::InvalidSpacing(delta_s));
        }
        let cols = snap_to_lattice(width, delta_s).max(0) as usize;
        let rows = snap_to_lattice(height, delta_s).max(0) as usize;
        if cols == 0 && rows == 0 {
            return Err(GridError::DegenerateLattice);
        }

        let mut locations = Vec::with_capacity((rows + 1) * (cols + 1));
        for r in 0..=rows {
            for c in 0..=cols {
                locations.push(Point::new(c as f32 * delta_s, r as f32 * delta_s));
            }
        }
        log::debug!(
            "Built {}x{} lattice ({} locations, delta_s = {})",
            rows + 1,
            cols + 1,
            locations.len(),
            delta_s
        );

        Ok(Self { delta_s, cols, rows, locations })
    }

    #[inline(always)]
    pub fn delta_s(&self) -> f32 { self.delta_s }
    /// Highest column index, K.
    #[inline(always)]
    pub fn cols(&self) -> usize { self.cols }
    /// Highest row index, L.
    #[inline(always)]
    pub fn rows(&self) -> usize { self.rows }

    #[inline(always)]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && row as usize <= self.rows && col as usize <= self.cols
    }

    #[inline(always)]
    fn flat(&self, index: GridIndex) -> usize {
        index.row * (self.cols + 1) + index.col
    }

    pub fn get(&self, index: GridIndex) -> Option<Point> {
        if index.row <= self.rows && index.col <= self.cols {
            Some(self.locations[self.flat(index)])
        } else {
            None
        }
    }

    pub fn location_at(&self, row: usize, col: usize) -> Result<Point, GridError> {
        self.get(GridIndex::new(row, col)).ok_or(GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Nearest lattice index to a continuous point, clamped to the lattice.
    pub fn index_of(&self, point: Point) -> GridIndex {
        let snap = |v: f32, max: usize| snap_to_lattice(v, self.delta_s).clamp(0, max as i64) as usize;
        GridIndex::new(snap(point.y, self.rows), snap(point.x, self.cols))
    }

    /// The index one move away, if it stays on the lattice.
    pub fn neighbor(&self, index: GridIndex, direction: Direction) -> Option<GridIndex> {
        let (dr, dc) = direction.offset();
        let row = index.row as isize + dr;
        let col = index.col as isize + dc;
        self.contains(row, col).then(|| GridIndex::new(row as usize, col as usize))
    }
}

impl Index<GridIndex> for Grid {
    type Output = Point;

    /// Panics on an index outside the lattice.
    fn index(&self, index: GridIndex) -> &Point {
        assert!(
            index.row <= self.rows && index.col <= self.cols,
            "grid index ({}, {}) outside [0, {}]x[0, {}]",
            index.row,
            index.col,
            self.rows,
            self.cols
        );
        &self.locations[self.flat(index)]
    }
}
