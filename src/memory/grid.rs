//! Toroidal program grid for the grid machine
//!
//! Rows are source lines and the width is the longest line; shorter lines are padded
//! with blanks. Cells store code points as `i64` so the put instruction can write any
//! value and the get instruction can read it back unchanged.
//!
//! The grid is a private copy of the source. Self-modification never touches the
//! caller's text.

const BLANK: i64 = b' ' as i64;

/// A cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i64>,
    /// Character offset in the source where each row starts
    row_offsets: Vec<usize>,
}

impl Grid {
    pub fn from_source(source: &str) -> Self {
        let mut rows: Vec<Vec<i64>> = Vec::new();
        let mut row_offsets = Vec::new();
        let mut offset = 0;

        for line in source.split('\n') {
            row_offsets.push(offset);
            offset += line.chars().count() + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);
            rows.push(line.chars().map(|c| c as i64).collect());
        }
        // A trailing newline does not open a new row
        if rows.len() > 1 && rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
            row_offsets.pop();
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = vec![BLANK; width * height];
        for (y, row) in rows.iter().enumerate() {
            cells[y * width..y * width + row.len()].copy_from_slice(row);
        }

        Grid {
            width,
            height,
            cells,
            row_offsets,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn cell(&self, at: Point) -> i64 {
        self.cells[at.y * self.width + at.x]
    }

    /// Index a cell by signed coordinates, `None` when outside the grid
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<i64> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Returns false and leaves the grid untouched when out of range
    pub fn put(&mut self, x: i64, y: i64, value: i64) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Move one cell along `(dx, dy)`, wrapping each axis independently
    pub fn advance(&self, at: Point, dx: i64, dy: i64) -> Point {
        let x = (at.x as i64 + dx).rem_euclid(self.width as i64);
        let y = (at.y as i64 + dy).rem_euclid(self.height as i64);
        Point {
            x: x as usize,
            y: y as usize,
        }
    }

    /// Character offset of a cell in the original source, for error positions
    pub fn source_offset(&self, at: Point) -> usize {
        self.row_offsets.get(at.y).copied().unwrap_or(0) + at.x
    }
}
