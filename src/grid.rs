/// A row-major 2D grid of samples, `rows` × `cols`.
///
/// Holds elevation fields, biome classifications and color samples alike.
/// Unlike a world tilemap there is no wrapping: indices outside the grid panic.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub rows: usize,
    pub cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new_with(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from row-major data. Returns `None` if the length does not match.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) outside {}x{} grid",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over rows as slices, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> {
        // chunks() rejects a zero chunk size
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx / cols, idx % cols, val)
        })
    }

    /// Apply `f` to every cell, producing a grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Grid<f32> {
    /// Minimum and maximum value over the grid, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &v in &self.data {
            if v < min { min = v; }
            if v > max { max = v; }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(2, 3, |r, c| r * 10 + c);
        assert_eq!(grid.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(*grid.get(1, 2), 12);

        let rows: Vec<&[usize]> = grid.rows_iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[10, 11, 12]);
    }

    #[test]
    fn test_iter_coordinates() {
        let grid = Grid::from_fn(3, 2, |r, c| (r, c));
        for (r, c, &v) in grid.iter() {
            assert_eq!((r, c), v);
        }
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![1.0f32; 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![1.0f32; 4]).is_some());
    }

    #[test]
    fn test_min_max() {
        let mut grid = Grid::new_with(4, 4, 0.5f32);
        grid.set(0, 3, -2.0);
        grid.set(3, 1, 7.5);
        assert_eq!(grid.min_max(), Some((-2.0, 7.5)));
        assert_eq!(Grid::<f32>::new_with(0, 0, 0.0).min_max(), None);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let grid = Grid::new_with(2, 2, 0u8);
        let _ = grid.get(2, 0);
    }
}
