// Copyright (c) 2026 rezky_nightky

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    #[value(name = "v")]
    Vertical,
    #[value(name = "h")]
    Horizontal,
}

/// Logical rain area. Droplets always fall along the row axis; in
/// horizontal mode the terminal axes are swapped on the way in and out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub num_cols: u16,
    pub num_rows: u16,
    pub orientation: Orientation,
}

impl Viewport {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            num_cols: 0,
            num_rows: 0,
            orientation,
        }
    }

    pub fn resize(&mut self, raw_cols: u16, raw_rows: u16) {
        let (cols, rows) = match self.orientation {
            Orientation::Vertical => (raw_cols, raw_rows),
            Orientation::Horizontal => (raw_rows, raw_cols),
        };
        self.num_cols = cols;
        self.num_rows = rows;
    }

    /// Maps logical `(row, col)` to terminal `(row, col)`. Self-inverse.
    pub fn transform(&self, row: i32, col: i32) -> (i32, i32) {
        match self.orientation {
            Orientation::Vertical => (row, col),
            Orientation::Horizontal => (col, row),
        }
    }

    /// Terminal size as `(cols, rows)`.
    pub fn physical_size(&self) -> (u16, u16) {
        match self.orientation {
            Orientation::Vertical => (self.num_cols, self.num_rows),
            Orientation::Horizontal => (self.num_rows, self.num_cols),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_swaps_terminal_dimensions() {
        let mut vp = Viewport::new(Orientation::Horizontal);
        vp.resize(80, 24);
        assert_eq!(vp.num_cols, 24);
        assert_eq!(vp.num_rows, 80);
        assert_eq!(vp.physical_size(), (80, 24));
    }

    #[test]
    fn vertical_keeps_terminal_dimensions() {
        let mut vp = Viewport::new(Orientation::Vertical);
        vp.resize(80, 24);
        assert_eq!((vp.num_cols, vp.num_rows), (80, 24));
        assert_eq!(vp.physical_size(), (80, 24));
    }

    #[test]
    fn transform_is_self_inverse() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let mut vp = Viewport::new(orientation);
            vp.resize(80, 24);
            for (r, c) in [(0, 0), (3, 17), (-4, 9), (79, 23), (100, -1)] {
                let (pr, pc) = vp.transform(r, c);
                assert_eq!(vp.transform(pr, pc), (r, c));
            }
        }
    }
}
