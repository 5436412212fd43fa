// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::glyph::{Glyph, GlyphSource};

pub const MAX_SPEED: u32 = 20;

/// How a stroke is colored when it reaches the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Trail,
    Head,
    Erase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub row: i32,
    pub glyph: Option<Glyph>,
    pub paint: Paint,
}

/// One falling trail bound to a column.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub column: u16,
    pub head_row: i32,
    pub trail_height: i32,
    pub speed: u32,
    pub tick_count: u32,
    pub glyphs: Vec<Glyph>,
}

fn rand_between<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..hi)
    }
}

impl Droplet {
    /// Fresh droplet for a newly added column, starting somewhere on screen.
    pub fn new<R: Rng + ?Sized>(
        column: u16,
        num_rows: u16,
        source: &mut GlyphSource,
        rng: &mut R,
    ) -> Self {
        let head_row = rand_between(rng, 0, num_rows as i32);
        Self::with_head(column, num_rows, head_row, source, rng)
    }

    /// Replacement for a droplet that fell past the bottom; starts at the top.
    pub fn respawn<R: Rng + ?Sized>(
        column: u16,
        num_rows: u16,
        source: &mut GlyphSource,
        rng: &mut R,
    ) -> Self {
        Self::with_head(column, num_rows, 0, source, rng)
    }

    fn with_head<R: Rng + ?Sized>(
        column: u16,
        num_rows: u16,
        head_row: i32,
        source: &mut GlyphSource,
        rng: &mut R,
    ) -> Self {
        let rows = num_rows as i32;
        Self {
            column,
            head_row,
            trail_height: rand_between(rng, rows / 2, rows),
            speed: rng.random_range(1..MAX_SPEED),
            tick_count: 0,
            glyphs: source.generate(num_rows as usize, rng),
        }
    }

    fn glyph(&self, row: i32) -> Option<Glyph> {
        usize::try_from(row)
            .ok()
            .and_then(|i| self.glyphs.get(i).copied())
    }

    /// Advances the tick counter. Every `speed` ticks the head moves down one
    /// row and the strokes to draw are returned: the old head recolored as
    /// trail, the new head, and the cell leaving the trail.
    pub fn tick(&mut self) -> Option<[Stroke; 3]> {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.tick_count % self.speed != 0 {
            return None;
        }

        let head = self.head_row;
        let strokes = [
            Stroke {
                row: head - 1,
                glyph: self.glyph(head - 1),
                paint: Paint::Trail,
            },
            Stroke {
                row: head,
                glyph: self.glyph(head),
                paint: Paint::Head,
            },
            Stroke {
                row: head - self.trail_height,
                glyph: Some(Glyph::BLANK),
                paint: Paint::Erase,
            },
        ];
        self.head_row += 1;
        Some(strokes)
    }

    pub fn expired(&self, num_rows: u16) -> bool {
        self.head_row - self.trail_height > num_rows as i32
    }
}
