// Copyright (c) 2026 rezky_nightky

use std::io::Write;

use rand::rngs::StdRng;

use crate::{
    droplet::{Droplet, Paint, Stroke},
    error::RainError,
    frame::FrameBuffer,
    glyph::{Glyph, GlyphSource},
    mask::{MaskOverlay, MaskTask},
    palette::{RainColor, HEAD_COLOR},
    viewport::{Orientation, Viewport},
};

/// Every column carries this many independent droplets.
pub const DROPLETS_PER_COLUMN: usize = 2;

pub struct RainEngine<W: Write> {
    viewport: Viewport,
    columns: Vec<[Droplet; DROPLETS_PER_COLUMN]>,
    glyphs: GlyphSource,
    color: RainColor,
    mask: Option<MaskOverlay>,
    mask_task: Option<MaskTask>,
    out: FrameBuffer<W>,
    rng: StdRng,
}

impl<W: Write> RainEngine<W> {
    pub fn new(
        out: W,
        glyphs: GlyphSource,
        orientation: Orientation,
        color: RainColor,
        mask_task: Option<MaskTask>,
        rng: StdRng,
    ) -> Self {
        let (orientation, color) = if glyphs.forces_horizontal() {
            tracing::info!("literal glyphs: forcing horizontal white rain");
            (Orientation::Horizontal, RainColor::White)
        } else {
            (orientation, color)
        };

        Self {
            viewport: Viewport::new(orientation),
            columns: Vec::new(),
            glyphs,
            color,
            mask: None,
            mask_task,
            out: FrameBuffer::new(out),
            rng,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[cfg(test)]
    pub fn color(&self) -> RainColor {
        self.color
    }

    #[cfg(test)]
    pub fn droplets(&self) -> impl Iterator<Item = &Droplet> + '_ {
        self.columns.iter().flat_map(|pair| pair.iter())
    }

    /// Applies a new terminal size. Columns that survive keep their
    /// droplets; new columns get fresh ones; the mask is recomputed in the
    /// background.
    pub fn resize(&mut self, raw_cols: u16, raw_rows: u16) {
        self.viewport.resize(raw_cols, raw_rows);
        let (cols, rows) = self.viewport.physical_size();
        self.out.set_bounds(cols, rows);

        let want = self.viewport.num_cols as usize;
        let num_rows = self.viewport.num_rows;
        if want > self.columns.len() {
            for col in self.columns.len()..want {
                let col = col as u16;
                let pair = [
                    Droplet::new(col, num_rows, &mut self.glyphs, &mut self.rng),
                    Droplet::new(col, num_rows, &mut self.glyphs, &mut self.rng),
                ];
                self.columns.push(pair);
            }
        } else {
            self.columns.truncate(want);
        }

        tracing::debug!(
            cols = self.viewport.num_cols,
            rows = self.viewport.num_rows,
            droplets = self.columns.len() * DROPLETS_PER_COLUMN,
            "viewport resized"
        );

        if let Some(task) = self.mask_task.as_mut() {
            task.submit(raw_cols, raw_rows);
        }
    }

    /// One tick: install any finished mask, step every droplet, flush once.
    pub fn render_frame(&mut self) -> Result<(), RainError> {
        if let Some(task) = self.mask_task.as_mut() {
            if let Some(mask) = task.poll()? {
                self.mask = Some(mask);
            }
        }

        let Self {
            viewport,
            columns,
            glyphs,
            color,
            mask,
            out,
            rng,
            ..
        } = self;

        for pair in columns.iter_mut() {
            for d in pair.iter_mut() {
                if let Some(strokes) = d.tick() {
                    for s in strokes {
                        paint(out, viewport, mask.as_ref(), *color, d.column, s);
                    }
                }
                if d.expired(viewport.num_rows) {
                    *d = Droplet::respawn(d.column, viewport.num_rows, glyphs, rng);
                }
            }
        }

        out.flush()?;
        Ok(())
    }
}

fn paint<W: Write>(
    out: &mut FrameBuffer<W>,
    viewport: &Viewport,
    mask: Option<&MaskOverlay>,
    color: RainColor,
    column: u16,
    stroke: Stroke,
) {
    let Some(glyph) = stroke.glyph else {
        return;
    };
    let (row, col) = viewport.transform(stroke.row, column as i32);

    if mask.is_some_and(|m| m.suppresses(row, col)) {
        out.write_at(row, col, Glyph::BLANK, None);
        return;
    }

    let fg = match stroke.paint {
        Paint::Trail => Some(color.fg()),
        Paint::Head => Some(HEAD_COLOR),
        Paint::Erase => None,
    };
    out.write_at(row, col, glyph, fg);
}
