// Copyright (c) 2026 rezky_nightky

use std::fmt::Write as _;
use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{Color, SetForegroundColor},
    Command,
};

use crate::glyph::Glyph;

/// Collects one tick of cursor moves, colors and glyphs and hands them to
/// the terminal in a single write.
pub struct FrameBuffer<W: Write> {
    out: W,
    buf: String,
    cols: u16,
    rows: u16,
}

impl<W: Write> FrameBuffer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: String::with_capacity(4096),
            cols: 0,
            rows: 0,
        }
    }

    /// Terminal size writes are clipped to.
    pub fn set_bounds(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn write_at(&mut self, row: i32, col: i32, glyph: Glyph, color: Option<Color>) {
        if row < 0 || row >= self.rows as i32 || col < 0 || col >= self.cols as i32 {
            return;
        }
        // Writing into a String cannot fail.
        let _ = cursor::MoveTo(col as u16, row as u16).write_ansi(&mut self.buf);
        if let Some(fg) = color {
            let _ = SetForegroundColor(fg).write_ansi(&mut self.buf);
        }
        let _ = write!(self.buf, "{}", glyph);
    }

    #[cfg(test)]
    pub fn pending(&self) -> &str {
        &self.buf
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(self.buf.as_bytes())?;
        self.out.flush()?;
        self.buf.clear();
        Ok(())
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
