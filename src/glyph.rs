// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::ConfigError;

/// One display unit of a droplet trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Char(char),
    Literal(&'static str),
}

impl Glyph {
    pub const BLANK: Glyph = Glyph::Char(' ');
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Char(c) => write!(f, "{}", c),
            Glyph::Literal(s) => f.write_str(s),
        }
    }
}

pub const LIL_GUY: &str = "  ~~o ";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharRange {
    #[value(name = "ascii")]
    Ascii,
    #[value(name = "binary")]
    Binary,
    #[value(name = "braille")]
    Braille,
    #[value(name = "emoji")]
    Emoji,
    #[value(name = "katakana")]
    Katakana,
    #[value(name = "picto")]
    Picto,
    #[value(name = "lil-guys")]
    LilGuys,
}

impl CharRange {
    pub const ALL: [CharRange; 7] = [
        CharRange::Ascii,
        CharRange::Binary,
        CharRange::Braille,
        CharRange::Emoji,
        CharRange::Katakana,
        CharRange::Picto,
        CharRange::LilGuys,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharRange::Ascii => "ascii",
            CharRange::Binary => "binary",
            CharRange::Braille => "braille",
            CharRange::Emoji => "emoji",
            CharRange::Katakana => "katakana",
            CharRange::Picto => "picto",
            CharRange::LilGuys => "lil-guys",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CharRange::Ascii => "Printable ASCII",
            CharRange::Binary => "0 and 1",
            CharRange::Braille => "Braille patterns",
            CharRange::Emoji => "Smiley emoji (double width)",
            CharRange::Katakana => "Katakana",
            CharRange::Picto => "CJK ideographs",
            CharRange::LilGuys => "Little swimmers (forces horizontal white rain)",
        }
    }

    /// Closed code point interval sampled for this range.
    fn bounds(self) -> Option<(u32, u32)> {
        match self {
            CharRange::Ascii => Some((0x21, 0x7D)),
            CharRange::Binary => Some((0x30, 0x31)),
            CharRange::Braille => Some((0x2840, 0x28FE)),
            CharRange::Emoji => Some((0x1F601, 0x1F649)),
            CharRange::Katakana => Some((0x30A0, 0x30FE)),
            CharRange::Picto => Some((0x4E00, 0x9FA5)),
            CharRange::LilGuys => None,
        }
    }
}

/// Trimmed text of a file plus the read position every droplet shares.
#[derive(Clone, Debug)]
pub struct FileText {
    chars: Vec<char>,
    cursor: usize,
}

impl FileText {
    pub fn new(text: &str) -> Option<Self> {
        let chars: Vec<char> = text.trim().chars().collect();
        if chars.is_empty() {
            return None;
        }
        Some(Self { chars, cursor: 0 })
    }

    fn next_glyph(&mut self) -> Glyph {
        if self.cursor >= self.chars.len() {
            self.cursor = 0;
        }
        let ch = self.chars[self.cursor];
        self.cursor += 1;
        Glyph::Char(ch)
    }
}

#[derive(Clone, Debug)]
pub enum GlyphSource {
    CodePoints { lo: u32, hi: u32 },
    Literal(&'static str),
    File(FileText),
}

impl GlyphSource {
    pub fn from_range(range: CharRange) -> Self {
        match range.bounds() {
            Some((lo, hi)) => GlyphSource::CodePoints { lo, hi },
            None => GlyphSource::Literal(LIL_GUY),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        FileText::new(&text)
            .map(GlyphSource::File)
            .ok_or_else(|| ConfigError::EmptyFile(path.to_path_buf()))
    }

    /// The literal source draws sideways in a fixed color.
    pub fn forces_horizontal(&self) -> bool {
        matches!(self, GlyphSource::Literal(_))
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) -> Vec<Glyph> {
        match self {
            GlyphSource::CodePoints { lo, hi } => (0..len)
                .map(|_| {
                    char::from_u32(rng.random_range(*lo..=*hi))
                        .map(Glyph::Char)
                        .unwrap_or(Glyph::BLANK)
                })
                .collect(),
            GlyphSource::Literal(s) => vec![Glyph::Literal(*s); len],
            GlyphSource::File(text) => (0..len).map(|_| text.next_glyph()).collect(),
        }
    }
}
