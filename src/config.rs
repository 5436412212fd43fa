// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::glyph::{CharRange, GlyphSource};
use crate::mask::MaskSettings;
use crate::palette::RainColor;
use crate::viewport::Orientation;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "glyphfall",
    version,
    about = "Falling character rain for the terminal"
)]
pub struct Args {
    #[arg(
        short = 'd',
        long = "direction",
        value_enum,
        default_value_t = Orientation::Vertical,
        help_heading = "GENERAL",
        help = "Direction of rain: h=horizontal, v=vertical"
    )]
    pub direction: Orientation,

    #[arg(
        long = "fps",
        default_value_t = 60,
        help_heading = "GENERAL",
        help = "Frames per second (min 1 max 240)"
    )]
    pub fps: u16,

    #[arg(
        short = 'c',
        long = "color",
        value_enum,
        default_value_t = RainColor::Green,
        help_heading = "APPEARANCE",
        help = "Rain color. The droplet head is always white"
    )]
    pub color: RainColor,

    #[arg(
        short = 'k',
        long = "char-range",
        value_enum,
        default_value_t = CharRange::Ascii,
        help_heading = "APPEARANCE",
        help = "Use rain characters from this range (see --list-ranges)"
    )]
    pub char_range: CharRange,

    #[arg(
        short = 'f',
        long = "file-path",
        help_heading = "APPEARANCE",
        help = "Read characters from a file instead of a random range"
    )]
    pub file_path: Option<PathBuf>,

    #[arg(
        short = 'm',
        long = "mask-path",
        help_heading = "MASK",
        help = "Only rain inside the bright parts of this image"
    )]
    pub mask_path: Option<PathBuf>,

    #[arg(
        short = 'i',
        long = "invert-mask",
        help_heading = "MASK",
        help = "Rain inside the dark parts of the mask instead"
    )]
    pub invert_mask: bool,

    #[arg(
        long = "offset-row",
        default_value_t = 0,
        allow_negative_numbers = true,
        help_heading = "MASK",
        help = "Shift the mask down by N rows"
    )]
    pub offset_row: i32,

    #[arg(
        long = "offset-col",
        default_value_t = 0,
        allow_negative_numbers = true,
        help_heading = "MASK",
        help = "Shift the mask right by N columns"
    )]
    pub offset_col: i32,

    #[arg(
        long = "font-ratio",
        default_value_t = 2,
        help_heading = "MASK",
        help = "Height:width ratio of a terminal cell, used to size the mask (min 1 max 8)"
    )]
    pub font_ratio: u16,

    #[arg(
        long = "list-ranges",
        help_heading = "HELP",
        help = "List available character ranges and exit"
    )]
    pub list_ranges: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available rain colors and exit"
    )]
    pub list_colors: bool,
}

/// Validated settings the engine is built from.
#[derive(Debug)]
pub struct RainConfig {
    pub orientation: Orientation,
    pub color: RainColor,
    pub glyphs: GlyphSource,
    pub mask: Option<MaskSettings>,
    pub fps: u16,
}

fn require_range(name: &'static str, v: u16, min: u16, max: u16) -> Result<u16, ConfigError> {
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: v as i64,
            min: min as i64,
            max: max as i64,
        });
    }
    Ok(v)
}

impl Args {
    pub fn into_config(self) -> Result<RainConfig, ConfigError> {
        let fps = require_range("--fps", self.fps, 1, 240)?;
        let font_ratio = require_range("--font-ratio", self.font_ratio, 1, 8)?;

        let glyphs = match &self.file_path {
            Some(path) => GlyphSource::from_file(path)?,
            None => GlyphSource::from_range(self.char_range),
        };

        let mask = match self.mask_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path));
                }
                Some(MaskSettings {
                    path,
                    invert: self.invert_mask,
                    offset_row: self.offset_row,
                    offset_col: self.offset_col,
                    font_ratio,
                })
            }
            None => None,
        };

        Ok(RainConfig {
            orientation: self.direction,
            color: self.color,
            glyphs,
            mask,
            fps,
        })
    }
}

fn print_heading(title: &str, flag: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", title);
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with {}.\x1b[0m", flag);
    } else {
        println!("{}", title);
        println!("NOTE: Use only the VALUE (left side) with {}.", flag);
    }
    println!();
    println!("VALUE        DESCRIPTION");
}

pub fn print_list_ranges() {
    print_heading("AVAILABLE CHARACTER RANGES:", "--char-range");
    for r in CharRange::ALL {
        println!("{:<12} {}", r.name(), r.description());
    }
}

pub fn print_list_colors() {
    print_heading("AVAILABLE RAIN COLORS:", "--color");
    for c in RainColor::ALL {
        println!("{:<12} {} rain, white head", c.name(), c.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["glyphfall"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_match_classic_rain() {
        let args = parse(&[]);
        assert_eq!(args.direction, Orientation::Vertical);
        assert_eq!(args.color, RainColor::Green);
        assert_eq!(args.char_range, CharRange::Ascii);
        assert_eq!(args.fps, 60);
        assert_eq!(args.font_ratio, 2);

        let cfg = args.into_config().unwrap();
        assert!(cfg.mask.is_none());
        assert!(matches!(cfg.glyphs, GlyphSource::CodePoints { .. }));
    }

    #[test]
    fn enumerated_flags_parse_their_values() {
        let args = parse(&["-d", "h", "-c", "magenta", "-k", "lil-guys"]);
        assert_eq!(args.direction, Orientation::Horizontal);
        assert_eq!(args.color, RainColor::Magenta);
        assert_eq!(args.char_range, CharRange::LilGuys);

        let full = vec!["glyphfall", "--color", "purple"];
        assert!(Args::try_parse_from(full).is_err());
    }

    #[test]
    fn negative_offsets_are_accepted() {
        let args = parse(&["--offset-row", "-3", "--offset-col", "-12"]);
        assert_eq!(args.offset_row, -3);
        assert_eq!(args.offset_col, -12);
    }

    #[test]
    fn missing_files_are_configuration_errors() {
        let err = parse(&["-f", "/no/such/rain.txt"]).into_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));

        let err = parse(&["-m", "/no/such/shape.png"]).into_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn file_path_overrides_char_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poem.txt");
        std::fs::write(&path, "follow the white rabbit\n").unwrap();
        let cfg = parse(&["-k", "emoji", "-f", path.to_str().unwrap()])
            .into_config()
            .unwrap();
        assert!(matches!(cfg.glyphs, GlyphSource::File(_)));
    }

    #[test]
    fn mask_settings_carry_alignment_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.png");
        std::fs::write(&path, b"not really a png").unwrap();
        let cfg = parse(&[
            "-m",
            path.to_str().unwrap(),
            "-i",
            "--offset-row",
            "2",
            "--offset-col",
            "5",
            "--font-ratio",
            "3",
        ])
        .into_config()
        .unwrap();
        let mask = cfg.mask.unwrap();
        assert_eq!(mask.path, path);
        assert!(mask.invert);
        assert_eq!((mask.offset_row, mask.offset_col), (2, 5));
        assert_eq!(mask.font_ratio, 3);
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(matches!(
            parse(&["--fps", "0"]).into_config(),
            Err(ConfigError::OutOfRange { name: "--fps", .. })
        ));
        assert!(matches!(
            parse(&["--font-ratio", "0"]).into_config(),
            Err(ConfigError::OutOfRange {
                name: "--font-ratio",
                ..
            })
        ));
    }
}
