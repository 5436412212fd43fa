// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RainColor {
    #[default]
    #[value(name = "green")]
    Green,
    #[value(name = "red")]
    Red,
    #[value(name = "blue")]
    Blue,
    #[value(name = "yellow")]
    Yellow,
    #[value(name = "magenta")]
    Magenta,
    #[value(name = "cyan")]
    Cyan,
    #[value(name = "white")]
    White,
}

/// Color of every droplet head, whatever the rain color is.
pub const HEAD_COLOR: Color = Color::White;

impl RainColor {
    pub const ALL: [RainColor; 7] = [
        RainColor::Green,
        RainColor::Red,
        RainColor::Blue,
        RainColor::Yellow,
        RainColor::Magenta,
        RainColor::Cyan,
        RainColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RainColor::Green => "green",
            RainColor::Red => "red",
            RainColor::Blue => "blue",
            RainColor::Yellow => "yellow",
            RainColor::Magenta => "magenta",
            RainColor::Cyan => "cyan",
            RainColor::White => "white",
        }
    }

    /// Bright member of the 16-color set.
    pub fn fg(self) -> Color {
        match self {
            RainColor::Green => Color::Green,
            RainColor::Red => Color::Red,
            RainColor::Blue => Color::Blue,
            RainColor::Yellow => Color::Yellow,
            RainColor::Magenta => Color::Magenta,
            RainColor::Cyan => Color::Cyan,
            RainColor::White => Color::White,
        }
    }
}
