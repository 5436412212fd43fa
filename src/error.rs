// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::PathBuf;

use crate::mask::MaskError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} doesn't exist", .0.display())]
    MissingFile(PathBuf),

    #[error("{} has no characters to rain", .0.display())]
    EmptyFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RainError {
    #[error("Output is not a text terminal")]
    NotATerminal,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("mask: {0}")]
    Mask(#[from] MaskError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
