use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::stream::Position;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("failed to read the input: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// The first problem found while scanning. Scanning never continues past one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("empty file")]
    EmptyInput,
    #[error("no record found")]
    NoRecord,
    /// A character other than `0`-`9` or `A`-`F` where a digit was required.
    #[error("expected uppercase hex digit at {position}, found {:?}", char::from(*.input))]
    MalformedDigit { position: Position, input: u8 },
    /// The low byte of a finished record's sum is not zero.
    #[error("wrong checksum at {position}, record sums to {low_byte:#04X}")]
    Checksum { position: Position, low_byte: u8 },
    /// Only reported when `ScanOptions::reject_unterminated` is set.
    #[error("unterminated record at {position}")]
    UnterminatedRecord { position: Position },
}

impl ScanError {
    /// Fixed diagnostic text shown to users.
    pub fn message(&self) -> &'static str {
        use ScanError::*;
        match self {
            EmptyInput => "empty file.",
            NoRecord => "No record found.",
            MalformedDigit { .. } => "Expected uppercase hex digit.",
            Checksum { .. } => "Wrong CRC.",
            UnterminatedRecord { .. } => "Unterminated record.",
        }
    }

    pub fn position(&self) -> Option<Position> {
        use ScanError::*;
        match self {
            EmptyInput | NoRecord => None,
            MalformedDigit { position, .. }
            | Checksum { position, .. }
            | UnterminatedRecord { position } => Some(*position),
        }
    }

    /// The byte shown in the `INVALID INPUT` slot. For a checksum failure this is the
    /// low byte of the record sum, not a character from the input.
    pub fn offending_byte(&self) -> Option<u8> {
        use ScanError::*;
        match self {
            MalformedDigit { input, .. } => Some(*input),
            Checksum { low_byte, .. } => Some(*low_byte),
            EmptyInput | NoRecord | UnterminatedRecord { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
