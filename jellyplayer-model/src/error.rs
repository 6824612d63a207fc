use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidId(String),
    InvalidRange { start: u64, end: u64 },
    InvalidTrickplay(String),
    UnknownSegmentKind(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId(msg) => write!(f, "invalid id: {msg}"),
            ModelError::InvalidRange { start, end } => {
                write!(f, "invalid range: {start} is not before {end}")
            }
            ModelError::InvalidTrickplay(msg) => {
                write!(f, "invalid trickplay info: {msg}")
            }
            ModelError::UnknownSegmentKind(kind) => {
                write!(f, "unknown segment kind '{kind}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
