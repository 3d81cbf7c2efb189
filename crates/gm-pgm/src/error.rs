use core::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Width,
    Height,
    Maxval,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
            Self::Maxval => f.write_str("maxval"),
        }
    }
}

#[derive(Debug)]
pub enum PgmError {
    Io(io::Error),
    BadMagic,
    BadHeader { field: HeaderField },
    MissingSeparator,
    Truncated { expected: usize, actual: usize },
    Image(gm_core::Error),
}

impl fmt::Display for PgmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::BadMagic => write!(f, "not a raw PGM file (expected P5)"),
            Self::BadHeader { field } => write!(f, "invalid {field} in PGM header"),
            Self::MissingSeparator => write!(f, "whitespace expected after maxval"),
            Self::Truncated { expected, actual } => {
                write!(f, "truncated pixel data: expected {expected} bytes, got {actual}")
            }
            Self::Image(e) => write!(f, "image error: {e}"),
        }
    }
}

impl std::error::Error for PgmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PgmError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<gm_core::Error> for PgmError {
    fn from(e: gm_core::Error) -> Self {
        Self::Image(e)
    }
}
