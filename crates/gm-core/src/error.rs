use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sample storage could not be obtained. `requested` is the sample count,
    /// `usize::MAX` when `width * height` overflows.
    Allocation { requested: usize },
    SizeMismatch { expected: usize, actual: usize },
    OutOfBounds,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { requested } => {
                write!(f, "failed to allocate storage for {requested} samples")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::OutOfBounds => write!(f, "out of bounds"),
        }
    }
}

impl std::error::Error for Error {}
