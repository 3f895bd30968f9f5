use std::fmt;

/// Caller errors detected before any search work begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid is empty, not square, or holds a value below the blocked sentinel.
    InvalidGrid { reason: String },
    /// A coordinate lies outside `[0, size) x [0, size)`.
    InvalidCoordinate { coord: (isize, isize), size: usize },
    /// Start or goal refers to a blocked cell.
    BlockedEndpoint { coord: (usize, usize) },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid { reason } => write!(f, "invalid grid: {reason}"),
            Self::InvalidCoordinate { coord, size } => {
                write!(f, "coordinate {coord:?} out of bounds for a {size}x{size} grid")
            }
            Self::BlockedEndpoint { coord } => {
                write!(f, "endpoint {coord:?} is a blocked cell")
            }
        }
    }
}

impl std::error::Error for GridError {}
