use std::fmt;

/// Result type for persist-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Interval or median requested over zero values
    EmptySample,

    /// Interval probability mass outside the open interval (0, 1)
    InvalidProbability(f64),

    /// Records grouped together disagree on their shared key
    DataIntegrity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptySample => write!(f, "Cannot summarize an empty sample"),
            Error::InvalidProbability(p) => {
                write!(f, "Interval probability must be in (0, 1), got {}", p)
            }
            Error::DataIntegrity(msg) => write!(f, "Data integrity error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
