use std::fmt;

/// Result type for persist-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A time coordinate was NaN or infinite
    NonFiniteTime { field: &'static str, value: f64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonFiniteTime { field, value } => {
                write!(f, "Invalid time value for {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for Error {}
