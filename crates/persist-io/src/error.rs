use std::fmt;

/// Result type for persist-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading inputs
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// CSV/TSV decoding failed
    Csv(csv::Error),

    /// Walkdir error
    WalkDir(walkdir::Error),

    /// Tip date pattern did not compile
    Regex(regex::Error),

    /// No input table was discovered for the lineage
    InputNotFound(String),

    /// A row is missing fields or carries a non-numeric time
    MalformedRecord { line: u64, message: String },

    /// Reference tree could not be parsed or carries no dated tips
    Tree(String),

    /// Date text or decimal year out of range
    Date(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
            Error::Regex(err) => write!(f, "Invalid tip date pattern: {}", err),
            Error::InputNotFound(msg) => write!(f, "Input not found: {}", msg),
            Error::MalformedRecord { line, message } => {
                write!(f, "Malformed record at line {}: {}", line, message)
            }
            Error::Tree(msg) => write!(f, "Tree error: {}", msg),
            Error::Date(msg) => write!(f, "Date error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Regex(err) => Some(err),
            Error::InputNotFound(_)
            | Error::MalformedRecord { .. }
            | Error::Tree(_)
            | Error::Date(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            return Error::MalformedRecord {
                line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                message: format!("expected {} fields, found {}", expected_len, len),
            };
        }
        Error::Csv(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}
