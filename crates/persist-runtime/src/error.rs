use std::fmt;

/// Result type for persist-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Classification or aggregation failed
    Engine(persist_engine::Error),

    /// Input discovery, record parsing or tree loading failed
    Input(persist_io::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Writing an output table failed
    Csv(csv::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Engine(err) => write!(f, "{}", err),
            Error::Input(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(err) => Some(err),
            Error::Input(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<persist_engine::Error> for Error {
    fn from(err: persist_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<persist_io::Error> for Error {
    fn from(err: persist_io::Error) -> Self {
        Error::Input(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
