use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable configuration could be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database could not be reached at startup.
    #[error("connection error: {0}")]
    Connection(String),

    /// A query reported no columns at all.
    #[error("query returned an empty column set")]
    EmptyColumnSet,

    /// Executing a statement or reading its result failed.
    #[error("{0}")]
    Execution(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn execution(err: impl std::fmt::Display) -> Self {
        Self::Execution(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Execution(err.to_string())
    }
}
