use std::fmt::Display;

use crate::movie::MovieKey;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store is not initialized")]
    NotInitialized,

    #[error("Database error: {0}")]
    OpenFailed(#[from] OpenError),

    #[error("Error {operation}: {source}")]
    RequestFailed {
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    #[error("No movie found with id: {0}")]
    NotFound(MovieKey),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Store is closed")]
    Closed,
}

impl Error {
    pub(crate) fn request(operation: Operation) -> impl FnOnce(sqlx::Error) -> Error {
        move |source| Error::RequestFailed { operation, source }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("{0}")]
    Connect(#[source] sqlx::Error),

    #[error("requested version {requested} is less than existing version {stored}")]
    VersionConflict { stored: u32, requested: u32 },

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),

    #[error("upgrade to version {version} failed: {source}")]
    Upgrade {
        version: u32,
        #[source]
        source: sqlx::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Get,
    Put,
    Delete,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Add => write!(f, "adding movie"),
            Operation::Get => write!(f, "fetching movie"),
            Operation::Put => write!(f, "updating movie"),
            Operation::Delete => write!(f, "deleting movie"),
        }
    }
}
