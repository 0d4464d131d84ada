use diesel::result::DatabaseErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    #[error("Persistence error: {0}")]
    Persistence(#[source] diesel::result::Error),

    #[error("Database unreachable: {0}")]
    Unreachable(#[from] diesel::r2d2::PoolError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
}

/// Coarse error categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DocumentUnreadable,
    Persistence,
    ConstraintViolation,
    Io,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DocumentUnreadable(_) => ErrorKind::DocumentUnreadable,
            Error::Persistence(_) | Error::Unreachable(_) => ErrorKind::Persistence,
            Error::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) | Error::UnsupportedDatabase(_) => ErrorKind::Config,
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Error::ConstraintViolation(info.message().to_string())
            }
            other => Error::Persistence(other),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::DocumentUnreadable(err.to_string())
    }
}
