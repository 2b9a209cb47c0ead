use std::path::PathBuf;

/// Errors raised by snapshot export and import.
///
/// An import that finds no branches is not an error; see
/// [`ImportOutcome::NoBranchesFound`](crate::model::ImportOutcome::NoBranchesFound).
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("i/o failure while {context}: {source}")]
    IoFailure {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("fetch from remote '{remote}' failed: {reason}")]
    FetchFailure { remote: String, reason: String },

    #[error("invalid bundle: {0}")]
    InvalidBundle(String),

    #[error("invalid refspec: {0}")]
    InvalidRefSpec(String),

    #[error("another snapshot operation holds the lock at {0}")]
    Busy(PathBuf),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Wrap an I/O-like error with a description of what was being done.
pub fn io_err(
    context: impl Into<String>,
    e: impl std::error::Error + Send + Sync + 'static,
) -> ExchangeError {
    ExchangeError::IoFailure {
        context: context.into(),
        source: Box::new(e),
    }
}

/// Translate a git2 lookup failure into [`ExchangeError::ObjectNotFound`].
pub fn lookup_err(what: impl std::fmt::Display, e: git2::Error) -> ExchangeError {
    match e.code() {
        git2::ErrorCode::NotFound => ExchangeError::ObjectNotFound(what.to_string()),
        _ => ExchangeError::Git(e),
    }
}
