//! Error types shared by the loader, the view and the server

use thiserror::Error;

/// Library-level error
#[derive(Debug, Error)]
pub enum Error {
    /// No post matches the requested slug
    #[error("no post found for slug `{0}`")]
    NotFound(String),

    /// The content store query failed (transport, status or decoding)
    #[error("content store error: {0}")]
    Store(String),

    /// The comment endpoint could not be reached or rejected the submission
    #[error("comment submission failed: {0}")]
    Submission(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
