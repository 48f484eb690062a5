//! Content errors

use std::io;
use thiserror::Error;

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("post not found: {0}")]
    NotFound(String),

    #[error("a post with slug {0:?} already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("front-matter error: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("failed to persist file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl ContentError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::NotFound(_) => "not_found",
            ContentError::Conflict(_) => "conflict",
            ContentError::Validation(_) => "validation",
            ContentError::Io(_) | ContentError::FrontMatter(_) | ContentError::Persist(_) => "io",
        }
    }
}
