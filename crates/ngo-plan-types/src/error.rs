//! Document loading errors

use thiserror::Error;

/// Errors raised while loading or validating a plan document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse plan document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("node at {path} has an empty name")]
    EmptyName { path: String },

    #[error("failed to read plan document: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    /// Short stable code, used in log fields and the error page
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::Parse(_) => "DOC_PARSE",
            DocumentError::EmptyName { .. } => "DOC_EMPTY_NAME",
            DocumentError::Io(_) => "DOC_IO",
        }
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
