use thiserror::Error;

/// Errors raised by model-level operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid slug: '{0}'")]
    InvalidSlug(String),

    #[error("Duplicate page slug: '{0}'")]
    DuplicatePageSlug(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Unknown device view: '{0}'")]
    UnknownDevice(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Serialization(e.to_string())
    }
}

/// Model result alias
pub type ModelResult<T> = Result<T, ModelError>;
