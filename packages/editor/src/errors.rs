//! Error types for the editor

use sitekit_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("No component is selected")]
    NothingSelected,

    #[error("Invalid config: {0}")]
    Config(String),
}
