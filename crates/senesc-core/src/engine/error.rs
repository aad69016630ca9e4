use thiserror::Error;

use crate::core::models::records::RecordError;
use crate::core::senescence::rules::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid roots record '{id}': {source}")]
    InvalidRoots { id: String, source: RecordError },

    #[error("Invalid element record '{id}': {source}")]
    InvalidElement { id: String, source: RecordError },

    #[error("Senescence rule failed for roots '{id}': {source}")]
    RootsRule { id: String, source: ModelError },

    #[error("Senescence rule failed for element '{id}': {source}")]
    ElementRule { id: String, source: ModelError },

    #[error("No roots record '{id}' to apply outputs to")]
    MissingRootsRecord { id: String },

    #[error("No element record '{id}' to apply outputs to")]
    MissingElementRecord { id: String },
}
