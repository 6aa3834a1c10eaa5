use crate::model::ModelError;
use thiserror::Error;

/// Round-level failures surfaced to the caller.
///
/// Handler failures are not listed here: they are captured into tool results
/// and sent back to the model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The model asked for a tool that is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The model gateway failed or returned an unusable response.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The optional round cap was reached before a final answer.
    #[error("no final answer after {limit} rounds")]
    RoundLimit { limit: usize },

    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, Error>;
