use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("population is already populated")]
    AlreadyPopulated,

    #[error("population has no agents to breed from")]
    NotPopulated,

    #[error("population size mismatch: expected {expected}, found {found}")]
    PopulationSize { expected: usize, found: usize },

    #[error("malformed weights: {0}")]
    MalformedWeights(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
