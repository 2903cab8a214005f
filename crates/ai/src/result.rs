use thiserror::Error;

use shelfwise_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdviceError {
    /// The batch was empty: nothing to advise on. Not a system fault.
    #[error("no data: {0}")]
    NoData(String),

    #[error("invalid job input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AdviceError {
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

impl From<DomainError> for AdviceError {
    fn from(value: DomainError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}
