use splitter_types::Amount;
use thiserror::Error;

/// Every way a split run can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("configured fee token {0} is not a supported fee token")]
    UnsupportedFeeToken(String),

    #[error("indexing service error: {0}")]
    IndexingService(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<splitter_crypto::CryptoError> for SplitError {
    fn from(e: splitter_crypto::CryptoError) -> Self {
        SplitError::Signing(e.to_string())
    }
}
