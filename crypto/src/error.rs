use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("transaction has {count} {kind}, at most {max} allowed")]
    TooMany {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("expected {expected} signing keys, got {got}")]
    KeyCountMismatch { expected: usize, got: usize },

    #[error("input position {0} cannot be encoded")]
    UnencodablePosition(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("malformed transaction encoding: {0}")]
    Encoding(String),
}
