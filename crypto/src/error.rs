use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("malformed public key for address {0}")]
    MalformedKey(String),

    #[error("random source unavailable: {0}")]
    Randomness(String),
}
