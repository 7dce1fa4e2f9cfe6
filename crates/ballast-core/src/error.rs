use thiserror::Error;

/// Protocol-wide error types for the Ballast Protocol.
///
/// Each variant is one failure class; the message carries the specifics.
/// Operations fail atomically, so an error always means zero state change.
#[derive(Debug, Error)]
pub enum BallastError {
    /// Malformed input: zero address, out-of-range trust or weight, zero
    /// amount, empty name, per-user credential cap, repaying zero debt,
    /// self-liquidation, liquidating a healthy position.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller lacks the authority role, or the issuer/type involved has
    /// been deactivated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown issuer, credential type, asset, or uninitialized tier table.
    #[error("Not found: {0}")]
    NotFound(String),

    /// State conflict: duplicate registration, credential replay, tier
    /// table already initialized, asset already enabled/disabled.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Credential already expired at submission time.
    #[error("Expired: {0}")]
    Expired(String),

    /// Cryptographic failure: the signature does not verify under the
    /// claimed issuer's key, or key/signature bytes are malformed.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Collateral shortfall: a borrow or withdrawal would leave the
    /// position below its collateral requirement or health floor.
    #[error("Insolvent: {0}")]
    Insolvent(String),

    /// The pool cannot cover the requested amount with idle liquidity.
    #[error("Insufficient liquidity: {0}")]
    Liquidity(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A guarded operation was re-entered before completing.
    #[error("Reentrant call rejected")]
    Reentrancy,
}

impl From<serde_json::Error> for BallastError {
    fn from(e: serde_json::Error) -> Self {
        BallastError::Serialization(e.to_string())
    }
}

impl From<ed25519_dalek::SignatureError> for BallastError {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        BallastError::Crypto(e.to_string())
    }
}
