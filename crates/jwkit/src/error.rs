//! Errors for jwkit

use thiserror::Error;

/// jwkit Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Key Material Errors
    // ============================================================================
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Incomplete key material: {0}")]
    IncompleteKeyMaterial(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Unknown key field '{0}'")]
    UnknownField(String),

    // ============================================================================
    // Key Set Errors
    // ============================================================================
    #[error("Malformed key set: {0}")]
    MalformedKeySet(String),

    #[error("No key found with kid '{0}'")]
    KeyNotFound(String),

    #[error("Token has no kid and {key_count} keys in the set match its algorithm")]
    AmbiguousKey { key_count: usize },

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),

    #[error("Algorithm '{algorithm}' cannot be used with key type '{key_type}'")]
    AlgorithmKeyMismatch { algorithm: String, key_type: String },

    #[error("Signing requires a private key, found {0}")]
    MissingPrivateComponent(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Malformed compact token: {0}")]
    MalformedCompactToken(String),

    #[error("Malformed token header: {0}")]
    MalformedHeader(String),

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Malformed token payload: {0}")]
    MalformedPayload(String),

    #[error("Token expired at {expired_at} (now: {now})")]
    TokenExpired { expired_at: i64, now: i64 },

    #[error("Token not valid until {not_before} (now: {now})")]
    TokenNotYetValid { not_before: i64, now: i64 },

    #[error("Token issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Token audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("Remote error: {0}")]
    RemoteError(String),
}

/// Result type alias for jwkit operations
pub type Result<T> = std::result::Result<T, Error>;
