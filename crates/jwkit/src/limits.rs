//! Size limit constants for input validation

/// Maximum length for a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum length for key set URLs (2048 characters)
pub(crate) const MAX_JWKS_URL_LENGTH: usize = 2048;

/// Maximum size for a fetched key set document (512KB)
pub(crate) const MAX_JWKS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of keys in a key set document (100 keys)
pub(crate) const MAX_JWK_SET_SIZE: usize = 100;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded token header JSON (8KB)
/// Headers are typically small (< 1KB), but we allow reasonable margin
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded token payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-8192 signatures are 1024 bytes, the largest this crate produces
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

// ============================================================================
// JWK field size limits
// ============================================================================

/// Maximum decoded size for RSA integers (n, d, p, q, dp, dq, qi)
/// 8192-bit keys have 1024-byte moduli
pub(crate) const MAX_RSA_COMPONENT_SIZE: usize = 1024;

/// Maximum decoded size for symmetric secrets (k) (1KB)
pub(crate) const MAX_SYMMETRIC_KEY_SIZE: usize = 1024;

/// Maximum size for JWK key ID (kid) field (256 bytes)
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// Validation bounds
// ============================================================================

/// Maximum leeway applied to temporal claims (300 seconds = 5 minutes)
/// Prevents leeway from effectively disabling expiration checks
pub(crate) const MAX_LEEWAY_SECONDS: u64 = 300;
