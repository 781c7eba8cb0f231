//! Base64URL encoding/decoding per RFC 4648
//!
//! This module provides a thin wrapper around the `base64` crate with
//! size limit validation for untrusted input.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode bytes as unpadded Base64URL
pub(crate) fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode Base64URL string to bytes with maximum size limit
///
/// Errors are plain messages; callers wrap them into the error kind that
/// matches the segment or field being decoded.
pub(crate) fn decode(input: &str, max_size: usize) -> Result<Vec<u8>, String> {
    // Reject before allocating: 4 encoded chars carry 3 bytes
    if input.len() / 4 * 3 > max_size {
        return Err(format!(
            "encoded size exceeds limit: {} chars (max decoded: {max_size} bytes)",
            input.len()
        ));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| format!("base64url decode failed: {e}"))?;

    if result.len() > max_size {
        return Err(format!(
            "decoded size exceeds limit: {} bytes (max: {max_size})",
            result.len()
        ));
    }

    Ok(result)
}
