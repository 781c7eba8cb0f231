//! Compact JWS/JWT codec
//!
//! Issuing builds `base64url(header) . base64url(claims) . base64url(sig)`.
//! Parsing runs as a chain of stages, each consuming the previous one:
//!
//! ```text
//! &str ──parse──> ParsedToken ──verify(key)──> VerifiedToken ──claims()──> TokenClaims
//! ```
//!
//! Claims are only decoded from a `VerifiedToken`, so no unverified
//! payload can leave this module.

mod header;

pub use header::TokenHeader;

use crate::algorithm::{self, Algorithm};
use crate::claims::{unix_now, TokenClaims, ValidationOptions};
use crate::error::{Error, Result};
use crate::jwks::KeySet;
use crate::keys::KeyMaterial;
use crate::limits::{MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE, MAX_TOKEN_LENGTH};
use crate::utils::base64url;

/// A split token with a decoded header; nothing is trusted yet
#[derive(Debug)]
pub(crate) struct ParsedToken<'a> {
    header: TokenHeader,
    signing_input: &'a str,
    payload: &'a str,
    signature: &'a str,
}

/// A token whose signature has been checked against a key
#[derive(Debug)]
pub(crate) struct VerifiedToken<'a> {
    payload: &'a str,
}

impl<'a> ParsedToken<'a> {
    /// Split into exactly three segments and decode the header
    pub(crate) fn parse(compact: &'a str) -> Result<Self> {
        if compact.len() > MAX_TOKEN_LENGTH {
            return Err(Error::MalformedCompactToken(format!(
                "token too large: {} bytes (maximum: {MAX_TOKEN_LENGTH} bytes)",
                compact.len()
            )));
        }

        let segments: Vec<&str> = compact.split('.').collect();
        let [header, payload, signature] = segments[..] else {
            return Err(Error::MalformedCompactToken(format!(
                "expected 3 segments separated by '.', found {}",
                segments.len()
            )));
        };

        // The signing input is everything before the last '.'
        let signing_input = &compact[..header.len() + 1 + payload.len()];

        Ok(Self {
            header: TokenHeader::decode(header)?,
            signing_input,
            payload,
            signature,
        })
    }

    pub(crate) fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Select the verification key from a key set
    ///
    /// A `kid` must name a key in the set. Without `kid` exactly one key in
    /// the set may suit the header algorithm.
    pub(crate) fn resolve_key<'k>(&self, keys: &'k KeySet) -> Result<&'k KeyMaterial> {
        if let Some(kid) = &self.header.key_id {
            return keys.lookup(kid);
        }

        let algorithm = self.header.algorithm;
        let mut candidates = keys
            .iter()
            .filter(|key| algorithm.ensure_compatible(key).is_ok());

        match (candidates.next(), candidates.next()) {
            (Some(key), None) => Ok(key),
            (None, _) => Err(Error::AmbiguousKey { key_count: 0 }),
            (Some(_), Some(_)) => Err(Error::AmbiguousKey {
                key_count: 2 + candidates.count(),
            }),
        }
    }

    /// Check the signature over `header.payload` with `key`
    pub(crate) fn verify(self, key: &KeyMaterial) -> Result<VerifiedToken<'a>> {
        // Undecodable signature bytes can never verify
        let signature = base64url::decode(self.signature, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| Error::InvalidSignature)?;

        let valid = algorithm::verify(
            self.signing_input.as_bytes(),
            &signature,
            self.header.algorithm,
            key,
        )?;

        if !valid {
            tracing::debug!(
                algorithm = self.header.algorithm.as_str(),
                kid = key.key_id(),
                "token signature rejected"
            );
            return Err(Error::InvalidSignature);
        }

        Ok(VerifiedToken {
            payload: self.payload,
        })
    }
}

impl VerifiedToken<'_> {
    /// Decode the payload segment into claims
    pub(crate) fn claims(&self) -> Result<TokenClaims> {
        let bytes = base64url::decode(self.payload, MAX_DECODED_PAYLOAD_SIZE)
            .map_err(Error::MalformedPayload)?;

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::MalformedPayload(format!("invalid claims JSON: {e}")))
    }
}

/// Sign claims into a compact token
///
/// The header is `{"alg", "kid"?, "typ":"JWT"}`; `kid` is taken from the
/// key when it has one.
pub fn sign(claims: &TokenClaims, algorithm: Algorithm, key: &KeyMaterial) -> Result<String> {
    let header = TokenHeader::new(algorithm, key.key_id()).encode()?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| Error::MalformedPayload(format!("serialization failed: {e}")))?;

    let signing_input = format!("{header}.{}", base64url::encode(payload));
    let signature = algorithm::sign(signing_input.as_bytes(), algorithm, key)?;

    Ok(format!("{signing_input}.{}", base64url::encode(signature)))
}

/// Parse a compact token, verify it against `keys` and validate its claims
///
/// `now` is the current time in seconds since the Unix epoch. `exp` must be
/// strictly after `now` and `nbf` at or before it; absent temporal claims
/// are not checked. Nothing is returned unless the signature verifies.
pub fn parse_and_verify(compact: &str, keys: &KeySet, now: i64) -> Result<TokenClaims> {
    parse_and_verify_with(compact, keys, now, &ValidationOptions::default())
}

/// [`parse_and_verify`] with explicit claim validation options
pub fn parse_and_verify_with(
    compact: &str,
    keys: &KeySet,
    now: i64,
    options: &ValidationOptions,
) -> Result<TokenClaims> {
    let parsed = ParsedToken::parse(compact)?;
    let key = parsed.resolve_key(keys)?;
    let claims = parsed.verify(key)?.claims()?;

    options.validate(&claims, now)?;
    Ok(claims)
}

/// [`parse_and_verify`] at the current system time
pub fn parse_and_verify_now(compact: &str, keys: &KeySet) -> Result<TokenClaims> {
    parse_and_verify(compact, keys, unix_now())
}

/// Decode the header of a compact token without verifying anything
pub fn decode_header(compact: &str) -> Result<TokenHeader> {
    Ok(ParsedToken::parse(compact)?.header().clone())
}
