//! Signature algorithms
//!
//! The supported algorithms form a closed set. Unknown identifiers
//! (including `none`) are rejected when parsed, so no code path can fall
//! back to a default or let the token pick an algorithm family that does
//! not match the key.

mod ecdsa;
mod hmac;
mod rsa;

use crate::error::{Error, Result};
use crate::keys::{EcCurve, KeyKind, KeyMaterial, KeyUse};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// JWS signature algorithm (RFC 7518 Section 3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    PS512,
}

/// Key family an algorithm operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    RsaPss,
    Ecdsa,
}

impl Algorithm {
    /// Every supported algorithm
    pub const ALL: [Algorithm; 12] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
    ];

    /// Get the algorithm name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => AlgorithmFamily::RsaPss,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// Curve required by an ECDSA algorithm
    pub fn curve(&self) -> Option<EcCurve> {
        match self {
            Algorithm::ES256 => Some(EcCurve::P256),
            Algorithm::ES384 => Some(EcCurve::P384),
            Algorithm::ES512 => Some(EcCurve::P521),
            _ => None,
        }
    }

    /// Check that `key` may be used with this algorithm
    ///
    /// The key family (and curve for ECDSA) must match, a key restricted to
    /// another `alg` is refused and encryption keys are never used for
    /// signatures. Private components are not required here.
    pub fn ensure_compatible(&self, key: &KeyMaterial) -> Result<()> {
        let family_matches = match self.family() {
            AlgorithmFamily::Hmac => key.kind() == KeyKind::Symmetric,
            AlgorithmFamily::Rsa | AlgorithmFamily::RsaPss => {
                matches!(key.kind(), KeyKind::RsaPublic | KeyKind::RsaPrivate)
            }
            AlgorithmFamily::Ecdsa => key.curve().is_some() && key.curve() == self.curve(),
        };

        let restricted_elsewhere = key.algorithm().is_some_and(|alg| alg != *self);
        let encryption_key = key.key_use() == Some(KeyUse::Encryption);

        if !family_matches || restricted_elsewhere || encryption_key {
            return Err(Error::AlgorithmKeyMismatch {
                algorithm: self.to_string(),
                key_type: key.describe(),
            });
        }

        Ok(())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Signature algorithm implementation
///
/// Implementations extract the key shape they need from [`KeyMaterial`]
/// and report structural mismatches as errors. A signature that does not
/// verify is `Ok(false)`, never an error.
pub(crate) trait SignatureAlgorithm: Send + Sync {
    /// Get the algorithm name (e.g., "RS256")
    fn name(&self) -> &'static str;

    /// Produce a raw signature over `message`
    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>>;

    /// Check a raw signature over `message`
    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool>;
}

/// Get the implementation for an algorithm
pub(crate) fn get_signer(algorithm: Algorithm) -> &'static dyn SignatureAlgorithm {
    match algorithm {
        Algorithm::HS256 => &hmac::HS256,
        Algorithm::HS384 => &hmac::HS384,
        Algorithm::HS512 => &hmac::HS512,
        Algorithm::RS256 => &rsa::RS256,
        Algorithm::RS384 => &rsa::RS384,
        Algorithm::RS512 => &rsa::RS512,
        Algorithm::PS256 => &rsa::PS256,
        Algorithm::PS384 => &rsa::PS384,
        Algorithm::PS512 => &rsa::PS512,
        Algorithm::ES256 => &ecdsa::ES256,
        Algorithm::ES384 => &ecdsa::ES384,
        Algorithm::ES512 => &ecdsa::ES512,
    }
}

/// Sign `payload` with `algorithm` using a private-capable key
///
/// Fails with [`Error::AlgorithmKeyMismatch`] when the key family does not
/// fit the algorithm and with [`Error::MissingPrivateComponent`] when the
/// key only holds public components.
pub fn sign(payload: &[u8], algorithm: Algorithm, key: &KeyMaterial) -> Result<Vec<u8>> {
    algorithm.ensure_compatible(key)?;
    if !key.kind().can_sign() {
        return Err(Error::MissingPrivateComponent(key.describe()));
    }

    let signer = get_signer(algorithm);
    let signature = signer.sign(payload, key)?;
    tracing::debug!(
        algorithm = signer.name(),
        kid = key.key_id(),
        "payload signed"
    );
    Ok(signature)
}

/// Verify `signature` over `payload` with `algorithm`
///
/// Returns `Ok(false)` for any signature that does not verify. Errors are
/// reserved for keys that cannot be used with `algorithm` at all.
pub fn verify(
    payload: &[u8],
    signature: &[u8],
    algorithm: Algorithm,
    key: &KeyMaterial,
) -> Result<bool> {
    algorithm.ensure_compatible(key)?;
    let verifier = get_signer(algorithm);
    let valid = verifier.verify(payload, signature, key)?;
    tracing::debug!(
        algorithm = verifier.name(),
        kid = key.key_id(),
        valid,
        "signature checked"
    );
    Ok(valid)
}
