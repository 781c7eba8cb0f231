use crate::algorithm::{Algorithm, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;

use ::hmac::{Hmac, Mac};
use constant_time_eq::constant_time_eq;
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub(crate) struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub(crate) struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub(crate) struct HS512;

impl SignatureAlgorithm for HS256 {
    fn name(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let secret = key.as_symmetric(Algorithm::HS256)?;
        compute_hmac(Algorithm::HS256, secret.as_bytes(), message)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        let secret = key.as_symmetric(Algorithm::HS256)?;
        verify_hmac(Algorithm::HS256, secret.as_bytes(), message, signature)
    }
}

impl SignatureAlgorithm for HS384 {
    fn name(&self) -> &'static str {
        "HS384"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let secret = key.as_symmetric(Algorithm::HS384)?;
        compute_hmac(Algorithm::HS384, secret.as_bytes(), message)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        let secret = key.as_symmetric(Algorithm::HS384)?;
        verify_hmac(Algorithm::HS384, secret.as_bytes(), message, signature)
    }
}

impl SignatureAlgorithm for HS512 {
    fn name(&self) -> &'static str {
        "HS512"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        let secret = key.as_symmetric(Algorithm::HS512)?;
        compute_hmac(Algorithm::HS512, secret.as_bytes(), message)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        let secret = key.as_symmetric(Algorithm::HS512)?;
        verify_hmac(Algorithm::HS512, secret.as_bytes(), message, signature)
    }
}

fn mac_error(e: impl std::fmt::Display) -> Error {
    Error::SigningFailed(format!("hmac: {e}"))
}

/// Compute the HMAC tag for the SHA-2 variant selected by `algorithm`
fn compute_hmac(algorithm: Algorithm, secret: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let tag = match algorithm {
        Algorithm::HS256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).map_err(mac_error)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::HS384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(secret).map_err(mac_error)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::HS512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret).map_err(mac_error)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        other => return Err(Error::UnsupportedAlgorithm(other.to_string())),
    };
    Ok(tag)
}

/// Verify an HMAC tag with constant-time comparison
fn verify_hmac(
    algorithm: Algorithm,
    secret: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let expected = compute_hmac(algorithm, secret, message)?;

    if signature.len() != expected.len() {
        return Ok(false);
    }

    Ok(constant_time_eq(signature, &expected))
}
