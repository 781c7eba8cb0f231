use crate::algorithm::{Algorithm, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, EcdsaSigningAlgorithm, UnparsedPublicKey};

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub(crate) struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub(crate) struct ES384;

/// ES512 algorithm (ECDSA with P-521 and SHA-512)
pub(crate) struct ES512;

impl SignatureAlgorithm for ES256 {
    fn name(&self) -> &'static str {
        "ES256"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_ecdsa(
            message,
            key,
            Algorithm::ES256,
            &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        )
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_ecdsa(
            message,
            signature,
            key,
            Algorithm::ES256,
            &signature::ECDSA_P256_SHA256_FIXED,
        )
    }
}

impl SignatureAlgorithm for ES384 {
    fn name(&self) -> &'static str {
        "ES384"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_ecdsa(
            message,
            key,
            Algorithm::ES384,
            &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        )
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_ecdsa(
            message,
            signature,
            key,
            Algorithm::ES384,
            &signature::ECDSA_P384_SHA384_FIXED,
        )
    }
}

impl SignatureAlgorithm for ES512 {
    fn name(&self) -> &'static str {
        "ES512"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_ecdsa(
            message,
            key,
            Algorithm::ES512,
            &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
        )
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_ecdsa(
            message,
            signature,
            key,
            Algorithm::ES512,
            &signature::ECDSA_P521_SHA512_FIXED,
        )
    }
}

/// Generic ECDSA signing producing the fixed-width `r || s` form used by JWS
fn sign_ecdsa(
    message: &[u8],
    key: &KeyMaterial,
    algorithm: Algorithm,
    signing: &'static EcdsaSigningAlgorithm,
) -> Result<Vec<u8>> {
    let (point, d) = key.as_ec_private(algorithm)?;

    let key_pair =
        EcdsaKeyPair::from_private_key_and_public_key(signing, d.as_bytes(), &point.to_sec1())
            .map_err(|e| Error::SigningFailed(format!("ecdsa: key rejected: {e}")))?;

    let signature = key_pair
        .sign(&SystemRandom::new(), message)
        .map_err(|e| Error::SigningFailed(format!("ecdsa: {e}")))?;

    Ok(signature.as_ref().to_vec())
}

/// Generic ECDSA signature verification
fn verify_ecdsa(
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
    algorithm: Algorithm,
    verification: &'static dyn signature::VerificationAlgorithm,
) -> Result<bool> {
    let point = key.as_ec_public(algorithm)?;

    let public_key = UnparsedPublicKey::new(verification, point.to_sec1());
    Ok(public_key.verify(message, signature).is_ok())
}
