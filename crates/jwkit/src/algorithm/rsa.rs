use crate::algorithm::{Algorithm, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::{rsa_private_key, KeyMaterial};
use crate::utils::der::rsa_spki_from_n_e;

use ::rsa::pkcs8::EncodePrivateKey;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, RsaKeyPair, UnparsedPublicKey};

/// RS256 algorithm (RSASSA-PKCS1-v1_5 with SHA-256)
pub(crate) struct RS256;

/// RS384 algorithm (RSASSA-PKCS1-v1_5 with SHA-384)
pub(crate) struct RS384;

/// RS512 algorithm (RSASSA-PKCS1-v1_5 with SHA-512)
pub(crate) struct RS512;

/// PS256 algorithm (RSASSA-PSS with SHA-256)
pub(crate) struct PS256;

/// PS384 algorithm (RSASSA-PSS with SHA-384)
pub(crate) struct PS384;

/// PS512 algorithm (RSASSA-PSS with SHA-512)
pub(crate) struct PS512;

impl SignatureAlgorithm for RS256 {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::RS256, &signature::RSA_PKCS1_SHA256)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::RS256,
            &signature::RSA_PKCS1_2048_8192_SHA256,
        )
    }
}

impl SignatureAlgorithm for RS384 {
    fn name(&self) -> &'static str {
        "RS384"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::RS384, &signature::RSA_PKCS1_SHA384)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::RS384,
            &signature::RSA_PKCS1_2048_8192_SHA384,
        )
    }
}

impl SignatureAlgorithm for RS512 {
    fn name(&self) -> &'static str {
        "RS512"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::RS512, &signature::RSA_PKCS1_SHA512)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::RS512,
            &signature::RSA_PKCS1_2048_8192_SHA512,
        )
    }
}

impl SignatureAlgorithm for PS256 {
    fn name(&self) -> &'static str {
        "PS256"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::PS256, &signature::RSA_PSS_SHA256)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::PS256,
            &signature::RSA_PSS_2048_8192_SHA256,
        )
    }
}

impl SignatureAlgorithm for PS384 {
    fn name(&self) -> &'static str {
        "PS384"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::PS384, &signature::RSA_PSS_SHA384)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::PS384,
            &signature::RSA_PSS_2048_8192_SHA384,
        )
    }
}

impl SignatureAlgorithm for PS512 {
    fn name(&self) -> &'static str {
        "PS512"
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
        sign_rsa(message, key, Algorithm::PS512, &signature::RSA_PSS_SHA512)
    }

    fn verify(&self, message: &[u8], signature: &[u8], key: &KeyMaterial) -> Result<bool> {
        verify_rsa(
            message,
            signature,
            key,
            Algorithm::PS512,
            &signature::RSA_PSS_2048_8192_SHA512,
        )
    }
}

/// Generic RSA signing through aws-lc-rs
///
/// The JWK integers are re-assembled into a PKCS#8 document, the only
/// private key input aws-lc-rs accepts from components.
fn sign_rsa(
    message: &[u8],
    key: &KeyMaterial,
    algorithm: Algorithm,
    encoding: &'static dyn RsaEncoding,
) -> Result<Vec<u8>> {
    let (public, private) = key.as_rsa_private(algorithm)?;
    let private_key = rsa_private_key(public, private)?;

    let pkcs8 = private_key
        .to_pkcs8_der()
        .map_err(|e| Error::SigningFailed(format!("rsa: pkcs8 encoding failed: {e}")))?;

    let key_pair = RsaKeyPair::from_pkcs8(pkcs8.as_bytes())
        .map_err(|e| Error::SigningFailed(format!("rsa: key rejected: {e}")))?;

    let mut signature = vec![0; key_pair.public_modulus_len()];
    key_pair
        .sign(encoding, &SystemRandom::new(), message, &mut signature)
        .map_err(|e| Error::SigningFailed(format!("rsa: {e}")))?;

    Ok(signature)
}

/// Generic RSA signature verification
fn verify_rsa(
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
    algorithm: Algorithm,
    parameters: &'static dyn signature::VerificationAlgorithm,
) -> Result<bool> {
    let public = key.as_rsa_public(algorithm)?;
    let public_key_der = rsa_spki_from_n_e(&public.n, &public.e)?;

    let public_key = UnparsedPublicKey::new(parameters, public_key_der);
    Ok(public_key.verify(message, signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys;

    #[test]
    fn test_pkcs1_signature_is_deterministic() {
        let key = test_keys::rsa_private();
        let first = RS256.sign(b"message", &key).unwrap();
        let second = RS256.sign(b"message", &key).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pss_signature_is_randomized() {
        let key = test_keys::rsa_private();
        let first = PS256.sign(b"message", &key).unwrap();
        let second = PS256.sign(b"message", &key).unwrap();
        assert_ne!(first, second);
        assert!(PS256.verify(b"message", &first, &key).unwrap());
        assert!(PS256.verify(b"message", &second, &key).unwrap());
    }

    #[test]
    fn test_padding_schemes_do_not_cross_verify() {
        let key = test_keys::rsa_private();
        let pkcs1 = RS256.sign(b"message", &key).unwrap();
        let pss = PS256.sign(b"message", &key).unwrap();
        assert!(!PS256.verify(b"message", &pkcs1, &key).unwrap());
        assert!(!RS256.verify(b"message", &pss, &key).unwrap());
        assert!(!RS384.verify(b"message", &pkcs1, &key).unwrap());
    }

    #[test]
    fn test_rsa_rejects_ec_key() {
        let key = test_keys::p256_private();
        assert!(matches!(
            RS256.verify(b"message", &[0; 256], &key),
            Err(Error::AlgorithmKeyMismatch { .. })
        ));
    }
}
