//! Fresh key generation from the operating system CSPRNG

use super::{EcCurve, KeyMaterial, RawKey};
use crate::error::{Error, Result};
use crate::limits::MAX_SYMMETRIC_KEY_SIZE;
use rand::rngs::OsRng;
use rand::RngCore;

/// Smallest RSA modulus the signers accept
const MIN_RSA_BITS: usize = 2048;

/// Largest RSA modulus the RustCrypto key validation accepts
const MAX_RSA_BITS: usize = 4096;

impl KeyMaterial {
    /// Generate an RSA private key with a modulus of `bits` bits
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) || bits % 8 != 0 {
            return Err(Error::UnsupportedKeyType(format!(
                "RSA key size {bits} (supported: {MIN_RSA_BITS} to {MAX_RSA_BITS} bits)"
            )));
        }

        let key = rsa::RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| Error::MalformedKey(format!("rsa: key generation failed: {e}")))?;
        KeyMaterial::from_raw(key)
    }

    /// Generate an EC private key on `curve`
    pub fn generate_ec(curve: EcCurve) -> Result<Self> {
        let raw = match curve {
            EcCurve::P256 => RawKey::P256Private(p256::SecretKey::random(&mut OsRng)),
            EcCurve::P384 => RawKey::P384Private(p384::SecretKey::random(&mut OsRng)),
            EcCurve::P521 => RawKey::P521Private(p521::SecretKey::random(&mut OsRng)),
        };
        KeyMaterial::from_raw(raw)
    }

    /// Generate a random symmetric secret of `len` bytes
    pub fn generate_symmetric(len: usize) -> Result<Self> {
        if len == 0 || len > MAX_SYMMETRIC_KEY_SIZE {
            return Err(Error::IncompleteKeyMaterial(format!(
                "symmetric key length must be 1 to {MAX_SYMMETRIC_KEY_SIZE} bytes, got {len}"
            )));
        }

        let mut secret = vec![0u8; len];
        OsRng.fill_bytes(&mut secret);
        KeyMaterial::symmetric(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyKind;

    #[test]
    fn test_generate_ec_all_curves() {
        for curve in [EcCurve::P256, EcCurve::P384, EcCurve::P521] {
            let key = KeyMaterial::generate_ec(curve).unwrap();
            assert_eq!(key.kind(), KeyKind::EcPrivate);
            assert_eq!(key.curve(), Some(curve));
        }
    }

    #[test]
    fn test_generate_ec_is_random() {
        let a = KeyMaterial::generate_ec(EcCurve::P256).unwrap();
        let b = KeyMaterial::generate_ec(EcCurve::P256).unwrap();
        assert_ne!(a.thumbprint(), b.thumbprint());
    }

    #[test]
    fn test_generate_symmetric() {
        let key = KeyMaterial::generate_symmetric(32).unwrap();
        assert_eq!(key.kind(), KeyKind::Symmetric);
        assert!(matches!(
            KeyMaterial::generate_symmetric(0),
            Err(Error::IncompleteKeyMaterial(_))
        ));
    }

    #[test]
    fn test_generate_rsa_rejects_weak_sizes() {
        assert!(matches!(
            KeyMaterial::generate_rsa(1024),
            Err(Error::UnsupportedKeyType(_))
        ));
        assert!(matches!(
            KeyMaterial::generate_rsa(8192),
            Err(Error::UnsupportedKeyType(_))
        ));
    }
}
