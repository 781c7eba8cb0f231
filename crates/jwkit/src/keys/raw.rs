//! Conversion between [`KeyMaterial`] and native key objects
//!
//! Native keys are the RustCrypto types (`rsa`, `p256`, `p384`, `p521`) and
//! plain byte strings. DER and PEM input is recognised by trying each
//! supported container in turn: PKCS#8, SubjectPublicKeyInfo, PKCS#1 and SEC1.

use super::{EcCurve, EcPoint, KeyMaterial, KeyPayload, RsaPrivateParts, RsaPublicParts};
use crate::error::{Error, Result};
use crate::keys::SecretBytes;
use crate::limits::MAX_RSA_COMPONENT_SIZE;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::BigUint;
use std::fmt;

/// Largest RSA modulus accepted when converting to native keys
const MAX_RSA_BITS: usize = 8192;

/// A native key object
pub enum RawKey {
    /// Symmetric secret bytes
    Symmetric(Vec<u8>),
    RsaPrivate(rsa::RsaPrivateKey),
    RsaPublic(rsa::RsaPublicKey),
    P256Private(p256::SecretKey),
    P256Public(p256::PublicKey),
    P384Private(p384::SecretKey),
    P384Public(p384::PublicKey),
    P521Private(p521::SecretKey),
    P521Public(p521::PublicKey),
    /// DER-encoded PKCS#8, SubjectPublicKeyInfo or PKCS#1 key
    Der(Vec<u8>),
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RawKey::Symmetric(_) => "Symmetric",
            RawKey::RsaPrivate(_) => "RsaPrivate",
            RawKey::RsaPublic(_) => "RsaPublic",
            RawKey::P256Private(_) => "P256Private",
            RawKey::P256Public(_) => "P256Public",
            RawKey::P384Private(_) => "P384Private",
            RawKey::P384Public(_) => "P384Public",
            RawKey::P521Private(_) => "P521Private",
            RawKey::P521Public(_) => "P521Public",
            RawKey::Der(_) => "Der",
        };
        write!(f, "RawKey::{name}(..)")
    }
}

impl From<Vec<u8>> for RawKey {
    fn from(secret: Vec<u8>) -> Self {
        RawKey::Symmetric(secret)
    }
}

impl From<&[u8]> for RawKey {
    fn from(secret: &[u8]) -> Self {
        RawKey::Symmetric(secret.to_vec())
    }
}

impl From<rsa::RsaPrivateKey> for RawKey {
    fn from(key: rsa::RsaPrivateKey) -> Self {
        RawKey::RsaPrivate(key)
    }
}

impl From<rsa::RsaPublicKey> for RawKey {
    fn from(key: rsa::RsaPublicKey) -> Self {
        RawKey::RsaPublic(key)
    }
}

impl From<p256::SecretKey> for RawKey {
    fn from(key: p256::SecretKey) -> Self {
        RawKey::P256Private(key)
    }
}

impl From<p256::PublicKey> for RawKey {
    fn from(key: p256::PublicKey) -> Self {
        RawKey::P256Public(key)
    }
}

impl From<p384::SecretKey> for RawKey {
    fn from(key: p384::SecretKey) -> Self {
        RawKey::P384Private(key)
    }
}

impl From<p384::PublicKey> for RawKey {
    fn from(key: p384::PublicKey) -> Self {
        RawKey::P384Public(key)
    }
}

impl From<p521::SecretKey> for RawKey {
    fn from(key: p521::SecretKey) -> Self {
        RawKey::P521Private(key)
    }
}

impl From<p521::PublicKey> for RawKey {
    fn from(key: p521::PublicKey) -> Self {
        RawKey::P521Public(key)
    }
}

impl KeyMaterial {
    /// Build key material from a native key object
    ///
    /// Byte strings become symmetric keys, RustCrypto RSA and NIST curve keys
    /// become the matching asymmetric variant. [`RawKey::Der`] input that is
    /// none of the supported containers fails with
    /// [`Error::UnsupportedKeyType`].
    pub fn from_raw(raw: impl Into<RawKey>) -> Result<Self> {
        let payload = match raw.into() {
            RawKey::Symmetric(secret) => return KeyMaterial::symmetric(secret),
            RawKey::RsaPrivate(key) => rsa_private_payload(&key)?,
            RawKey::RsaPublic(key) => KeyPayload::RsaPublic(rsa_public_parts(&key)?),
            RawKey::P256Private(key) => ec_private_payload(
                EcCurve::P256,
                &key.to_bytes(),
                key.public_key().to_encoded_point(false).as_bytes(),
            )?,
            RawKey::P256Public(key) => ec_public_payload(
                EcCurve::P256,
                key.to_encoded_point(false).as_bytes(),
            )?,
            RawKey::P384Private(key) => ec_private_payload(
                EcCurve::P384,
                &key.to_bytes(),
                key.public_key().to_encoded_point(false).as_bytes(),
            )?,
            RawKey::P384Public(key) => ec_public_payload(
                EcCurve::P384,
                key.to_encoded_point(false).as_bytes(),
            )?,
            RawKey::P521Private(key) => ec_private_payload(
                EcCurve::P521,
                &key.to_bytes(),
                key.public_key().to_encoded_point(false).as_bytes(),
            )?,
            RawKey::P521Public(key) => ec_public_payload(
                EcCurve::P521,
                key.to_encoded_point(false).as_bytes(),
            )?,
            RawKey::Der(der) => return KeyMaterial::from_raw(decode_der(&der)?),
        };

        Ok(KeyMaterial::from_payload(payload))
    }

    /// Convert back into a native key object
    ///
    /// RSA private keys need both primes `p` and `q`; without them the
    /// conversion fails with [`Error::IncompleteKeyMaterial`].
    pub fn to_raw(&self) -> Result<RawKey> {
        match self.payload() {
            KeyPayload::Symmetric(secret) => Ok(RawKey::Symmetric(secret.as_bytes().to_vec())),
            KeyPayload::RsaPublic(public) => Ok(RawKey::RsaPublic(rsa_public_key(public)?)),
            KeyPayload::RsaPrivate(public, private) => {
                Ok(RawKey::RsaPrivate(rsa_private_key(public, private)?))
            }
            KeyPayload::EcPublic(point) => {
                let sec1 = point.to_sec1();
                Ok(match point.curve {
                    EcCurve::P256 => {
                        RawKey::P256Public(p256::PublicKey::from_sec1_bytes(&sec1).map_err(ec_error)?)
                    }
                    EcCurve::P384 => {
                        RawKey::P384Public(p384::PublicKey::from_sec1_bytes(&sec1).map_err(ec_error)?)
                    }
                    EcCurve::P521 => {
                        RawKey::P521Public(p521::PublicKey::from_sec1_bytes(&sec1).map_err(ec_error)?)
                    }
                })
            }
            KeyPayload::EcPrivate(point, d) => Ok(match point.curve {
                EcCurve::P256 => {
                    RawKey::P256Private(p256::SecretKey::from_slice(d.as_bytes()).map_err(ec_error)?)
                }
                EcCurve::P384 => {
                    RawKey::P384Private(p384::SecretKey::from_slice(d.as_bytes()).map_err(ec_error)?)
                }
                EcCurve::P521 => {
                    RawKey::P521Private(p521::SecretKey::from_slice(d.as_bytes()).map_err(ec_error)?)
                }
            }),
        }
    }

    /// Build key material from a PEM document
    ///
    /// Accepts `PRIVATE KEY` (PKCS#8), `PUBLIC KEY` (SubjectPublicKeyInfo),
    /// `RSA PRIVATE KEY` (PKCS#1) and `EC PRIVATE KEY` (SEC1) labels.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (label, der) = der::pem::decode_vec(pem.trim().as_bytes())
            .map_err(|e| Error::MalformedKey(format!("pem: {e}")))?;

        match label {
            "PRIVATE KEY" | "PUBLIC KEY" | "RSA PRIVATE KEY" => {
                KeyMaterial::from_raw(RawKey::Der(der))
            }
            "EC PRIVATE KEY" => KeyMaterial::from_raw(decode_sec1(&der)?),
            other => Err(Error::UnsupportedKeyType(format!("PEM label '{other}'"))),
        }
    }
}

fn ec_error(e: impl fmt::Display) -> Error {
    Error::MalformedKey(format!("ec: {e}"))
}

fn rsa_error(e: impl fmt::Display) -> Error {
    Error::MalformedKey(format!("rsa: {e}"))
}

/// Recognise a DER key container
fn decode_der(der: &[u8]) -> Result<RawKey> {
    // PKCS#8 private keys
    if let Ok(key) = rsa::RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p384::SecretKey::from_pkcs8_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p521::SecretKey::from_pkcs8_der(der) {
        return Ok(key.into());
    }

    // SubjectPublicKeyInfo
    if let Ok(key) = rsa::RsaPublicKey::from_public_key_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p256::PublicKey::from_public_key_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p384::PublicKey::from_public_key_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p521::PublicKey::from_public_key_der(der) {
        return Ok(key.into());
    }

    // PKCS#1 RSAPrivateKey
    if let Ok(key) = rsa::RsaPrivateKey::from_pkcs1_der(der) {
        return Ok(key.into());
    }

    Err(Error::UnsupportedKeyType(
        "DER input is not a PKCS#8, SubjectPublicKeyInfo or PKCS#1 key of a supported type".into(),
    ))
}

/// Recognise a SEC1 `ECPrivateKey` on any supported curve
fn decode_sec1(der: &[u8]) -> Result<RawKey> {
    if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p384::SecretKey::from_sec1_der(der) {
        return Ok(key.into());
    }
    if let Ok(key) = p521::SecretKey::from_sec1_der(der) {
        return Ok(key.into());
    }
    Err(Error::UnsupportedKeyType(
        "SEC1 key on an unsupported curve".into(),
    ))
}

fn rsa_public_parts(key: &impl PublicKeyParts) -> Result<RsaPublicParts> {
    let parts = RsaPublicParts {
        n: key.n().to_bytes_be(),
        e: key.e().to_bytes_be(),
    };

    // The JWK form could not be parsed back beyond this size
    if parts.n.len().max(parts.e.len()) > MAX_RSA_COMPONENT_SIZE {
        return Err(Error::UnsupportedKeyType(format!(
            "RSA modulus of {} bits (maximum: {} bits)",
            key.n().bits(),
            MAX_RSA_COMPONENT_SIZE * 8
        )));
    }

    Ok(parts)
}

fn secret(value: &BigUint) -> SecretBytes {
    SecretBytes::new(value.to_bytes_be())
}

fn rsa_private_payload(key: &rsa::RsaPrivateKey) -> Result<KeyPayload> {
    let [p, q] = key.primes() else {
        return Err(Error::UnsupportedKeyType(format!(
            "RSA key with {} primes",
            key.primes().len()
        )));
    };

    let private = RsaPrivateParts {
        d: secret(key.d()),
        p: Some(secret(p)),
        q: Some(secret(q)),
        dp: key.dp().map(secret),
        dq: key.dq().map(secret),
        qi: key.crt_coefficient().as_ref().map(secret),
    };

    Ok(KeyPayload::RsaPrivate(rsa_public_parts(key)?, private))
}

fn ec_public_payload(curve: EcCurve, sec1: &[u8]) -> Result<KeyPayload> {
    Ok(KeyPayload::EcPublic(EcPoint::from_sec1(curve, sec1)?))
}

fn ec_private_payload(curve: EcCurve, d: &[u8], sec1: &[u8]) -> Result<KeyPayload> {
    Ok(KeyPayload::EcPrivate(
        EcPoint::from_sec1(curve, sec1)?,
        SecretBytes::new(d.to_vec()),
    ))
}

fn rsa_public_key(public: &RsaPublicParts) -> Result<rsa::RsaPublicKey> {
    rsa::RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(&public.n),
        BigUint::from_bytes_be(&public.e),
        MAX_RSA_BITS,
    )
    .map_err(rsa_error)
}

/// Rebuild an RSA private key from its JWK integers
///
/// Used for raw export and by the RSA signers.
pub(crate) fn rsa_private_key(
    public: &RsaPublicParts,
    private: &RsaPrivateParts,
) -> Result<rsa::RsaPrivateKey> {
    let (Some(p), Some(q)) = (&private.p, &private.q) else {
        return Err(Error::IncompleteKeyMaterial(
            "RSA private key without primes p and q".into(),
        ));
    };

    rsa::RsaPrivateKey::from_components(
        BigUint::from_bytes_be(&public.n),
        BigUint::from_bytes_be(&public.e),
        BigUint::from_bytes_be(private.d.as_bytes()),
        vec![
            BigUint::from_bytes_be(p.as_bytes()),
            BigUint::from_bytes_be(q.as_bytes()),
        ],
    )
    .map_err(rsa_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyKind;
    use crate::test_keys;

    #[test]
    fn test_from_raw_rejects_oversized_rsa_modulus() {
        let n = BigUint::from_bytes_be(&[0xff; MAX_RSA_COMPONENT_SIZE + 1]);
        let key = rsa::RsaPublicKey::new_with_max_size(n, BigUint::from(65537u32), 16384).unwrap();
        assert!(matches!(
            KeyMaterial::from_raw(key),
            Err(Error::UnsupportedKeyType(_))
        ));

        // An 8192-bit modulus still fits the JWK form
        let n = BigUint::from_bytes_be(&[0xff; MAX_RSA_COMPONENT_SIZE]);
        let key = rsa::RsaPublicKey::new_with_max_size(n, BigUint::from(65537u32), 8192).unwrap();
        let key = KeyMaterial::from_raw(key).unwrap();
        assert_eq!(KeyMaterial::from_json(&key.to_json()).unwrap(), key);
    }

    #[test]
    fn test_from_raw_symmetric() {
        let key = KeyMaterial::from_raw(b"0123456789abcdef".to_vec()).unwrap();
        assert_eq!(key.kind(), KeyKind::Symmetric);
        match key.to_raw().unwrap() {
            RawKey::Symmetric(bytes) => assert_eq!(bytes, b"0123456789abcdef"),
            other => panic!("unexpected raw key {other:?}"),
        }
    }

    #[test]
    fn test_from_raw_empty_symmetric() {
        assert!(matches!(
            KeyMaterial::from_raw(Vec::new()),
            Err(Error::IncompleteKeyMaterial(_))
        ));
    }

    #[test]
    fn test_from_pem_variants() {
        let cases = [
            (test_keys::RSA_PRIVATE_PEM, KeyKind::RsaPrivate, None),
            (test_keys::RSA_PKCS1_PEM, KeyKind::RsaPrivate, None),
            (test_keys::RSA_PUBLIC_PEM, KeyKind::RsaPublic, None),
            (test_keys::P256_PRIVATE_PEM, KeyKind::EcPrivate, Some(EcCurve::P256)),
            (test_keys::P256_PUBLIC_PEM, KeyKind::EcPublic, Some(EcCurve::P256)),
            (test_keys::P384_PRIVATE_PEM, KeyKind::EcPrivate, Some(EcCurve::P384)),
            (test_keys::P521_PRIVATE_PEM, KeyKind::EcPrivate, Some(EcCurve::P521)),
        ];

        for (pem, kind, curve) in cases {
            let key = KeyMaterial::from_pem(pem).unwrap();
            assert_eq!(key.kind(), kind);
            assert_eq!(key.curve(), curve);
        }
    }

    #[test]
    fn test_pkcs1_and_pkcs8_agree() {
        let pkcs8 = KeyMaterial::from_pem(test_keys::RSA_PRIVATE_PEM).unwrap();
        let pkcs1 = KeyMaterial::from_pem(test_keys::RSA_PKCS1_PEM).unwrap();
        assert_eq!(pkcs8, pkcs1);
    }

    #[test]
    fn test_from_pem_unsupported_key_type() {
        assert!(matches!(
            KeyMaterial::from_pem(test_keys::ED25519_PRIVATE_PEM),
            Err(Error::UnsupportedKeyType(_))
        ));
        assert!(matches!(
            KeyMaterial::from_raw(RawKey::Der(vec![0x30, 0x03, 0x02, 0x01, 0x00])),
            Err(Error::UnsupportedKeyType(_))
        ));
    }

    #[test]
    fn test_from_pem_garbage() {
        assert!(matches!(
            KeyMaterial::from_pem("not a pem document"),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn test_rsa_raw_round_trip() {
        let key = test_keys::rsa_private();
        let raw = key.to_raw().unwrap();
        assert!(matches!(raw, RawKey::RsaPrivate(_)));
        assert_eq!(KeyMaterial::from_raw(raw).unwrap(), key);

        let public = key.public_key().unwrap();
        let raw = public.to_raw().unwrap();
        assert!(matches!(raw, RawKey::RsaPublic(_)));
        assert_eq!(KeyMaterial::from_raw(raw).unwrap(), public);
    }

    #[test]
    fn test_ec_raw_round_trip() {
        for key in [
            test_keys::p256_private(),
            test_keys::p384_private(),
            test_keys::p521_private(),
        ] {
            let back = KeyMaterial::from_raw(key.to_raw().unwrap()).unwrap();
            assert_eq!(back, key);

            let public = key.public_key().unwrap();
            let back = KeyMaterial::from_raw(public.to_raw().unwrap()).unwrap();
            assert_eq!(back, public);
        }
    }

    #[test]
    fn test_to_raw_without_primes_is_incomplete() {
        let key = test_keys::rsa_private();
        let KeyPayload::RsaPrivate(public, private) = key.payload() else {
            panic!("expected RSA private key");
        };
        let stripped = RsaPrivateParts {
            d: private.d.clone(),
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        };
        let stripped =
            KeyMaterial::from_payload(KeyPayload::RsaPrivate(public.clone(), stripped));

        assert!(matches!(
            stripped.to_raw(),
            Err(Error::IncompleteKeyMaterial(_))
        ));
    }
}
