//! Key material: symmetric, RSA and EC keys with their JOSE metadata
//!
//! A [`KeyMaterial`] is a closed sum over the five key shapes this crate
//! understands. The shape is decided once, when the key is built from raw
//! key objects, PEM/DER input or a JWK document, and every later operation
//! dispatches on it.

mod generate;
mod jwk;
mod raw;
mod secret;

pub use raw::RawKey;

pub(crate) use raw::rsa_private_key;
pub(crate) use secret::SecretBytes;

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::limits::{MAX_KID_LENGTH, MAX_SYMMETRIC_KEY_SIZE};
use crate::utils::{base64url, der};
use sha2::{Digest, Sha256};
use spki::ObjectIdentifier;
use std::fmt;
use std::str::FromStr;

/// The shape of a [`KeyMaterial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Symmetric,
    RsaPublic,
    RsaPrivate,
    EcPublic,
    EcPrivate,
}

impl KeyKind {
    /// JWK `kty` value for this shape
    pub fn kty(&self) -> &'static str {
        match self {
            KeyKind::Symmetric => "oct",
            KeyKind::RsaPublic | KeyKind::RsaPrivate => "RSA",
            KeyKind::EcPublic | KeyKind::EcPrivate => "EC",
        }
    }

    /// Whether keys of this shape can produce signatures
    ///
    /// Symmetric secrets both sign and verify.
    pub fn can_sign(&self) -> bool {
        matches!(
            self,
            KeyKind::Symmetric | KeyKind::RsaPrivate | KeyKind::EcPrivate
        )
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyKind::Symmetric => "symmetric",
            KeyKind::RsaPublic => "RSA public",
            KeyKind::RsaPrivate => "RSA private",
            KeyKind::EcPublic => "EC public",
            KeyKind::EcPrivate => "EC private",
        })
    }
}

/// Intended key usage (JWK `use`, RFC 7517 Section 4.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUse {
    Signature,
    Encryption,
}

impl KeyUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyUse::Signature => "sig",
            KeyUse::Encryption => "enc",
        }
    }
}

impl FromStr for KeyUse {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sig" => Ok(KeyUse::Signature),
            "enc" => Ok(KeyUse::Encryption),
            other => Err(Error::MalformedKey(format!(
                "key use must be 'sig' or 'enc', found '{other}'"
            ))),
        }
    }
}

impl fmt::Display for KeyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NIST curves supported for EC keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    /// JWK `crv` value
    pub fn name(&self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Size in bytes of a coordinate or private scalar
    pub fn field_size(&self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(EcCurve::P256),
            "P-384" => Some(EcCurve::P384),
            "P-521" => Some(EcCurve::P521),
            _ => None,
        }
    }

    pub(crate) fn oid(&self) -> ObjectIdentifier {
        match self {
            EcCurve::P256 => ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"),
            EcCurve::P384 => ObjectIdentifier::new_unwrap("1.3.132.0.34"),
            EcCurve::P521 => ObjectIdentifier::new_unwrap("1.3.132.0.35"),
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Key payloads
// ============================================================================

/// RSA public integers, big-endian without leading zeros
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RsaPublicParts {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
}

/// RSA private integers; only `d` is mandatory
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RsaPrivateParts {
    pub d: SecretBytes,
    pub p: Option<SecretBytes>,
    pub q: Option<SecretBytes>,
    pub dp: Option<SecretBytes>,
    pub dq: Option<SecretBytes>,
    pub qi: Option<SecretBytes>,
}

/// An EC public point with fixed-width coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EcPoint {
    pub curve: EcCurve,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

impl EcPoint {
    /// Split an uncompressed SEC1 point (`04 || x || y`)
    pub(crate) fn from_sec1(curve: EcCurve, encoded: &[u8]) -> Result<Self> {
        let size = curve.field_size();
        match encoded.split_first() {
            Some((0x04, coordinates)) if coordinates.len() == 2 * size => {
                let (x, y) = coordinates.split_at(size);
                Ok(Self {
                    curve,
                    x: x.to_vec(),
                    y: y.to_vec(),
                })
            }
            _ => Err(Error::MalformedKey(format!(
                "expected uncompressed {curve} point"
            ))),
        }
    }

    /// Uncompressed SEC1 encoding (`04 || x || y`)
    pub(crate) fn to_sec1(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(1 + self.x.len() + self.y.len());
        encoded.push(0x04);
        encoded.extend_from_slice(&self.x);
        encoded.extend_from_slice(&self.y);
        encoded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyPayload {
    Symmetric(SecretBytes),
    RsaPublic(RsaPublicParts),
    RsaPrivate(RsaPublicParts, RsaPrivateParts),
    EcPublic(EcPoint),
    EcPrivate(EcPoint, SecretBytes),
}

// ============================================================================
// Key material
// ============================================================================

/// A cryptographic key together with its JOSE metadata
///
/// Private components are only reachable through explicit export
/// operations ([`KeyMaterial::to_raw`] and JWK marshaling of a private key).
/// [`KeyMaterial::public_key`] strips them.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    payload: KeyPayload,
    key_id: Option<String>,
    algorithm: Option<Algorithm>,
    key_use: Option<KeyUse>,
}

impl KeyMaterial {
    pub(crate) fn from_payload(payload: KeyPayload) -> Self {
        Self {
            payload,
            key_id: None,
            algorithm: None,
            key_use: None,
        }
    }

    /// Create a symmetric key from secret bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::IncompleteKeyMaterial(
                "symmetric secret is empty".into(),
            ));
        }
        if secret.len() > MAX_SYMMETRIC_KEY_SIZE {
            return Err(Error::MalformedKey(format!(
                "symmetric secret too large: {} bytes (maximum: {MAX_SYMMETRIC_KEY_SIZE} bytes)",
                secret.len()
            )));
        }
        Ok(Self::from_payload(KeyPayload::Symmetric(SecretBytes::new(
            secret,
        ))))
    }

    pub(crate) fn payload(&self) -> &KeyPayload {
        &self.payload
    }

    /// The shape of this key
    pub fn kind(&self) -> KeyKind {
        match &self.payload {
            KeyPayload::Symmetric(_) => KeyKind::Symmetric,
            KeyPayload::RsaPublic(_) => KeyKind::RsaPublic,
            KeyPayload::RsaPrivate(..) => KeyKind::RsaPrivate,
            KeyPayload::EcPublic(_) => KeyKind::EcPublic,
            KeyPayload::EcPrivate(..) => KeyKind::EcPrivate,
        }
    }

    /// Curve of an EC key
    pub fn curve(&self) -> Option<EcCurve> {
        match &self.payload {
            KeyPayload::EcPublic(point) | KeyPayload::EcPrivate(point, _) => Some(point.curve),
            _ => None,
        }
    }

    /// Human readable key description used in error messages
    pub(crate) fn describe(&self) -> String {
        match self.curve() {
            Some(curve) => format!("{} ({curve})", self.kind()),
            None => self.kind().to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// Key ID (`kid`)
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    ///
    /// Fails with [`Error::MalformedKey`] when `kid` is longer than a
    /// parsed JWK or token header may carry.
    pub fn set_key_id(&mut self, kid: impl Into<String>) -> Result<()> {
        let kid = kid.into();
        check_key_id(&kid)?;
        self.key_id = Some(kid);
        Ok(())
    }

    pub fn with_key_id(mut self, kid: impl Into<String>) -> Result<Self> {
        self.set_key_id(kid)?;
        Ok(self)
    }

    /// Use the RFC 7638 thumbprint as `kid` and return it
    pub(crate) fn assign_thumbprint_key_id(&mut self) -> String {
        let kid = self.thumbprint();
        self.key_id = Some(kid.clone());
        kid
    }

    /// Algorithm this key is restricted to (`alg`)
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = Some(algorithm);
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.set_algorithm(algorithm);
        self
    }

    /// Intended usage (`use`)
    pub fn key_use(&self) -> Option<KeyUse> {
        self.key_use
    }

    pub fn set_key_use(&mut self, key_use: KeyUse) {
        self.key_use = Some(key_use);
    }

    pub fn with_key_use(mut self, key_use: KeyUse) -> Self {
        self.set_key_use(key_use);
        self
    }

    /// Read a metadata field by its JOSE name
    ///
    /// Known names are `kid`, `alg`, `use` and the read-only `kty`.
    /// Any other name fails with [`Error::UnknownField`].
    pub fn field(&self, name: &str) -> Result<Option<String>> {
        match name {
            "kid" => Ok(self.key_id.clone()),
            "alg" => Ok(self.algorithm.map(|alg| alg.as_str().to_string())),
            "use" => Ok(self.key_use.map(|key_use| key_use.as_str().to_string())),
            "kty" => Ok(Some(self.kind().kty().to_string())),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }

    /// Set a metadata field by its JOSE name
    ///
    /// `alg` values are parsed against the supported algorithm set and
    /// `use` values must be `sig` or `enc`.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "kid" => self.set_key_id(value)?,
            "alg" => self.set_algorithm(value.parse()?),
            "use" => self.set_key_use(value.parse()?),
            "kty" => {
                return Err(Error::MalformedKey(
                    "'kty' is determined by the key material".into(),
                ));
            }
            other => return Err(Error::UnknownField(other.to_string())),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Typed access for the signature algorithms
    // ------------------------------------------------------------------------

    fn mismatch(&self, algorithm: Algorithm) -> Error {
        Error::AlgorithmKeyMismatch {
            algorithm: algorithm.to_string(),
            key_type: self.describe(),
        }
    }

    fn check_curve(&self, algorithm: Algorithm, point: &EcPoint) -> Result<()> {
        if algorithm.curve() == Some(point.curve) {
            Ok(())
        } else {
            Err(self.mismatch(algorithm))
        }
    }

    pub(crate) fn as_symmetric(&self, algorithm: Algorithm) -> Result<&SecretBytes> {
        match &self.payload {
            KeyPayload::Symmetric(secret) => Ok(secret),
            _ => Err(self.mismatch(algorithm)),
        }
    }

    pub(crate) fn as_rsa_public(&self, algorithm: Algorithm) -> Result<&RsaPublicParts> {
        match &self.payload {
            KeyPayload::RsaPublic(public) | KeyPayload::RsaPrivate(public, _) => Ok(public),
            _ => Err(self.mismatch(algorithm)),
        }
    }

    pub(crate) fn as_rsa_private(
        &self,
        algorithm: Algorithm,
    ) -> Result<(&RsaPublicParts, &RsaPrivateParts)> {
        match &self.payload {
            KeyPayload::RsaPrivate(public, private) => Ok((public, private)),
            KeyPayload::RsaPublic(_) => Err(Error::MissingPrivateComponent(self.describe())),
            _ => Err(self.mismatch(algorithm)),
        }
    }

    pub(crate) fn as_ec_public(&self, algorithm: Algorithm) -> Result<&EcPoint> {
        match &self.payload {
            KeyPayload::EcPublic(point) | KeyPayload::EcPrivate(point, _) => {
                self.check_curve(algorithm, point)?;
                Ok(point)
            }
            _ => Err(self.mismatch(algorithm)),
        }
    }

    pub(crate) fn as_ec_private(&self, algorithm: Algorithm) -> Result<(&EcPoint, &SecretBytes)> {
        match &self.payload {
            KeyPayload::EcPrivate(point, d) => {
                self.check_curve(algorithm, point)?;
                Ok((point, d))
            }
            KeyPayload::EcPublic(point) => {
                self.check_curve(algorithm, point)?;
                Err(Error::MissingPrivateComponent(self.describe()))
            }
            _ => Err(self.mismatch(algorithm)),
        }
    }

    // ------------------------------------------------------------------------
    // Public export and identity
    // ------------------------------------------------------------------------

    /// Public half of an asymmetric key, keeping `kid`, `alg` and `use`
    ///
    /// Symmetric keys have no public form and fail with
    /// [`Error::UnsupportedKeyType`].
    pub fn public_key(&self) -> Result<KeyMaterial> {
        let payload = match &self.payload {
            KeyPayload::Symmetric(_) => {
                return Err(Error::UnsupportedKeyType(
                    "symmetric keys have no public form".into(),
                ));
            }
            KeyPayload::RsaPublic(public) | KeyPayload::RsaPrivate(public, _) => {
                KeyPayload::RsaPublic(public.clone())
            }
            KeyPayload::EcPublic(point) | KeyPayload::EcPrivate(point, _) => {
                KeyPayload::EcPublic(point.clone())
            }
        };

        Ok(KeyMaterial {
            payload,
            key_id: self.key_id.clone(),
            algorithm: self.algorithm,
            key_use: self.key_use,
        })
    }

    /// DER-encoded SubjectPublicKeyInfo of an asymmetric key
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        match &self.payload {
            KeyPayload::Symmetric(_) => Err(Error::UnsupportedKeyType(
                "symmetric keys have no public form".into(),
            )),
            KeyPayload::RsaPublic(public) | KeyPayload::RsaPrivate(public, _) => {
                der::rsa_spki_from_n_e(&public.n, &public.e)
            }
            KeyPayload::EcPublic(point) | KeyPayload::EcPrivate(point, _) => {
                der::ec_spki_from_point(point.curve.oid(), &point.to_sec1())
            }
        }
    }

    /// PEM-encoded (`PUBLIC KEY`) SubjectPublicKeyInfo of an asymmetric key
    pub fn public_key_pem(&self) -> Result<String> {
        let der = self.public_key_der()?;
        ::der::pem::encode_string("PUBLIC KEY", ::der::pem::LineEnding::LF, &der)
            .map_err(|e| Error::MalformedKey(format!("pem: {e}")))
    }

    /// JWK thumbprint (RFC 7638) using SHA-256, Base64URL-encoded
    ///
    /// Computed over the required public members only, so a private key and
    /// its public half share a thumbprint.
    pub fn thumbprint(&self) -> String {
        // Members in lexicographic order, no whitespace
        let canonical = match &self.payload {
            KeyPayload::Symmetric(secret) => format!(
                r#"{{"k":"{}","kty":"oct"}}"#,
                base64url::encode(secret.as_bytes())
            ),
            KeyPayload::RsaPublic(public) | KeyPayload::RsaPrivate(public, _) => format!(
                r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#,
                base64url::encode(unsigned_integer(&public.e)),
                base64url::encode(unsigned_integer(&public.n))
            ),
            KeyPayload::EcPublic(point) | KeyPayload::EcPrivate(point, _) => format!(
                r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
                point.curve.name(),
                base64url::encode(&point.x),
                base64url::encode(&point.y)
            ),
        };

        base64url::encode(Sha256::digest(canonical.as_bytes()))
    }
}

/// Reject a `kid` longer than [`MAX_KID_LENGTH`]
fn check_key_id(kid: &str) -> Result<()> {
    if kid.len() > MAX_KID_LENGTH {
        return Err(Error::MalformedKey(format!(
            "kid too long: {} bytes (maximum: {MAX_KID_LENGTH} bytes)",
            kid.len()
        )));
    }
    Ok(())
}

/// Big-endian integer without leading zero octets (RFC 7518 Section 6.3.1)
fn unsigned_integer(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    &bytes[start..]
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kind", &self.kind())
            .field("curve", &self.curve())
            .field("kid", &self.key_id)
            .field("alg", &self.algorithm)
            .field("use", &self.key_use)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys;

    #[test]
    fn test_symmetric_rejects_empty_secret() {
        assert!(matches!(
            KeyMaterial::symmetric(Vec::new()),
            Err(Error::IncompleteKeyMaterial(_))
        ));
        let key = KeyMaterial::symmetric(b"secret".to_vec()).unwrap();
        assert_eq!(key.kind(), KeyKind::Symmetric);
        assert!(key.kind().can_sign());
    }

    #[test]
    fn test_field_accessors() {
        let mut key = test_keys::p256_private();
        key.set_field("kid", "key-1").unwrap();
        key.set_field("alg", "ES256").unwrap();
        key.set_field("use", "sig").unwrap();

        assert_eq!(key.field("kid").unwrap().as_deref(), Some("key-1"));
        assert_eq!(key.field("alg").unwrap().as_deref(), Some("ES256"));
        assert_eq!(key.field("use").unwrap().as_deref(), Some("sig"));
        assert_eq!(key.field("kty").unwrap().as_deref(), Some("EC"));
        assert_eq!(key.algorithm(), Some(Algorithm::ES256));
        assert_eq!(key.key_use(), Some(KeyUse::Signature));
    }

    #[test]
    fn test_field_unknown_name_rejected() {
        let mut key = KeyMaterial::symmetric(b"secret".to_vec()).unwrap();
        assert!(matches!(key.field("x5c"), Err(Error::UnknownField(name)) if name == "x5c"));
        assert!(matches!(
            key.set_field("foo", "bar"),
            Err(Error::UnknownField(_))
        ));
        assert!(matches!(
            key.set_field("kty", "RSA"),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn test_field_invalid_values() {
        let mut key = KeyMaterial::symmetric(b"secret".to_vec()).unwrap();
        assert!(matches!(
            key.set_field("alg", "none"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            key.set_field("use", "wrap"),
            Err(Error::MalformedKey(_))
        ));
        assert_eq!(key.field("alg").unwrap(), None);
    }

    #[test]
    fn test_public_key_strips_private_components() {
        let private = test_keys::rsa_private().with_key_id("rsa-1").unwrap();
        let public = private.public_key().unwrap();
        assert_eq!(public.kind(), KeyKind::RsaPublic);
        assert_eq!(public.key_id(), Some("rsa-1"));
        assert!(!public.kind().can_sign());

        let private = test_keys::p384_private();
        let public = private.public_key().unwrap();
        assert_eq!(public.kind(), KeyKind::EcPublic);
        assert_eq!(public.curve(), Some(EcCurve::P384));
    }

    #[test]
    fn test_public_key_of_symmetric_fails() {
        let key = KeyMaterial::symmetric(b"secret".to_vec()).unwrap();
        assert!(matches!(
            key.public_key(),
            Err(Error::UnsupportedKeyType(_))
        ));
        assert!(key.public_key_der().is_err());
    }

    #[test]
    fn test_public_key_pem_matches_fixture() {
        let private = test_keys::p256_private();
        let pem = private.public_key_pem().unwrap();
        let expected = KeyMaterial::from_pem(test_keys::P256_PUBLIC_PEM).unwrap();
        assert_eq!(KeyMaterial::from_pem(&pem).unwrap(), expected);

        let rsa = test_keys::rsa_private();
        let der = rsa.public_key_der().unwrap();
        let reparsed = KeyMaterial::from_raw(RawKey::Der(der)).unwrap();
        assert_eq!(reparsed, rsa.public_key().unwrap());
    }

    #[test]
    fn test_thumbprint_rfc7638_example() {
        // RFC 7638 Section 3.1
        let jwk = r#"{
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
            "alg": "RS256",
            "kid": "2011-04-29"
        }"#;
        let key = KeyMaterial::from_json(jwk).unwrap();
        assert_eq!(
            key.thumbprint(),
            "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs"
        );
    }

    #[test]
    fn test_thumbprint_ignores_leading_zero_octets() {
        let key = test_keys::rsa_private().public_key().unwrap();
        let mut jwk = key.to_value();
        let n = base64url::decode(jwk["n"].as_str().unwrap(), 1024).unwrap();
        let e = base64url::decode(jwk["e"].as_str().unwrap(), 1024).unwrap();
        jwk["n"] = base64url::encode([&[0u8][..], &n].concat()).into();
        jwk["e"] = base64url::encode([&[0u8, 0][..], &e].concat()).into();

        let padded = KeyMaterial::from_value(jwk).unwrap();
        assert_ne!(padded, key);
        assert_eq!(padded.thumbprint(), key.thumbprint());
    }

    #[test]
    fn test_key_id_length_limit() {
        let longest = "k".repeat(MAX_KID_LENGTH);
        let key = test_keys::hmac_secret().with_key_id(longest.as_str()).unwrap();

        // The longest kid survives marshaling and token headers
        assert_eq!(KeyMaterial::from_json(&key.to_json()).unwrap(), key);
        let claims = crate::TokenClaims::builder().subject("s").build().unwrap();
        let token = crate::token::sign(&claims, Algorithm::HS256, &key).unwrap();
        let keys: crate::KeySet = [key.clone()].into_iter().collect();
        assert_eq!(crate::parse_and_verify(&token, &keys, 0).unwrap(), claims);

        let too_long = "k".repeat(MAX_KID_LENGTH + 1);
        assert!(matches!(
            key.clone().with_key_id(too_long.as_str()),
            Err(Error::MalformedKey(_))
        ));

        let mut key = key;
        assert!(matches!(
            key.set_field("kid", &too_long),
            Err(Error::MalformedKey(_))
        ));
        assert!(matches!(key.set_key_id(too_long), Err(Error::MalformedKey(_))));
        assert_eq!(key.key_id(), Some(longest.as_str()));
    }

    #[test]
    fn test_symmetric_size_limit() {
        let largest = KeyMaterial::symmetric(vec![7; MAX_SYMMETRIC_KEY_SIZE]).unwrap();
        assert_eq!(KeyMaterial::from_json(&largest.to_json()).unwrap(), largest);

        assert!(matches!(
            KeyMaterial::symmetric(vec![7; MAX_SYMMETRIC_KEY_SIZE + 1]),
            Err(Error::MalformedKey(_))
        ));
        assert!(matches!(
            KeyMaterial::from_raw(vec![7; MAX_SYMMETRIC_KEY_SIZE + 1]),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn test_thumbprint_shared_by_private_and_public() {
        let private = test_keys::p521_private();
        let public = private.public_key().unwrap();
        assert_eq!(private.thumbprint(), public.thumbprint());
        assert_ne!(private.thumbprint(), test_keys::p256_private().thumbprint());
    }

    #[test]
    fn test_debug_hides_key_bytes() {
        let key = KeyMaterial::symmetric(b"very-secret-value".to_vec()).unwrap();
        let output = format!("{key:?}");
        assert!(output.contains("Symmetric"));
        assert!(!output.contains("very-secret-value"));
    }

    #[test]
    fn test_ec_point_sec1() {
        let point = EcPoint {
            curve: EcCurve::P256,
            x: vec![1; 32],
            y: vec![2; 32],
        };
        let encoded = point.to_sec1();
        assert_eq!(encoded.len(), 65);
        assert_eq!(EcPoint::from_sec1(EcCurve::P256, &encoded).unwrap(), point);
        assert!(EcPoint::from_sec1(EcCurve::P384, &encoded).is_err());
    }
}
