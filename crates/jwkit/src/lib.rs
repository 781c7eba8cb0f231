//! # jwkit - JSON Web Keys, Key Sets and Signed Tokens
//!
//! **jwkit** holds cryptographic keys together with their JOSE metadata,
//! groups them into key sets addressed by key ID, signs payloads and
//! issues or verifies compact JSON Web Tokens against a key set.
//!
//! ## Overview
//!
//! A [`KeyMaterial`] is one of five shapes: a symmetric secret, an RSA
//! public or private key, or an EC (P-256, P-384, P-521) public or private
//! key. It can be built from raw `rsa`/`p256`/`p384`/`p521` key objects,
//! from PEM or DER, or from a JWK document, and it marshals back to any of
//! those. A [`KeySet`] is an ordered collection of keys that marshals as a
//! JWKS document.
//!
//! Token verification is a staged pipeline:
//!
//! ```text
//! compact token
//!     │ split into 3 segments, decode header
//!     ▼
//! ParsedToken (internal)
//!     │ resolve key by kid, verify signature
//!     ▼
//! VerifiedToken (internal)
//!     │ decode claims, check exp / nbf (and optional iss / aud)
//!     ▼
//! TokenClaims
//! ```
//!
//! Claims are never decoded from a token whose signature did not verify.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwkit::*;
//!
//! let key = KeyMaterial::from_pem(private_pem)?.with_key_id("666000001")?;
//!
//! let claims = TokenClaims::builder()
//!     .issuer("https://github.com/lestrrat-go/jwx")
//!     .issued_now()
//!     .claim("foo", "bar")
//!     .build()?;
//! let token = token::sign(&claims, Algorithm::RS256, &key)?;
//!
//! let mut published = KeySet::new();
//! published.add(key.public_key()?);
//!
//! let verified = parse_and_verify_now(&token, &published)?;
//! assert_eq!(verified.get("foo"), Some("bar".into()));
//! ```
//!
//! ## Algorithm Support
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA PKCS#1 v1.5**: RS256, RS384, RS512
//! - **RSA-PSS**: PS256, PS384, PS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! `none` and every other identifier is rejected with
//! [`Error::UnsupportedAlgorithm`].
//!
//! ## Features
//!
//! - **`remote`** (default): [`remote::fetch_key_set`] fetches a JWKS
//!   document over HTTPS (`reqwest` with rustls).
//!
//! ## Security
//!
//! - The algorithm family and curve of every operation are checked
//!   against the key, and a key's own `alg` metadata pins it to one
//!   algorithm.
//! - HMAC verification compares tags in constant time.
//! - Secret key bytes are wiped on drop and never printed by `Debug`.
//! - Untrusted input (tokens, JWK documents, HTTP bodies) is size-limited
//!   before it is decoded.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) JSON Web Signature (JWS)
//! - [RFC 7517](https://datatracker.ietf.org/doc/html/rfc7517) JSON Web Key (JWK)
//! - [RFC 7518](https://datatracker.ietf.org/doc/html/rfc7518) JSON Web Algorithms (JWA)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) JSON Web Token (JWT)
//! - [RFC 7638](https://datatracker.ietf.org/doc/html/rfc7638) JWK Thumbprint

// Core modules
pub mod error;
pub(crate) mod limits;
pub(crate) mod utils;

// Keys and algorithms
pub mod algorithm;
pub mod jwks;
pub mod keys;

// Claims and tokens
pub mod claims;
pub mod token;

// Remote key sets
#[cfg(feature = "remote")]
pub mod remote;

#[cfg(test)]
mod test_keys;

// ============================================================================
// PUBLIC API
// ============================================================================

// Keys
pub use jwks::KeySet;
pub use keys::{EcCurve, KeyKind, KeyMaterial, KeyUse, RawKey};

// Signing and verification of raw payloads
pub use algorithm::{sign, verify, Algorithm, AlgorithmFamily};

// Tokens
pub use claims::{ClaimsBuilder, TokenClaims, ValidationOptions};
pub use token::{
    decode_header, parse_and_verify, parse_and_verify_now, parse_and_verify_with, TokenHeader,
};

pub use error::{Error, Result};
