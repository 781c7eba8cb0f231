//! DER encoding of JWK public parameters as SubjectPublicKeyInfo
//!
//! This module uses the RustCrypto `spki` and `der` crates for standards-compliant
//! DER encoding. The output is accepted by the aws-lc-rs verifiers and by
//! any PEM/DER consumer of public keys.

use crate::error::{Error, Result};
use der::{
    asn1::{Any, AnyRef, BitString, UintRef},
    Encode, Sequence,
};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

/// rsaEncryption (RFC 8017)
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// id-ecPublicKey (RFC 5480)
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

fn der_error(operation: &str, details: impl std::fmt::Display) -> Error {
    Error::MalformedKey(format!("der: {operation}: {details}"))
}

/// RSA public key structure for DER encoding
///
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Build DER-encoded SubjectPublicKeyInfo from RSA modulus (n) and exponent (e) bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>> {
    if n.is_empty() || e.is_empty() {
        return Err(der_error("rsa key missing n or e", "empty integer"));
    }

    // UintRef handles INTEGER encoding including leading zero for positive values
    let rsa_pubkey = RsaPublicKey {
        modulus: UintRef::new(n).map_err(|e| der_error("failed to encode RSA modulus", e))?,
        public_exponent: UintRef::new(e)
            .map_err(|e| der_error("failed to encode RSA exponent", e))?,
    };

    let rsa_pubkey_der = rsa_pubkey
        .to_der()
        .map_err(|e| der_error("failed to encode RSA public key", e))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(AnyRef::NULL.into()),
    };

    encode_spki(algorithm, rsa_pubkey_der)
}

/// Build DER-encoded SubjectPublicKeyInfo from an uncompressed SEC1 point
pub(crate) fn ec_spki_from_point(curve_oid: ObjectIdentifier, point: &[u8]) -> Result<Vec<u8>> {
    if point.first() != Some(&0x04) {
        return Err(der_error("ec point", "expected uncompressed SEC1 encoding"));
    }

    let algorithm = AlgorithmIdentifierOwned {
        oid: EC_PUBLIC_KEY_OID,
        parameters: Some(
            Any::encode_from(&curve_oid).map_err(|e| der_error("failed to encode curve", e))?,
        ),
    };

    encode_spki(algorithm, point.to_vec())
}

fn encode_spki(algorithm: AlgorithmIdentifierOwned, key: Vec<u8>) -> Result<Vec<u8>> {
    let subject_public_key =
        BitString::new(0, key).map_err(|e| der_error("failed to create bit string", e))?;

    SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    }
    .to_der()
    .map_err(|e| der_error("failed to encode SPKI", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsa_spki_from_n_e() {
        let n = vec![0x00, 0x01];
        let e = vec![0x01, 0x00, 0x01];

        let der = rsa_spki_from_n_e(&n, &e).expect("should encode");
        assert_eq!(der[0], 0x30); // SEQUENCE
    }

    #[test]
    fn test_rsa_spki_empty_components() {
        assert!(matches!(
            rsa_spki_from_n_e(&[], &[0x01, 0x00, 0x01]),
            Err(Error::MalformedKey(_))
        ));
        assert!(matches!(
            rsa_spki_from_n_e(&[0x01], &[]),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn test_rsa_spki_two_byte_length() {
        // 256-byte modulus simulates a 2048-bit RSA key (requires 2-byte length)
        let mut n = vec![0x00; 256];
        n[0] = 0x01;
        let der = rsa_spki_from_n_e(&n, &[0x01, 0x00, 0x01]).expect("should encode");
        assert_eq!(&der[..2], &[0x30, 0x82]);
        assert!(der.len() > 256);
    }

    #[test]
    fn test_ec_spki_requires_uncompressed_point() {
        let oid = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
        assert!(ec_spki_from_point(oid, &[0x02; 33]).is_err());

        let der = ec_spki_from_point(oid, &[0x04; 65]).expect("should encode");
        assert_eq!(der[0], 0x30);
        // 65-byte point plus unused-bits octet at the tail
        assert_eq!(&der[der.len() - 65..], &[0x04; 65][..]);
    }
}
