use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::limits::{MAX_DECODED_HEADER_SIZE, MAX_KID_LENGTH};
use crate::utils::base64url;
use serde::{Deserialize, Serialize};

/// JOSE header of a compact token
///
/// Serialized members appear in the order `alg`, `kid`, `typ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: Algorithm,

    /// Key ID (for key set selection)
    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// Media type, "JWT" for tokens issued by this crate
    #[serde(rename = "typ", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Header as found on the wire, before `alg` is checked
#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
    kid: Option<String>,
    typ: Option<String>,
    crit: Option<serde_json::Value>,
}

impl TokenHeader {
    /// Header for a token issued with `algorithm` and an optional key ID
    pub(crate) fn new(algorithm: Algorithm, key_id: Option<&str>) -> Self {
        Self {
            algorithm,
            key_id: key_id.map(str::to_string),
            token_type: Some("JWT".to_string()),
        }
    }

    /// Decode the Base64URL header segment
    ///
    /// A missing `alg` is a [`Error::MalformedHeader`]; an `alg` outside the
    /// supported set is [`Error::UnsupportedAlgorithm`].
    pub(crate) fn decode(segment: &str) -> Result<Self> {
        let bytes = base64url::decode(segment, MAX_DECODED_HEADER_SIZE)
            .map_err(Error::MalformedHeader)?;

        let raw: RawHeader = serde_json::from_slice(&bytes)
            .map_err(|e| Error::MalformedHeader(format!("invalid JSON: {e}")))?;

        // No extensions are understood, so any critical one must be refused (RFC 7515 4.1.11)
        if raw.crit.is_some() {
            return Err(Error::MalformedHeader(
                "unsupported critical header parameters".into(),
            ));
        }

        let algorithm = raw
            .alg
            .ok_or_else(|| Error::MalformedHeader("missing 'alg'".into()))?
            .parse()?;

        if let Some(kid) = &raw.kid {
            if kid.len() > MAX_KID_LENGTH {
                return Err(Error::MalformedHeader(format!(
                    "kid too long: {} bytes (maximum: {MAX_KID_LENGTH} bytes)",
                    kid.len()
                )));
            }
        }

        Ok(Self {
            algorithm,
            key_id: raw.kid,
            token_type: raw.typ,
        })
    }

    /// Base64URL encoding of the header JSON
    pub(crate) fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| Error::MalformedHeader(format!("serialization failed: {e}")))?;
        Ok(base64url::encode(json))
    }
}
