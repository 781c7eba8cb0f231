//! JWK (JSON Web Key) wire form and conversion

use super::{
    EcCurve, EcPoint, KeyMaterial, KeyPayload, RsaPrivateParts, RsaPublicParts, SecretBytes,
};
use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::limits::{MAX_RSA_COMPONENT_SIZE, MAX_SYMMETRIC_KEY_SIZE};
use crate::utils::base64url;
use serde::{Deserialize, Serialize};

/// JSON Web Key (JWK) structure
///
/// Every member is optional on the wire; [`KeyMaterial::try_from`] decides
/// which members the declared `kty` requires. Unknown members are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Jwk {
    /// Key type ("oct", "RSA" or "EC")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    // RSA fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    // Private exponent (RSA) or scalar (EC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
    // EC fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    // Symmetric secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

fn required<'a>(field: &'a Option<String>, name: &str, kty: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| Error::MalformedKey(format!("{kty} key is missing '{name}'")))
}

fn decode_field(value: &str, name: &str, max_size: usize) -> Result<Vec<u8>> {
    let bytes = base64url::decode(value, max_size)
        .map_err(|e| Error::MalformedKey(format!("field '{name}': {e}")))?;
    if bytes.is_empty() {
        return Err(Error::MalformedKey(format!("field '{name}' is empty")));
    }
    Ok(bytes)
}

fn decode_secret(value: &Option<String>, name: &str) -> Result<Option<SecretBytes>> {
    value
        .as_deref()
        .map(|v| decode_field(v, name, MAX_RSA_COMPONENT_SIZE).map(SecretBytes::new))
        .transpose()
}

fn decode_coordinate(value: &str, name: &str, curve: EcCurve) -> Result<Vec<u8>> {
    let bytes = decode_field(value, name, curve.field_size())?;
    if bytes.len() != curve.field_size() {
        return Err(Error::MalformedKey(format!(
            "field '{name}' must be {} bytes for {curve}, found {}",
            curve.field_size(),
            bytes.len()
        )));
    }
    Ok(bytes)
}

impl Jwk {
    fn to_payload(&self) -> Result<KeyPayload> {
        let kty = self
            .kty
            .as_deref()
            .ok_or_else(|| Error::MalformedKey("missing key type (kty)".into()))?;

        match kty {
            "oct" => {
                let k = required(&self.k, "k", kty)?;
                let secret = decode_field(k, "k", MAX_SYMMETRIC_KEY_SIZE)?;
                Ok(KeyPayload::Symmetric(SecretBytes::new(secret)))
            }
            "RSA" => {
                let public = RsaPublicParts {
                    n: decode_field(required(&self.n, "n", kty)?, "n", MAX_RSA_COMPONENT_SIZE)?,
                    e: decode_field(required(&self.e, "e", kty)?, "e", MAX_RSA_COMPONENT_SIZE)?,
                };

                let Some(d) = decode_secret(&self.d, "d")? else {
                    return Ok(KeyPayload::RsaPublic(public));
                };

                let private = RsaPrivateParts {
                    d,
                    p: decode_secret(&self.p, "p")?,
                    q: decode_secret(&self.q, "q")?,
                    dp: decode_secret(&self.dp, "dp")?,
                    dq: decode_secret(&self.dq, "dq")?,
                    qi: decode_secret(&self.qi, "qi")?,
                };
                Ok(KeyPayload::RsaPrivate(public, private))
            }
            "EC" => {
                let crv = required(&self.crv, "crv", kty)?;
                let curve = EcCurve::from_name(crv)
                    .ok_or_else(|| Error::UnsupportedKeyType(format!("EC curve '{crv}'")))?;

                let point = EcPoint {
                    curve,
                    x: decode_coordinate(required(&self.x, "x", kty)?, "x", curve)?,
                    y: decode_coordinate(required(&self.y, "y", kty)?, "y", curve)?,
                };

                match &self.d {
                    Some(d) => Ok(KeyPayload::EcPrivate(
                        point,
                        SecretBytes::new(decode_coordinate(d, "d", curve)?),
                    )),
                    None => Ok(KeyPayload::EcPublic(point)),
                }
            }
            other => Err(Error::UnsupportedKeyType(format!("kty '{other}'"))),
        }
    }
}

impl TryFrom<Jwk> for KeyMaterial {
    type Error = Error;

    fn try_from(jwk: Jwk) -> Result<Self> {
        let mut key = KeyMaterial::from_payload(jwk.to_payload()?);

        if let Some(kid) = jwk.kid {
            key.set_key_id(kid)?;
        }

        if let Some(alg) = jwk.alg.as_deref() {
            let algorithm: Algorithm = alg
                .parse()
                .map_err(|_| Error::MalformedKey(format!("unknown algorithm '{alg}'")))?;
            key.set_algorithm(algorithm);
        }

        if let Some(key_use) = jwk.key_use.as_deref() {
            key.set_key_use(key_use.parse()?);
        }

        Ok(key)
    }
}

impl From<&KeyMaterial> for Jwk {
    fn from(key: &KeyMaterial) -> Self {
        let encode = |bytes: &[u8]| Some(base64url::encode(bytes));
        let encode_secret = |secret: &Option<SecretBytes>| {
            secret.as_ref().map(|s| base64url::encode(s.as_bytes()))
        };

        let mut jwk = Jwk {
            kty: Some(key.kind().kty().to_string()),
            kid: key.key_id().map(str::to_string),
            alg: key.algorithm().map(|alg| alg.as_str().to_string()),
            key_use: key.key_use().map(|u| u.as_str().to_string()),
            ..Default::default()
        };

        match key.payload() {
            KeyPayload::Symmetric(secret) => jwk.k = encode(secret.as_bytes()),
            KeyPayload::RsaPublic(public) => {
                jwk.n = encode(&public.n);
                jwk.e = encode(&public.e);
            }
            KeyPayload::RsaPrivate(public, private) => {
                jwk.n = encode(&public.n);
                jwk.e = encode(&public.e);
                jwk.d = encode(private.d.as_bytes());
                jwk.p = encode_secret(&private.p);
                jwk.q = encode_secret(&private.q);
                jwk.dp = encode_secret(&private.dp);
                jwk.dq = encode_secret(&private.dq);
                jwk.qi = encode_secret(&private.qi);
            }
            KeyPayload::EcPublic(point) => {
                jwk.crv = Some(point.curve.name().to_string());
                jwk.x = encode(&point.x);
                jwk.y = encode(&point.y);
            }
            KeyPayload::EcPrivate(point, d) => {
                jwk.crv = Some(point.curve.name().to_string());
                jwk.x = encode(&point.x);
                jwk.y = encode(&point.y);
                jwk.d = encode(d.as_bytes());
            }
        }

        jwk
    }
}

impl From<KeyMaterial> for Jwk {
    fn from(key: KeyMaterial) -> Self {
        Jwk::from(&key)
    }
}

impl Serialize for KeyMaterial {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Jwk::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyMaterial {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let jwk = Jwk::deserialize(deserializer)?;
        KeyMaterial::try_from(jwk).map_err(serde::de::Error::custom)
    }
}

impl KeyMaterial {
    /// Parse a single JWK from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let jwk: Jwk = serde_json::from_str(json)
            .map_err(|e| Error::MalformedKey(format!("invalid JWK JSON: {e}")))?;
        KeyMaterial::try_from(jwk)
    }

    /// Parse a single JWK from a JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let jwk: Jwk = serde_json::from_value(value)
            .map_err(|e| Error::MalformedKey(format!("invalid JWK JSON: {e}")))?;
        KeyMaterial::try_from(jwk)
    }

    /// Marshal as a JWK JSON object, private members included
    pub fn to_value(&self) -> serde_json::Value {
        // A struct of optional strings always serializes to an object
        serde_json::to_value(Jwk::from(self)).unwrap_or_default()
    }

    /// Marshal as JWK JSON text, private members included
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
