//! Token claims and claim validation
//!
//! This module provides the JWT claims model (registered claims plus
//! arbitrary private claims), a builder for issuing tokens and the
//! temporal/issuer/audience validation applied after a signature verifies.

use crate::error::{Error, Result};
use crate::limits::MAX_LEEWAY_SECONDS;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Registered claim names (RFC 7519 Section 4.1)
const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Decoded claims of a JWT
///
/// All registered claims are optional. Timestamps are NumericDate values
/// (seconds since the Unix epoch).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer (iss)
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Subject (sub)
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Audience (aud), a single string on the wire when it holds one value
    #[serde(
        rename = "aud",
        default,
        skip_serializing_if = "BTreeSet::is_empty",
        with = "audience"
    )]
    pub audience: BTreeSet<String>,

    /// Expiration Time (exp)
    #[serde(
        rename = "exp",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date::deserialize"
    )]
    pub expires_at: Option<i64>,

    /// Not Before (nbf)
    #[serde(
        rename = "nbf",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date::deserialize"
    )]
    pub not_before: Option<i64>,

    /// Issued At (iat)
    #[serde(
        rename = "iat",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date::deserialize"
    )]
    pub issued_at: Option<i64>,

    /// JWT ID (jti)
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub jwt_id: Option<String>,

    /// Private claims
    #[serde(flatten)]
    pub private: Map<String, Value>,
}

impl TokenClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// Read any claim by name as JSON
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "iss" => self.issuer.clone().map(Value::from),
            "sub" => self.subject.clone().map(Value::from),
            "aud" => match self.audience.len() {
                0 => None,
                1 => self.audience.first().cloned().map(Value::from),
                _ => Some(self.audience.iter().cloned().collect()),
            },
            "exp" => self.expires_at.map(Value::from),
            "nbf" => self.not_before.map(Value::from),
            "iat" => self.issued_at.map(Value::from),
            "jti" => self.jwt_id.clone().map(Value::from),
            other => self.private.get(other).cloned(),
        }
    }

    /// Set any claim by name
    ///
    /// Registered claim names are routed to their typed fields and must carry
    /// a value of the right JSON type, otherwise [`Error::MalformedPayload`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if !REGISTERED_CLAIMS.contains(&name) {
            self.private.insert(name.to_string(), value);
            return Ok(());
        }

        // Round-trip through the wire form so the same rules apply as when parsing
        let mut wire = Map::new();
        wire.insert(name.to_string(), value);
        let parsed: TokenClaims = serde_json::from_value(Value::Object(wire))
            .map_err(|e| Error::MalformedPayload(format!("claim '{name}': {e}")))?;

        match name {
            "iss" => self.issuer = parsed.issuer,
            "sub" => self.subject = parsed.subject,
            "aud" => self.audience = parsed.audience,
            "exp" => self.expires_at = parsed.expires_at,
            "nbf" => self.not_before = parsed.not_before,
            "iat" => self.issued_at = parsed.issued_at,
            _ => self.jwt_id = parsed.jwt_id,
        }
        Ok(())
    }
}

/// Builder for [`TokenClaims`]
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: TokenClaims,
    error: Option<Error>,
}

impl ClaimsBuilder {
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.issuer = Some(issuer.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.claims.subject = Some(subject.into());
        self
    }

    /// Add an audience value; may be called repeatedly
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.claims.audience.insert(audience.into());
        self
    }

    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.claims.expires_at = Some(timestamp);
        self
    }

    pub fn not_before(mut self, timestamp: i64) -> Self {
        self.claims.not_before = Some(timestamp);
        self
    }

    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.claims.issued_at = Some(timestamp);
        self
    }

    /// Set `iat` to the current system time
    pub fn issued_now(self) -> Self {
        self.issued_at(unix_now())
    }

    pub fn jwt_id(mut self, jwt_id: impl Into<String>) -> Self {
        self.claims.jwt_id = Some(jwt_id.into());
        self
    }

    /// Set an arbitrary claim, see [`TokenClaims::set`]
    pub fn claim(mut self, name: &str, value: impl Into<Value>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.claims.set(name, value) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Finish the claims, reporting the first invalid [`ClaimsBuilder::claim`]
    pub fn build(self) -> Result<TokenClaims> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.claims),
        }
    }
}

/// Configuration for claims validation
///
/// The default checks `exp` and `nbf` without leeway and nothing else,
/// which is the behavior of [`crate::parse_and_verify`].
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    validate_exp: bool,
    validate_nbf: bool,
    leeway_seconds: u64,
    required_issuer: Option<String>,
    required_audience: Option<String>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_exp: true,
            validate_nbf: true,
            leeway_seconds: 0,
            required_issuer: None,
            required_audience: None,
        }
    }
}

impl ValidationOptions {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set leeway applied to `exp` and `nbf`
    ///
    /// # Security
    /// Leeway is capped at 300 seconds so it cannot effectively disable
    /// expiration checks. Larger values are clamped.
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds.min(MAX_LEEWAY_SECONDS);
        self
    }

    /// Require a specific issuer
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    /// Require a specific audience
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    /// Disable expiration validation
    pub fn no_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// Validate claims at `now` (seconds since the Unix epoch)
    ///
    /// `exp` must be strictly after `now`; `nbf` must be at or before `now`.
    /// Absent temporal claims are not checked.
    pub fn validate(&self, claims: &TokenClaims, now: i64) -> Result<()> {
        let leeway = self.leeway_seconds as i64;

        if self.validate_exp {
            if let Some(exp) = claims.expires_at {
                if exp.saturating_add(leeway) <= now {
                    return Err(Error::TokenExpired {
                        expired_at: exp,
                        now,
                    });
                }
            }
        }

        if self.validate_nbf {
            if let Some(nbf) = claims.not_before {
                if nbf.saturating_sub(leeway) > now {
                    return Err(Error::TokenNotYetValid {
                        not_before: nbf,
                        now,
                    });
                }
            }
        }

        if let Some(expected) = &self.required_issuer {
            if claims.issuer.as_ref() != Some(expected) {
                return Err(Error::IssuerMismatch {
                    expected: expected.clone(),
                    found: claims.issuer.clone(),
                });
            }
        }

        if let Some(expected) = &self.required_audience {
            if !claims.audience.contains(expected) {
                return Err(Error::AudienceMismatch {
                    expected: expected.clone(),
                    found: claims.audience.iter().cloned().collect(),
                });
            }
        }

        Ok(())
    }
}

/// Current system time as seconds since the Unix epoch
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

/// `aud` as string-or-array
mod audience {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeSet;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub(super) fn serialize<S: Serializer>(
        audience: &BTreeSet<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match audience.first() {
            Some(single) if audience.len() == 1 => single.serialize(serializer),
            _ => audience.serialize(serializer),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<String>, D::Error> {
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => BTreeSet::new(),
            Some(OneOrMany::One(single)) => BTreeSet::from([single]),
            Some(OneOrMany::Many(many)) => many.into_iter().collect(),
        })
    }
}

/// NumericDate: integer or fractional seconds, fraction truncated
mod numeric_date {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
            return Ok(None);
        };

        if let Some(seconds) = number.as_i64() {
            return Ok(Some(seconds));
        }

        match number.as_f64() {
            Some(seconds) if seconds.is_finite() && seconds.abs() < i64::MAX as f64 => {
                Ok(Some(seconds.trunc() as i64))
            }
            _ => Err(D::Error::custom(format!(
                "NumericDate out of range: {number}"
            ))),
        }
    }
}
