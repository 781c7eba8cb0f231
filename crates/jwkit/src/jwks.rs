//! JSON Web Key Set (JWKS)

use crate::error::{Error, Result};
use crate::keys::KeyMaterial;
use crate::limits::MAX_JWK_SET_SIZE;
use indexmap::IndexMap;
use serde::Deserialize;

/// An ordered set of keys addressed by key ID
///
/// Iteration and serialization follow insertion order; lookup by `kid` is
/// a hash lookup. Every entry carries a `kid`: keys inserted without one
/// receive their RFC 7638 thumbprint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeySet {
    keys: IndexMap<String, KeyMaterial>,
}

/// Wire form of a key set document
#[derive(Deserialize)]
struct JwkSetDocument {
    keys: Option<Vec<serde_json::Value>>,
}

impl KeySet {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, replacing any entry with the same `kid`
    ///
    /// A key without `kid` is assigned its thumbprint first. A replaced
    /// entry keeps its position. Returns the effective `kid`.
    pub fn add(&mut self, mut key: KeyMaterial) -> String {
        let kid = match key.key_id() {
            Some(kid) => kid.to_string(),
            None => {
                let kid = key.assign_thumbprint_key_id();
                tracing::debug!(kid = %kid, "assigned thumbprint as key id");
                kid
            }
        };

        if self.keys.insert(kid.clone(), key).is_some() {
            tracing::warn!(kid = %kid, "replaced key with duplicate key id");
        }

        kid
    }

    /// Remove the key with the given `kid`
    pub fn remove(&mut self, kid: &str) -> Option<KeyMaterial> {
        self.keys.shift_remove(kid)
    }

    /// Look up a key by `kid`, failing with [`Error::KeyNotFound`]
    pub fn lookup(&self, kid: &str) -> Result<&KeyMaterial> {
        self.keys
            .get(kid)
            .ok_or_else(|| Error::KeyNotFound(kid.to_string()))
    }

    /// Look up a key by `kid`
    pub fn get(&self, kid: &str) -> Option<&KeyMaterial> {
        self.keys.get(kid)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    /// Keys in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &KeyMaterial> + '_ {
        self.keys.values()
    }

    /// Key IDs in insertion order
    pub fn key_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Public halves of every key, for publication as a JWKS document
    ///
    /// Fails with [`Error::UnsupportedKeyType`] if the set holds a
    /// symmetric key.
    pub fn to_public(&self) -> Result<KeySet> {
        let mut public = KeySet::new();
        for key in self.iter() {
            public.add(key.public_key()?);
        }
        Ok(public)
    }

    /// Parse a JWKS document (`{"keys": [...]}`)
    ///
    /// Any entry that is not a valid key fails the whole document.
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<Self> {
        let document: JwkSetDocument = serde_json::from_slice(json.as_ref())
            .map_err(|e| Error::MalformedKeySet(format!("invalid JWKS JSON: {e}")))?;
        Self::from_document(document)
    }

    /// Parse a JWKS document from a JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let document: JwkSetDocument = serde_json::from_value(value)
            .map_err(|e| Error::MalformedKeySet(format!("invalid JWKS JSON: {e}")))?;
        Self::from_document(document)
    }

    fn from_document(document: JwkSetDocument) -> Result<Self> {
        let entries = document
            .keys
            .ok_or_else(|| Error::MalformedKeySet("missing 'keys' array".into()))?;

        if entries.len() > MAX_JWK_SET_SIZE {
            return Err(Error::MalformedKeySet(format!(
                "too many keys: {} (maximum: {MAX_JWK_SET_SIZE})",
                entries.len()
            )));
        }

        let mut set = KeySet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let key = KeyMaterial::from_value(entry)
                .map_err(|e| Error::MalformedKeySet(format!("key {index}: {e}")))?;
            set.add(key);
        }

        tracing::debug!(keys = set.len(), "parsed key set");
        Ok(set)
    }

    /// Marshal as a JWKS JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "keys": self.iter().map(KeyMaterial::to_value).collect::<Vec<_>>()
        })
    }

    /// Marshal as compact JWKS JSON text
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Marshal as indented JWKS JSON text
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a KeyMaterial;
    type IntoIter = indexmap::map::Values<'a, String, KeyMaterial>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.values()
    }
}

impl FromIterator<KeyMaterial> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyMaterial>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.add(key);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::keys::KeyKind;
    use crate::test_keys;
    use serde_json::json;

    #[test]
    fn test_add_and_lookup() {
        let mut set = KeySet::new();
        assert!(set.is_empty());

        let kid = set.add(test_keys::rsa_private().with_key_id("rsa-1").unwrap());
        assert_eq!(kid, "rsa-1");
        assert_eq!(set.len(), 1);
        assert_eq!(set.lookup("rsa-1").unwrap().kind(), KeyKind::RsaPrivate);
        assert!(matches!(
            set.lookup("missing"),
            Err(Error::KeyNotFound(kid)) if kid == "missing"
        ));
    }

    #[test]
    fn test_add_without_kid_assigns_thumbprint() {
        let mut set = KeySet::new();
        let key = test_keys::p256_private();
        let thumbprint = key.thumbprint();

        let kid = set.add(key);
        assert_eq!(kid, thumbprint);
        assert_eq!(set.lookup(&thumbprint).unwrap().key_id(), Some(thumbprint.as_str()));

        // Same key again replaces instead of duplicating
        set.add(test_keys::p256_private());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_kid_replaces_in_place() {
        let mut set = KeySet::new();
        set.add(test_keys::hmac_secret().with_key_id("a").unwrap());
        set.add(test_keys::p256_private().with_key_id("b").unwrap());
        set.add(test_keys::p384_private().with_key_id("a").unwrap());

        assert_eq!(set.len(), 2);
        assert_eq!(set.key_ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(set.lookup("a").unwrap().kind(), KeyKind::EcPrivate);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut set: KeySet = ["a", "b", "c"]
            .into_iter()
            .map(|kid| test_keys::hmac_secret().with_key_id(kid).unwrap())
            .collect();

        assert!(set.remove("b").is_some());
        assert!(set.remove("b").is_none());
        assert_eq!(set.key_ids().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let set: KeySet = ["x", "y"]
            .into_iter()
            .map(|kid| test_keys::hmac_secret().with_key_id(kid).unwrap())
            .collect();

        let first: Vec<_> = set.iter().map(|k| k.key_id()).collect();
        let second: Vec<_> = (&set).into_iter().map(|k| k.key_id()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![Some("x"), Some("y")]);
    }

    #[test]
    fn test_unmarshal() {
        let set = KeySet::from_value(json!({
            "keys": [
                {"kty": "oct", "kid": "h", "k": "c2VjcmV0"},
                {"kty": "RSA", "kid": "r", "n": "AQAB", "e": "AQAB", "alg": "RS256"}
            ]
        }))
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.lookup("r").unwrap().algorithm(), Some(Algorithm::RS256));
    }

    #[test]
    fn test_unmarshal_missing_keys() {
        assert!(matches!(
            KeySet::from_json(r#"{"other": []}"#),
            Err(Error::MalformedKeySet(_))
        ));
        assert!(matches!(
            KeySet::from_json(r#"{"keys": {}}"#),
            Err(Error::MalformedKeySet(_))
        ));
        assert!(matches!(
            KeySet::from_json("not json"),
            Err(Error::MalformedKeySet(_))
        ));
    }

    #[test]
    fn test_unmarshal_bad_entry_fails_document() {
        let result = KeySet::from_value(json!({
            "keys": [
                {"kty": "oct", "kid": "ok", "k": "c2VjcmV0"},
                {"kty": "RSA", "kid": "broken", "n": "AQAB"}
            ]
        }));
        assert!(matches!(result, Err(Error::MalformedKeySet(msg)) if msg.starts_with("key 1")));
    }

    #[test]
    fn test_unmarshal_too_many_keys() {
        let keys: Vec<_> = (0..=MAX_JWK_SET_SIZE)
            .map(|i| json!({"kty": "oct", "kid": i.to_string(), "k": "c2VjcmV0"}))
            .collect();
        assert!(matches!(
            KeySet::from_value(json!({ "keys": keys })),
            Err(Error::MalformedKeySet(_))
        ));
    }

    #[test]
    fn test_marshal_round_trip() {
        let mut set = KeySet::new();
        set.add(test_keys::rsa_private().with_key_id("rsa").unwrap().with_algorithm(Algorithm::RS256));
        set.add(test_keys::p521_private().with_key_id("ec").unwrap());
        set.add(test_keys::hmac_secret().with_key_id("hmac").unwrap());

        let json = set.to_json();
        let parsed = KeySet::from_json(&json).unwrap();
        assert_eq!(parsed, set);
        assert_eq!(parsed.key_ids().collect::<Vec<_>>(), vec!["rsa", "ec", "hmac"]);
        assert!(set.to_json_pretty().contains('\n'));
    }

    #[test]
    fn test_to_public() {
        let mut set = KeySet::new();
        set.add(test_keys::rsa_private().with_key_id("rsa").unwrap());
        set.add(test_keys::p256_private().with_key_id("ec").unwrap());

        let public = set.to_public().unwrap();
        assert_eq!(public.lookup("rsa").unwrap().kind(), KeyKind::RsaPublic);
        assert_eq!(public.lookup("ec").unwrap().kind(), KeyKind::EcPublic);
        assert!(!public.to_json().contains("\"d\""));

        set.add(test_keys::hmac_secret().with_key_id("hmac").unwrap());
        assert!(matches!(
            set.to_public(),
            Err(Error::UnsupportedKeyType(_))
        ));
    }
}
