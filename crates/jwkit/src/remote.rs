//! Fetching key sets over HTTP
//!
//! A single request per call; callers own caching and refresh.

use crate::error::{Error, Result};
use crate::jwks::KeySet;
use crate::limits::{MAX_JWKS_RESPONSE_SIZE, MAX_JWKS_URL_LENGTH};
use std::time::Duration;
use url::Url;

/// Fetch and parse a JWKS document
///
/// `timeout` bounds the whole request. Network failures, non-2xx statuses
/// and bodies above the size limit are [`Error::RemoteError`]; a body that
/// is not a valid key set is [`Error::MalformedKeySet`].
///
/// # Example
///
/// ```ignore
/// let client = reqwest::Client::new();
/// let keys = jwkit::remote::fetch_key_set(
///     &client,
///     "https://www.googleapis.com/oauth2/v3/certs",
///     Duration::from_secs(5),
/// )
/// .await?;
/// ```
pub async fn fetch_key_set(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<KeySet> {
    let url = validate_url(url)?;

    let mut response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::RemoteError(format!("http: status {status}")));
    }

    if let Some(length) = response.content_length() {
        if length > MAX_JWKS_RESPONSE_SIZE as u64 {
            return Err(oversized(length));
        }
    }

    // Content-Length may be absent or wrong, so count while reading
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?
    {
        if body.len() + chunk.len() > MAX_JWKS_RESPONSE_SIZE {
            return Err(oversized((body.len() + chunk.len()) as u64));
        }
        body.extend_from_slice(&chunk);
    }

    let keys = KeySet::from_json(&body)?;
    tracing::debug!(url = %url, keys = keys.len(), "fetched key set");
    Ok(keys)
}

fn oversized(length: u64) -> Error {
    Error::RemoteError(format!(
        "jwks: response too large: {length} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)"
    ))
}

/// Check that `url` is an absolute http(s) URL with a host
fn validate_url(url: &str) -> Result<Url> {
    if url.trim().is_empty() {
        return Err(Error::RemoteError("jwks: empty url".into()));
    }

    if url.len() > MAX_JWKS_URL_LENGTH {
        return Err(Error::RemoteError(format!(
            "jwks: url too long: {} characters (maximum: {MAX_JWKS_URL_LENGTH})",
            url.len()
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| Error::RemoteError(format!("jwks: invalid url: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::RemoteError(format!(
            "jwks: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::RemoteError("jwks: url has no host".into()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://issuer.example/jwks.json").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/keys").is_ok());

        for url in [
            "",
            "   ",
            "not a url",
            "ftp://issuer.example/jwks.json",
            "file:///etc/passwd",
            "data:text/plain,hello",
        ] {
            assert!(
                matches!(validate_url(url), Err(Error::RemoteError(_))),
                "{url}"
            );
        }

        let long = format!("https://issuer.example/{}", "a".repeat(MAX_JWKS_URL_LENGTH));
        assert!(matches!(validate_url(&long), Err(Error::RemoteError(_))));
    }

    #[tokio::test]
    async fn test_fetch_key_set() {
        let mut keys = KeySet::new();
        keys.add(test_keys::rsa_private().with_key_id("rsa").unwrap());
        keys.add(test_keys::p256_private().with_key_id("ec").unwrap());
        let published = keys.to_public().unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/.well-known/jwks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(published.to_json())
            .create_async()
            .await;

        let url = format!("{}/.well-known/jwks.json", server.url());
        let fetched = fetch_key_set(&reqwest::Client::new(), &url, TIMEOUT)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(fetched, published);
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/jwks.json")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/jwks.json", server.url());
        let result = fetch_key_set(&reqwest::Client::new(), &url, TIMEOUT).await;
        assert!(matches!(result, Err(Error::RemoteError(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_fetch_invalid_document() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/jwks.json")
            .with_status(200)
            .with_body(r#"{"issuer": "https://issuer.example"}"#)
            .create_async()
            .await;

        let url = format!("{}/jwks.json", server.url());
        let result = fetch_key_set(&reqwest::Client::new(), &url, TIMEOUT).await;
        assert!(matches!(result, Err(Error::MalformedKeySet(_))));
    }

    #[tokio::test]
    async fn test_fetch_oversized_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/jwks.json")
            .with_status(200)
            .with_body(vec![b' '; MAX_JWKS_RESPONSE_SIZE + 1])
            .create_async()
            .await;

        let url = format!("{}/jwks.json", server.url());
        let result = fetch_key_set(&reqwest::Client::new(), &url, TIMEOUT).await;
        assert!(matches!(result, Err(Error::RemoteError(msg)) if msg.contains("too large")));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        // Reserve a free port, then close it again
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let url = format!("http://127.0.0.1:{port}/jwks.json");
        let result = fetch_key_set(&reqwest::Client::new(), &url, TIMEOUT).await;
        assert!(matches!(result, Err(Error::RemoteError(msg)) if msg.starts_with("network")));
    }
}
