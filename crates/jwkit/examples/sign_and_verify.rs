//! Signing a token with a private key and verifying it with the public set
//!
//! 1. Load the private key (PEM) and give it a key ID
//! 2. Build claims and sign an RS256 token
//! 3. Publish the public half as a JWKS document
//! 4. Parse and verify the token against the published set; the `kid`
//!    header selects the key

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jwkit::*;
use serde_json::json;

const KEY_ID: &str = "666000001";
const PRIVATE_KEY_PEM: &str = include_str!("../tests/fixtures/rsa2048.pem");

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwkit=debug".into()),
        )
        .init();

    println!("=== jwkit - Sign and Verify ===\n");

    let private = KeyMaterial::from_pem(PRIVATE_KEY_PEM)?
        .with_key_id(KEY_ID)?
        .with_key_use(KeyUse::Signature);

    // Build a JWT
    let claims = TokenClaims::builder()
        .issuer("github.com/lestrrat-go/jwx")
        .issued_now()
        .claim("data", json!({ "use": "asuuu" }))
        .build()?;

    // Sign it
    let signed = token::sign(&claims, Algorithm::RS256, &private)?;
    println!("SIGNED TOKEN:\n{signed}\n");

    // Publish the public key
    let mut published = KeySet::new();
    published.add(private.public_key()?);
    let document = published.to_json_pretty();
    println!("PUBLIC KEY SET:\n{document}\n");

    // Verify as a consumer would, from the published document
    let key_set = KeySet::from_json(&document)?;
    let header = decode_header(&signed)?;
    println!("Header: alg={} kid={:?}", header.algorithm, header.key_id);

    let verified = parse_and_verify_now(&signed, &key_set)?;
    println!(
        "VERIFIED CLAIMS:\n{}",
        serde_json::to_string_pretty(&verified).unwrap_or_default()
    );

    // A forged payload under the issued signature is rejected
    let forged = URL_SAFE_NO_PAD.encode(r#"{"iss":"github.com/lestrrat-go/jwx","admin":true}"#);
    let segments: Vec<&str> = signed.split('.').collect();
    let tampered = format!("{}.{forged}.{}", segments[0], segments[2]);
    match parse_and_verify_now(&tampered, &key_set) {
        Err(Error::InvalidSignature) => println!("\nTampered token rejected"),
        other => println!("\nUnexpected result for tampered token: {other:?}"),
    }

    Ok(())
}
