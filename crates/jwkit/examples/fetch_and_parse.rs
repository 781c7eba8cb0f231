//! Fetching a remote key set and verifying a token with it
//!
//! Usage: `cargo run --example fetch_and_parse -- [JWKS_URL] [TOKEN]`
//!
//! 1. Fetch the JWKS document
//! 2. Convert every key to its native form and back, collecting a new set
//! 3. Marshal the new set as JSON
//! 4. Verify the token (if given) against the set

use jwkit::remote::fetch_key_set;
use jwkit::*;
use std::time::Duration;

const DEFAULT_JWKS_URL: &str = "https://raw.githubusercontent.com/yanuar-nc/yanuar-nc/main/jwk.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwkit=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| DEFAULT_JWKS_URL.to_string());
    let token = args.next();

    println!("=== jwkit - Fetch and Parse ===\n");
    println!("Fetching {url}");

    let client = reqwest::Client::new();
    let fetched = fetch_key_set(&client, &url, Duration::from_secs(10)).await?;
    println!("{}\n", fetched.to_json());

    let mut key_set = KeySet::new();
    for key in &fetched {
        println!("kid: {}", key.key_id().unwrap_or("-"));

        // Native form and back; metadata is carried over explicitly
        let mut rebuilt = KeyMaterial::from_raw(key.to_raw()?)?;
        for name in ["kid", "alg", "use"] {
            if let Some(value) = key.field(name)? {
                rebuilt.set_field(name, &value)?;
            }
        }

        // Each key also survives its own JSON form
        let reparsed = KeyMaterial::from_json(&rebuilt.to_json())?;
        debug_assert_eq!(reparsed, rebuilt);

        key_set.add(rebuilt);
    }
    println!("\nKEY SET:\n{}\n", key_set.to_json_pretty());

    let Some(token) = token else {
        println!("No token given, done");
        return Ok(());
    };

    match parse_and_verify_now(&token, &key_set) {
        Ok(claims) => println!(
            "VERIFIED CLAIMS:\n{}",
            serde_json::to_string_pretty(&claims).unwrap_or_default()
        ),
        Err(e) => println!("failed to parse token: {e}"),
    }

    Ok(())
}
