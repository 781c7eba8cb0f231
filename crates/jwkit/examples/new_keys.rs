//! Building JWKs from native key objects
//!
//! 1. Wrap raw bytes, an RSA key and a P-384 key as `KeyMaterial`
//! 2. Attach `kid`, `alg` and `use` metadata
//! 3. Marshal private keys and a public key set as JWK / JWKS JSON

use jwkit::*;

const KEY_ID: &str = "666000001";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwkit=debug".into()),
        )
        .init();

    println!("=== jwkit - New Keys ===\n");

    // Bytes -> symmetric key
    let symmetric = KeyMaterial::from_raw(b"Lorem Ipsum".as_slice())?;
    println!("Symmetric key: {:?} ({})", symmetric.kind(), symmetric.kind().kty());

    // rsa::RsaPrivateKey -> RSA private key
    let raw = rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048)
        .map_err(|e| Error::MalformedKey(e.to_string()))?;
    let raw_public = raw.to_public_key();

    let mut private = KeyMaterial::from_raw(raw)?;
    private.set_field("alg", "RS256")?;
    private.set_field("kid", KEY_ID)?;
    private.set_field("use", "sig")?;
    println!("\nPRIVATE KEY:\n{}", serde_json::to_string_pretty(&private).unwrap_or_default());

    // rsa::RsaPublicKey -> RSA public key, published in a key set
    let public = KeyMaterial::from_raw(raw_public)?
        .with_algorithm(Algorithm::RS256)
        .with_key_id(KEY_ID)?;
    assert_eq!(private.thumbprint(), public.thumbprint());

    let mut key_set = KeySet::new();
    key_set.add(public);
    println!("\nPUBLIC KEY SET:\n{}", key_set.to_json_pretty());

    // p384::SecretKey -> EC private key
    let ec = KeyMaterial::from_raw(p384::SecretKey::random(&mut rand::rngs::OsRng))?;
    println!(
        "\nEC key: {:?} on {}, thumbprint {}",
        ec.kind(),
        ec.curve().map_or("?", |c| c.name()),
        ec.thumbprint()
    );
    println!("{}", ec.public_key()?.public_key_pem()?);

    Ok(())
}
