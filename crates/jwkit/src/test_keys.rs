//! Fixed key fixtures shared by the unit tests

use crate::keys::KeyMaterial;

pub(crate) const RSA_PRIVATE_PEM: &str = include_str!("../tests/fixtures/rsa2048.pem");
pub(crate) const RSA_PKCS1_PEM: &str = include_str!("../tests/fixtures/rsa2048.pkcs1.pem");
pub(crate) const RSA_PUBLIC_PEM: &str = include_str!("../tests/fixtures/rsa2048.pub.pem");
pub(crate) const P256_PRIVATE_PEM: &str = include_str!("../tests/fixtures/p256.pem");
pub(crate) const P256_PUBLIC_PEM: &str = include_str!("../tests/fixtures/p256.pub.pem");
pub(crate) const P384_PRIVATE_PEM: &str = include_str!("../tests/fixtures/p384.pem");
pub(crate) const P521_PRIVATE_PEM: &str = include_str!("../tests/fixtures/p521.pem");
pub(crate) const ED25519_PRIVATE_PEM: &str = include_str!("../tests/fixtures/ed25519.pem");

pub(crate) fn rsa_private() -> KeyMaterial {
    KeyMaterial::from_pem(RSA_PRIVATE_PEM).unwrap()
}

pub(crate) fn p256_private() -> KeyMaterial {
    KeyMaterial::from_pem(P256_PRIVATE_PEM).unwrap()
}

pub(crate) fn p384_private() -> KeyMaterial {
    KeyMaterial::from_pem(P384_PRIVATE_PEM).unwrap()
}

pub(crate) fn p521_private() -> KeyMaterial {
    KeyMaterial::from_pem(P521_PRIVATE_PEM).unwrap()
}

pub(crate) fn hmac_secret() -> KeyMaterial {
    KeyMaterial::symmetric(b"a-string-secret-at-least-256-bits-long".to_vec()).unwrap()
}
