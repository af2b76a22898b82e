//! Shared fixtures for unit and router tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;

pub const PUBLIC_KEY_PEM: &str = include_str!("../testdata/ec_public.pem");
const PRIVATE_KEY_PEM: &str = include_str!("../testdata/ec_private.pem");
const OTHER_PRIVATE_KEY_PEM: &str = include_str!("../testdata/other_private.pem");

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn sign_pem<T: Serialize>(claims: &T, pem: &str) -> String {
    let key = EncodingKey::from_ec_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::ES256), claims, &key).unwrap()
}

/// ES256 token signed with the key matching `PUBLIC_KEY_PEM`.
pub fn sign<T: Serialize>(claims: &T) -> String {
    sign_pem(claims, PRIVATE_KEY_PEM)
}

pub fn sign_with_other_key<T: Serialize>(claims: &T) -> String {
    sign_pem(claims, OTHER_PRIVATE_KEY_PEM)
}

/// Minimal config YAML with the test public key inlined.
pub fn config_yaml(body: &str) -> String {
    let key = PUBLIC_KEY_PEM
        .lines()
        .map(|l| format!("      {l}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("validationKeys:\n  - type: ecPublicKey\n    key: |\n{key}\n{body}")
}
