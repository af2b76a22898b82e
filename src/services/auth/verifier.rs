use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use std::collections::HashSet;

use crate::services::auth::claims::Claims;

/// Algorithms accepted by the verifier (elliptic-curve signatures only).
pub const EC_ALGORITHMS: [Algorithm; 2] = [Algorithm::ES256, Algorithm::ES384];

// Errors returned by token verification. None of them carry token text.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("unexpected signing method: {0:?}")]
    UnsupportedAlgorithm(Algorithm),
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token used before issued")]
    IssuedInFuture,
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            _ => Self::Malformed(e),
        }
    }
}

/// EC (ES256/ES384) token verifier bound to a single public key.
///
/// - Key material is intentionally not printable via Debug.
/// - `exp` / `nbf` are checked by `jsonwebtoken` when present, without leeway.
/// - `iat` in the future is rejected here.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl TokenVerifier {
    pub fn from_ec_pem(public_key_pem: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_ec_pem(public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::ES256);
        validation.algorithms = EC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify signature + temporal claims and decode the payload.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let header = jsonwebtoken::decode_header(token).map_err(VerifyError::Malformed)?;
        if !EC_ALGORITHMS.contains(&header.alg) {
            return Err(VerifyError::UnsupportedAlgorithm(header.alg));
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if let Some(iat) = claims.issued_at() {
            if iat > chrono::Utc::now().timestamp() as f64 {
                return Err(VerifyError::IssuedInFuture);
            }
        }

        Ok(claims)
    }
}
