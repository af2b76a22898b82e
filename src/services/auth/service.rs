use axum::http::HeaderMap;
use thiserror::Error;

use crate::services::auth::claims::Claims;
use crate::services::auth::extractor::{ExtractorChain, TokenExtractor};
use crate::services::auth::policy::ClaimsPolicy;
use crate::services::auth::projector::HeaderProjector;
use crate::services::auth::query::QueryParams;
use crate::services::auth::verifier::{TokenVerifier, VerifyError};

// Why a request was denied. Always maps to 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no token in request")]
    MissingToken,
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("token claims rejected by policy")]
    PolicyRejected,
}

/// Shared, read-only decision pipeline:
/// extract token -> verify signature + temporal claims -> apply claims policy.
///
/// Built once at startup (see `factory::build_auth_service`) and shared by all
/// concurrent requests without locking.
#[derive(Debug)]
pub struct AuthService {
    extractor: ExtractorChain,
    verifier: TokenVerifier,
    policy: Box<dyn ClaimsPolicy>,
    projector: HeaderProjector,
}

impl AuthService {
    pub fn new(
        extractor: ExtractorChain,
        verifier: TokenVerifier,
        policy: Box<dyn ClaimsPolicy>,
        projector: HeaderProjector,
    ) -> Self {
        Self {
            extractor,
            verifier,
            policy,
            projector,
        }
    }

    pub fn authorize(&self, headers: &HeaderMap, query: &QueryParams) -> Result<Claims, AuthError> {
        let token = self.extractor.extract(headers).ok_or(AuthError::MissingToken)?;
        let claims = self.verifier.verify(&token)?;

        if !self.policy.authorize(&claims, query) {
            return Err(AuthError::PolicyRejected);
        }

        Ok(claims)
    }

    pub fn project_headers(&self, claims: &Claims, query: &QueryParams, headers: &mut HeaderMap) {
        self.projector.project(claims, query, headers);
    }
}
