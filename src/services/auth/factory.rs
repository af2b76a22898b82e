/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use axum::http::HeaderName;

use crate::config::{ClaimsSource, Config, ConfigError};
use crate::services::auth::extractor::ExtractorChain;
use crate::services::auth::policy::{ClaimsPolicy, QueryStringPolicy, StaticPolicy};
use crate::services::auth::projector::HeaderProjector;
use crate::services::auth::verifier::TokenVerifier;
use crate::services::auth::AuthService;

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, ConfigError> {
    let key = config.validation_key()?;
    tracing::info!(key_type = %key.key_type, "loading validation key");
    let verifier = TokenVerifier::from_ec_pem(&key.resolve()?).map_err(ConfigError::InvalidKey)?;

    let policy: Box<dyn ClaimsPolicy> = match config.claims_source {
        ClaimsSource::Static => Box::new(StaticPolicy::new(config.claims.clone())),
        ClaimsSource::QueryString => Box::new(QueryStringPolicy),
    };

    let base = config
        .response_headers
        .iter()
        .map(|(header, claim)| {
            HeaderName::try_from(header.as_str())
                .map(|name| (name, claim.clone()))
                .map_err(|_| ConfigError::InvalidHeaderName(header.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Arc::new(AuthService::new(
        ExtractorChain::standard(config.cookie_names.clone()),
        verifier,
        policy,
        HeaderProjector::new(base),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::config_yaml;

    #[test]
    fn builds_from_valid_config() {
        let config = Config::from_yaml(&config_yaml(
            "claimsSource: static\nclaims:\n  - group: [admin]\nresponseHeaders:\n  X-User: sub\n",
        ))
        .unwrap();
        assert!(build_auth_service(&config).is_ok());
    }

    #[test]
    fn unparseable_pem_is_a_config_error() {
        let yaml = "validationKeys:\n  - type: ec\n    key: not-a-pem\nclaimsSource: queryString\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert!(matches!(
            build_auth_service(&config),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn invalid_response_header_is_a_config_error() {
        let config = Config::from_yaml(&config_yaml(
            "claimsSource: queryString\nresponseHeaders:\n  \"Bad Header\": sub\n",
        ))
        .unwrap();
        assert!(matches!(
            build_auth_service(&config),
            Err(ConfigError::InvalidHeaderName(h)) if h == "Bad Header"
        ));
    }
}
