/*
 * Responsibility
 * - Load the YAML configuration file (validationKeys, claimsSource, claims, ...)
 * - Validate it (missing / invalid values fail startup)
 * - Resolve key material (inline PEM or environment variable)
 */
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::policy::ClaimSet;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validationKeys must contain exactly one key, found {0}")]
    KeyCount(usize),
    #[error("validation key must set exactly one of 'key' or 'keyFrom'")]
    KeyMaterial,
    #[error("keyFrom source unknown: {0}")]
    UnknownKeySource(String),
    #[error("environment variable {0} referenced by keyFrom is not set")]
    MissingEnv(String),
    #[error("invalid EC public key PEM: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("claims configuration is empty")]
    EmptyClaims,
    #[error("invalid response header name: {0}")]
    InvalidHeaderName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClaimsSource {
    #[serde(rename = "static")]
    Static,
    #[serde(rename = "queryString")]
    QueryString,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySource {
    pub source: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationKey {
    // Informational only.
    #[serde(rename = "type", default)]
    pub key_type: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub key_from: Option<KeySource>,
}

impl ValidationKey {
    /// PEM text, either inline or read from the environment.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        match (&self.key, &self.key_from) {
            (Some(pem), None) => Ok(pem.clone()),
            (None, Some(from)) => {
                if from.source != "env" {
                    return Err(ConfigError::UnknownKeySource(from.source.clone()));
                }
                std::env::var(&from.name)
                    .map_err(|_| ConfigError::MissingEnv(from.name.clone()))
            }
            _ => Err(ConfigError::KeyMaterial),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub validation_keys: Vec<ValidationKey>,
    pub claims_source: ClaimsSource,
    #[serde(default)]
    pub claims: Vec<ClaimSet>,
    #[serde(default)]
    pub cookie_names: Vec<String>,
    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.validation_keys.len() != 1 {
            return Err(ConfigError::KeyCount(self.validation_keys.len()));
        }
        if self.claims_source == ClaimsSource::Static && self.claims.is_empty() {
            return Err(ConfigError::EmptyClaims);
        }
        Ok(())
    }

    /// The single validation key (checked by `validate`).
    pub fn validation_key(&self) -> Result<&ValidationKey, ConfigError> {
        match self.validation_keys.as_slice() {
            [key] => Ok(key),
            keys => Err(ConfigError::KeyCount(keys.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PUBLIC_KEY_PEM, config_yaml};
    use std::io::Write;

    #[test]
    fn static_config_parses() {
        let config = Config::from_yaml(&config_yaml(
            "claimsSource: static\n\
             claims:\n  - group: [admin]\n    team: [a, b]\n  - role: [root]\n\
             cookieNames: [auth, token]\n\
             responseHeaders:\n  X-User: sub\n",
        ))
        .unwrap();

        assert_eq!(config.claims_source, ClaimsSource::Static);
        assert_eq!(config.claims.len(), 2);
        assert_eq!(config.claims[0].requirements().len(), 2);
        assert_eq!(config.cookie_names, vec!["auth", "token"]);
        assert_eq!(config.response_headers.get("X-User").map(String::as_str), Some("sub"));
        assert_eq!(config.validation_key().unwrap().key_type, "ecPublicKey");
        assert_eq!(config.validation_key().unwrap().resolve().unwrap().trim(), PUBLIC_KEY_PEM.trim());
    }

    #[test]
    fn query_string_config_needs_no_claims() {
        let config = Config::from_yaml(&config_yaml("claimsSource: queryString\n")).unwrap();
        assert_eq!(config.claims_source, ClaimsSource::QueryString);
        assert!(config.claims.is_empty());
        assert!(config.response_headers.is_empty());
    }

    #[test]
    fn unknown_claims_source_is_rejected() {
        let err = Config::from_yaml(&config_yaml("claimsSource: header\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Config::from_yaml(&config_yaml("cookieNames: [auth]\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn static_source_requires_claims() {
        let err = Config::from_yaml(&config_yaml("claimsSource: static\n")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyClaims));

        let err = Config::from_yaml(&config_yaml("claimsSource: static\nclaims: []\n")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyClaims));
    }

    #[test]
    fn exactly_one_validation_key_is_required() {
        let err = Config::from_yaml("validationKeys: []\nclaimsSource: queryString\n").unwrap_err();
        assert!(matches!(err, ConfigError::KeyCount(0)));

        let yaml = "validationKeys:\n  - key: a\n  - key: b\nclaimsSource: queryString\n";
        assert!(matches!(Config::from_yaml(yaml).unwrap_err(), ConfigError::KeyCount(2)));
    }

    #[test]
    fn key_from_env_is_resolved() {
        let var = "JWT_SUBREQUEST_AUTH_TEST_KEY_FROM_ENV";
        // Unique variable name; no other test touches it.
        unsafe {
            std::env::set_var(var, "line-one\\nline-two");
        }
        let key = ValidationKey {
            key_type: String::new(),
            key: None,
            key_from: Some(KeySource {
                source: "env".to_string(),
                name: var.to_string(),
            }),
        };
        // Value is used verbatim, escaped newlines included.
        assert_eq!(key.resolve().unwrap(), "line-one\\nline-two");
    }

    #[test]
    fn key_source_errors() {
        let from = |source: &str, name: &str| ValidationKey {
            key_type: String::new(),
            key: None,
            key_from: Some(KeySource {
                source: source.to_string(),
                name: name.to_string(),
            }),
        };

        assert!(matches!(
            from("file", "x").resolve(),
            Err(ConfigError::UnknownKeySource(s)) if s == "file"
        ));
        assert!(matches!(
            from("env", "JWT_SUBREQUEST_AUTH_TEST_UNSET_VAR").resolve(),
            Err(ConfigError::MissingEnv(_))
        ));

        let neither = ValidationKey {
            key_type: String::new(),
            key: None,
            key_from: None,
        };
        assert!(matches!(neither.resolve(), Err(ConfigError::KeyMaterial)));

        let both = ValidationKey {
            key: Some("pem".to_string()),
            ..from("env", "X")
        };
        assert!(matches!(both.resolve(), Err(ConfigError::KeyMaterial)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config_yaml("claimsSource: queryString\n").as_bytes())
            .unwrap();
        assert!(Config::load(file.path()).is_ok());

        let err = Config::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
