//! Token extraction from an incoming request.
//!
//! Extractors are tried in order; the first one that yields a non-empty token
//! wins. The default chain is configured cookies first, then
//! `Authorization: Bearer <token>`.

use std::fmt;

use axum::http::{HeaderMap, header};

pub trait TokenExtractor: Send + Sync + fmt::Debug {
    /// Raw token text, or `None` when this source does not carry one.
    fn extract(&self, headers: &HeaderMap) -> Option<String>;
}

/// Returns the value of the first request cookie whose name is configured.
///
/// Precedence follows the request's cookie order, not the configured order.
#[derive(Debug, Clone, Default)]
pub struct CookieExtractor {
    names: Vec<String>,
}

impl CookieExtractor {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl TokenExtractor for CookieExtractor {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        if self.names.is_empty() {
            return None;
        }

        request_cookies(headers)
            .find(|(name, _)| self.names.iter().any(|n| n.as_str() == *name))
            .map(|(_, value)| value.to_string())
    }
}

/// `Authorization: Bearer <token>`; the scheme is case-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerExtractor;

impl TokenExtractor for BearerExtractor {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    }
}

#[derive(Debug, Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn TokenExtractor>>,
}

impl ExtractorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Cookies named in `cookie_names`, then the bearer header.
    pub fn standard(cookie_names: Vec<String>) -> Self {
        Self::new()
            .with(CookieExtractor::new(cookie_names))
            .with(BearerExtractor)
    }
}

impl TokenExtractor for ExtractorChain {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        self.extractors
            .iter()
            .filter_map(|e| e.extract(headers))
            .find(|token| !token.is_empty())
    }
}

// Cookie pairs across every `Cookie` header, in request order.
fn request_cookies(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name, value))
        })
}
