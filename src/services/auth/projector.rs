/*
 * Responsibility
 * - Copy selected claims into response headers (base64) on an allowed request
 * - Base mapping comes from config and is never mutated; responses_* query
 *   parameters extend a per-request copy
 */
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use tracing::debug;

use crate::services::auth::claims::Claims;
use crate::services::auth::query::{QueryParams, RESPONSES_PREFIX};

#[derive(Debug, Clone, Default)]
pub struct HeaderProjector {
    // (response header, claim name)
    base: Vec<(HeaderName, String)>,
}

impl HeaderProjector {
    pub fn new(base: Vec<(HeaderName, String)>) -> Self {
        Self { base }
    }

    /// Base mapping merged with this request's `responses_<header>=<claim>`
    /// parameters. Only the first value of a repeated parameter is used;
    /// query entries replace base entries for the same header.
    pub fn mapping_for(&self, query: &QueryParams) -> Vec<(HeaderName, String)> {
        let mut merged = self.base.clone();
        let mut seen: Vec<&str> = Vec::new();

        for (header, claim) in query.with_prefix(RESPONSES_PREFIX) {
            if seen.contains(&header) {
                continue;
            }
            seen.push(header);

            let Ok(name) = HeaderName::try_from(header) else {
                debug!(header, "ignoring invalid response header name");
                continue;
            };
            match merged.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = claim.to_string(),
                None => merged.push((name, claim.to_string())),
            }
        }

        merged
    }

    /// Appends one header per mapped claim present in `claims`. Existing
    /// values for the same header are kept. Without a configured base
    /// mapping nothing is projected, whatever the query asks for.
    pub fn project(&self, claims: &Claims, query: &QueryParams, headers: &mut HeaderMap) {
        if self.base.is_empty() {
            return;
        }

        for (name, claim) in self.mapping_for(query) {
            let Some(value) = claims.get(&claim) else {
                continue;
            };
            let Some(encoded) = encode_claim(value) else {
                continue;
            };
            debug!(header = %name, claim = %claim, "add response header");
            headers.append(name, encoded);
        }
    }
}

// Strings as raw UTF-8, everything else as JSON; then standard base64.
fn encode_claim(value: &Value) -> Option<HeaderValue> {
    let bytes = match value {
        Value::String(s) => s.as_bytes().to_vec(),
        other => serde_json::to_vec(other).ok()?,
    };
    HeaderValue::from_str(&STANDARD.encode(bytes)).ok()
}
