//! Decoded view of a request's query string.
//!
//! Policies read `claims_*` parameters and the header projector reads
//! `responses_*` parameters; both go through this type so the query is
//! decoded once per request.

use url::form_urlencoded;

pub const CLAIMS_PREFIX: &str = "claims_";
pub const RESPONSES_PREFIX: &str = "responses_";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parameters whose key starts with `prefix`, in request order, with the
    /// prefix stripped from the key.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.pairs.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix).map(|name| (name, v.as_str()))
        })
    }
}
