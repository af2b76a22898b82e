/*
 * Responsibility
 * - Claims policy engine: decide(claims, request) -> allow/deny
 * - Static policy (claim sets from config) and query-string policy (claims_* params)
 * - Rejections are logged at debug level; a policy never errors
 */
use std::collections::BTreeSet;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use tracing::debug;

use crate::services::auth::claims::Claims;
use crate::services::auth::query::{CLAIMS_PREFIX, QueryParams};

pub trait ClaimsPolicy: Send + Sync + fmt::Debug {
    fn authorize(&self, claims: &Claims, query: &QueryParams) -> bool;
}

/// One claim name and the string values it may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequirement {
    pub claim: String,
    pub accepted: BTreeSet<String>,
}

impl ClaimRequirement {
    pub fn new<I, S>(claim: impl Into<String>, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claim: claim.into(),
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_satisfied_by(&self, claims: &Claims) -> bool {
        let ok = claims.matches(&self.claim, &self.accepted);
        if !ok {
            debug!(
                claim = %self.claim,
                accepted = ?self.accepted,
                actual = ?claims.get(&self.claim),
                "rejecting claim"
            );
        }
        ok
    }
}

/// Conjunction of requirements, checked in order and short-circuited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet(Vec<ClaimRequirement>);

impl ClaimSet {
    pub fn new(requirements: Vec<ClaimRequirement>) -> Self {
        Self(requirements)
    }

    pub fn requirements(&self) -> &[ClaimRequirement] {
        &self.0
    }

    pub fn is_satisfied_by(&self, claims: &Claims) -> bool {
        self.0.iter().all(|r| r.is_satisfied_by(claims))
    }
}

// YAML mapping `claim: [values...]`, keeping the file's key order.
impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClaimSetVisitor;

        impl<'de> Visitor<'de> for ClaimSetVisitor {
            type Value = ClaimSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from claim name to a list of accepted values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ClaimSet, A::Error> {
                let mut requirements = Vec::new();
                while let Some((claim, accepted)) = map.next_entry::<String, Vec<String>>()? {
                    requirements.push(ClaimRequirement::new(claim, accepted));
                }
                Ok(ClaimSet(requirements))
            }
        }

        deserializer.deserialize_map(ClaimSetVisitor)
    }
}

/// Allows when ANY configured claim set is fully satisfied.
#[derive(Debug, Clone)]
pub struct StaticPolicy {
    claim_sets: Vec<ClaimSet>,
}

impl StaticPolicy {
    pub fn new(claim_sets: Vec<ClaimSet>) -> Self {
        Self { claim_sets }
    }
}

impl ClaimsPolicy for StaticPolicy {
    fn authorize(&self, claims: &Claims, _query: &QueryParams) -> bool {
        let ok = self.claim_sets.iter().any(|set| set.is_satisfied_by(claims));
        if !ok {
            debug!(
                required = ?self.claim_sets,
                "token claims did not match any configured claim set"
            );
        }
        ok
    }
}

/// Requirements come from `claims_<name>=<value>` query parameters; all must
/// hold, and at least one must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringPolicy;

impl QueryStringPolicy {
    // Group repeated parameters into one requirement per claim, first-seen order.
    fn requirements(query: &QueryParams) -> ClaimSet {
        let mut requirements: Vec<ClaimRequirement> = Vec::new();
        for (claim, value) in query.with_prefix(CLAIMS_PREFIX) {
            match requirements.iter_mut().find(|r| r.claim == claim) {
                Some(existing) => {
                    existing.accepted.insert(value.to_string());
                }
                None => requirements.push(ClaimRequirement::new(claim, [value])),
            }
        }
        ClaimSet::new(requirements)
    }
}

impl ClaimsPolicy for QueryStringPolicy {
    fn authorize(&self, claims: &Claims, query: &QueryParams) -> bool {
        let required = Self::requirements(query);
        if query.is_empty() || required.requirements().is_empty() {
            debug!("no claims requirements sent, rejecting");
            return false;
        }

        debug!(required = ?required, "validating claims from query string");
        required.is_satisfied_by(claims)
    }
}
