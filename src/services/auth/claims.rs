/*
 * Responsibility
 * - Decoded token payload (claim name -> JSON value)
 * - Single-claim matching rule shared by every policy
 */
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded claims of a verified token.
///
/// Values keep their JSON shape (string, number, boolean, array, object, null);
/// `serde_json::Value` is the sum type carried through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// `iat` as seconds since epoch, when present and numeric.
    pub fn issued_at(&self) -> Option<f64> {
        self.get("iat").and_then(Value::as_f64)
    }

    /// A claim matches when it is a string in `accepted`, or an array with at
    /// least one string element in `accepted`. Any other shape never matches.
    pub fn matches(&self, name: &str, accepted: &BTreeSet<String>) -> bool {
        match self.get(name) {
            Some(Value::String(s)) => accepted.contains(s),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|s| accepted.contains(s)),
            _ => false,
        }
    }
}
