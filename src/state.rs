/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - auth: extraction / verification / policy / projection pipeline
 *   - metrics: request counter + validation-time histogram
 * - Cloned per request (Arc inside); nothing in it mutates after startup
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, metrics::Metrics};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, metrics: Arc<Metrics>) -> Self {
        Self { auth, metrics }
    }
}
