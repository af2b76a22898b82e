/*
 * Responsibility
 * - Public HTTP surface: routes() and handlers
 */
pub mod handlers;
mod routes;

pub use routes::routes;
