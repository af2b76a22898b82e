pub mod claims;
pub mod extractor;
pub mod factory;
pub mod policy;
pub mod projector;
pub mod query;
pub mod service;
pub mod verifier;

pub use factory::build_auth_service;
pub use query::QueryParams;
pub use service::{AuthError, AuthService};
