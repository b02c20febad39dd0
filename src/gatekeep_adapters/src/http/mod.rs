pub mod activity;
pub mod bearer_auth;
pub mod routes;

pub use bearer_auth::{CurrentUser, bearer_auth};
