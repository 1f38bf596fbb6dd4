//! Bearer token authentication.
//!
//! Tokens are issued by the identity provider and signed with a shared HS256
//! secret. The `sub` claim carries the user's UUID.

mod validator;

pub mod model;

pub use validator::JwtValidator;
