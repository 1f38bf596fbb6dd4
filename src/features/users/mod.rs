//! User records.
//!
//! Credentials and token issuance live with the identity provider; this
//! feature only keeps the public profile each token's `sub` points at.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | List users |
//! | GET | `/api/users/search?term=` | Exact match on name or username |
//! | GET | `/api/users/{id}` | Get user by id |
//! | POST | `/api/users` | Create user (authenticated) |
//! | PUT | `/api/users/{id}` | Update user (authenticated) |
//! | DELETE | `/api/users/{id}` | Delete user (authenticated) |
//! | GET | `/api/users/{id}/questions` | Questions owned by the user |
//! | GET | `/api/users/{id}/answers` | Answers written by the user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
