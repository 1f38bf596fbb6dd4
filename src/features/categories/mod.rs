//! Question categories (tags).
//!
//! Categories are created on demand by name and shared by every question
//! tagged with them. Names are unique and compared case-sensitively.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | List all categories |
//! | GET | `/api/categories/{id}` | Get category by id |
//! | POST | `/api/categories` | Get or create a category by name |
//! | GET | `/api/categories/{id}/questions` | List questions tagged with a category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{CategoryResolver, CategoryService};
