//! Questions and their categories.
//!
//! Besides question CRUD this feature owns the tagging core: attaching and
//! detaching categories, and reconciling a question's categories to a set
//! of names.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/questions` | List all questions |
//! | GET | `/api/questions/sorted` | List questions ordered by text |
//! | GET | `/api/questions/first` | Get the first question |
//! | GET | `/api/questions/{id}` | Get question by id |
//! | POST | `/api/questions` | Create a question, optionally with categories |
//! | PUT | `/api/questions/{id}` | Update a question, optionally reconciling categories |
//! | DELETE | `/api/questions/{id}` | Delete a question |
//! | GET | `/api/questions/{id}/user` | Get the owner |
//! | GET | `/api/questions/{id}/answers` | List answers |
//! | GET | `/api/questions/{id}/categories` | List categories |
//! | PUT | `/api/questions/{id}/categories` | Replace categories by name |
//! | POST | `/api/questions/{id}/categories/{category_id}` | Attach a category |
//! | DELETE | `/api/questions/{id}/categories/{category_id}` | Detach a category |
//!
//! Write endpoints require authentication when `QUESTIONS_REQUIRE_OWNER` is set.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AssociationManager, QuestionService, QuestionTagService, TagReconciler};
