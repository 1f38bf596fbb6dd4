//! Answers to questions.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/answers` | List answers |
//! | GET | `/api/answers/{id}` | Get answer by id |
//! | GET | `/api/answers/{id}/question` | Get the answered question |
//! | GET | `/api/answers/{id}/user` | Get the author |
//! | POST | `/api/answers` | Answer a question as the caller |
//! | PUT | `/api/answers/{id}` | Replace an answer; the caller becomes its author |
//! | DELETE | `/api/answers/{id}` | Delete an answer |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AnswerService;
