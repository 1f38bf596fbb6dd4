mod user_service;

pub use user_service::{search_term, UserService};
