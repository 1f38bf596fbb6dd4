pub mod answers;
pub mod auth;
pub mod categories;
pub mod questions;
pub mod users;
