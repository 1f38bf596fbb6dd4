//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the record store that backs question/category tagging.

pub mod store;
