use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "u_lisa"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Longest category name accepted from clients
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Validate a single category name.
///
/// Names are stored verbatim: no trimming and no case folding. Only empty or
/// whitespace-only names are rejected.
pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("category_name_blank")
            .with_message("Category name must not be blank".into()));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::new("category_name_too_long")
            .with_message("Category name must not exceed 100 characters".into()));
    }
    Ok(())
}

/// Validate every entry of a category-name list
pub fn validate_category_names(names: &[String]) -> Result<(), ValidationError> {
    names
        .iter()
        .try_for_each(|name| validate_category_name(name))
}
