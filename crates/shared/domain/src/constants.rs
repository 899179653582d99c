//! Domain-level constants.
//!
//! These constants define the validation rules for user records.

use validator::ValidationError;

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Maximum name length (matches the `users.name` column)
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum email length (matches the `users.email` column)
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Check if a name satisfies the length rules, ignoring surrounding whitespace
pub fn is_valid_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len)
}

/// `validator` adapter for [`is_valid_name`]
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("name_length"))
    }
}
