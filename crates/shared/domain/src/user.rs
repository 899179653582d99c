//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::validate_name;

/// Store-assigned user identifier
pub type UserId = i64;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier (assigned by the store)
    #[cfg_attr(feature = "openapi", schema(value_type = i64, example = 1))]
    pub id: UserId,
    /// User display name
    #[cfg_attr(feature = "openapi", schema(example = "Alice"))]
    pub name: String,
    /// User email address
    #[cfg_attr(feature = "openapi", schema(example = "alice@x.com"))]
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with fresh timestamps
    pub fn new(id: UserId, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User creation data transfer object.
///
/// Decoded straight from request bodies; any client-supplied `id` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateUser {
    /// User display name
    #[validate(custom(
        function = "validate_name",
        message = "Name must be between 1 and 100 characters"
    ))]
    #[cfg_attr(feature = "openapi", schema(example = "Alice"))]
    pub name: String,
    /// User email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "alice@x.com"))]
    pub email: String,
}

/// User update data transfer object.
///
/// Every mutable field is replaced; the identifier never changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateUser {
    /// New display name
    #[validate(custom(
        function = "validate_name",
        message = "Name must be between 1 and 100 characters"
    ))]
    #[cfg_attr(feature = "openapi", schema(example = "Alicia"))]
    pub name: String,
    /// New email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "alicia@x.com"))]
    pub email: String,
}
