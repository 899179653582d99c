//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use std::sync::Arc;

use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateUser, DomainError, UpdateUser, User, UserId};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: UserId) -> AppResult<User>;

    /// Get user by exact email address
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// List users whose name contains the fragment
    async fn search_users(&self, name: &str) -> AppResult<Vec<User>>;

    /// Create a new user
    async fn create_user(&self, user: CreateUser) -> AppResult<User>;

    /// Replace the mutable fields of a user
    async fn update_user(&self, id: UserId, changes: UpdateUser) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete_user(&self, id: UserId) -> AppResult<()>;

    /// Number of stored users
    async fn count_users(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn search_users(&self, name: &str) -> AppResult<Vec<User>> {
        self.repo.find_by_name_containing(name).await
    }

    async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate().map_err(DomainError::from)?;

        // Check if email already exists
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let created = self.repo.create(user).await?;
        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    async fn update_user(&self, id: UserId, changes: UpdateUser) -> AppResult<User> {
        changes.validate().map_err(DomainError::from)?;

        // The new email may not belong to another user
        if let Some(owner) = self.repo.find_by_email(&changes.email).await? {
            if owner.id != id {
                return Err(AppError::conflict("Email"));
            }
        }

        let updated = self.repo.update(id, changes).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}
