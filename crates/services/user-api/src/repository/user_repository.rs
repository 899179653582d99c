//! User repository implementation backed by SeaORM.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{CreateUser, UpdateUser, User, UserId};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Lookups return `Ok(None)` for missing records; mutations on a missing
/// record return `AppError::NotFound`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find users whose name contains the fragment
    async fn find_by_name_containing(&self, fragment: &str) -> AppResult<Vec<User>>;

    /// Create a new user; the store assigns the ID
    async fn create(&self, user: CreateUser) -> AppResult<User>;

    /// Replace the mutable fields of an existing user
    async fn update(&self, id: UserId, changes: UpdateUser) -> AppResult<User>;

    /// Permanently delete user
    async fn delete(&self, id: UserId) -> AppResult<()>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Number of stored users
    async fn count(&self) -> AppResult<u64>;
}

/// LIKE escape character; needs no quoting on any backend.
const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so `fragment` only matches itself.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// LIKE pattern matching `fragment` literally anywhere in the column.
fn contains_pattern(fragment: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(fragment))).escape(LIKE_ESCAPE)
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_name_containing(&self, fragment: &str) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(Expr::col(user::Column::Name).like(contains_pattern(fragment)))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: CreateUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(user.name),
            email: Set(user.email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update(&self, id: UserId, changes: UpdateUser) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let total = UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(total)
    }
}
