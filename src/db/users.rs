//! Database operations for users.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a new user. The caller checks email uniqueness first.
    pub async fn insert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> AppResult<user::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_lowercase()),
            name: Set(name.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find user: {}", e)))
    }

    /// Find a user by ID.
    pub async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))
    }

    /// Fetch several users at once.
    pub async fn find_users_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get users: {}", e)))
    }

    /// List all users ordered by name.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        User::find()
            .order_by_asc(user::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))
    }
}
