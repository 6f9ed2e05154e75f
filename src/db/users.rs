//! Database queries for users.

use chrono::Local;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};

impl super::DbPool {
    /// Look up a user by exact credential match.
    ///
    /// Plaintext comparison by design of the upstream auth collaborator.
    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<user::Model>> {
        let result = User::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Password.eq(password))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up user: {}", e)))?;

        Ok(result)
    }

    /// Check whether a username is already taken.
    pub async fn find_user_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        let result = User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up user: {}", e)))?;

        Ok(result)
    }

    /// Insert a new user.
    pub async fn insert_user(
        &self,
        username: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<user::Model> {
        let model = ActiveModel {
            username: Set(username),
            password: Set(password),
            role: Set(role.unwrap_or_else(|| "user".to_string())),
            created_at: Set(Local::now().naive_local()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;

        Ok(result)
    }
}
