//! Database queries for environments.

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::environment::{self, ActiveModel, Entity as Environment};
use crate::error::{AppError, AppResult};
use crate::models::SaveEnvironmentRequest;

impl super::DbPool {
    /// List all environments.
    pub async fn list_environments(&self) -> AppResult<Vec<environment::Model>> {
        let result = Environment::find()
            .order_by_asc(environment::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list environments: {}", e)))?;

        Ok(result)
    }

    /// Insert a new environment.
    pub async fn insert_environment(
        &self,
        req: SaveEnvironmentRequest,
    ) -> AppResult<environment::Model> {
        let model = ActiveModel {
            name: Set(req.name),
            key_name: Set(req.key_name),
            base_url: Set(req.base_url),
            database_name: Set(req.database_name),
            active: Set(req.active),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert environment: {}", e)))?;

        Ok(result)
    }

    /// Update an existing environment.
    pub async fn update_environment(
        &self,
        req: SaveEnvironmentRequest,
    ) -> AppResult<environment::Model> {
        let id = req
            .id
            .ok_or_else(|| AppError::InvalidInput("environment id is required".to_string()))?;

        let existing = Environment::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get environment: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Environment {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(req.name);
        active.key_name = Set(req.key_name);
        active.base_url = Set(req.base_url);
        active.database_name = Set(req.database_name);
        active.active = Set(req.active);

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update environment: {}", e)))?;

        Ok(result)
    }

    /// Delete an environment by id.
    pub async fn delete_environment(&self, id: i32) -> AppResult<bool> {
        let result = Environment::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete environment: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
