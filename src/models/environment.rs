//! Environment models and DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::environment;

/// Environment view returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDto {
    pub id: i32,
    pub name: String,
    pub key_name: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    pub active: bool,
}

impl From<environment::Model> for EnvironmentDto {
    fn from(m: environment::Model) -> Self {
        EnvironmentDto {
            id: m.id,
            name: m.name,
            key_name: m.key_name,
            base_url: m.base_url,
            database_name: m.database_name,
            active: m.active,
        }
    }
}

/// Request body for creating or updating an environment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnvironmentRequest {
    /// Present on update, absent on create.
    pub id: Option<i32>,
    pub name: String,
    pub key_name: String,
    pub base_url: String,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
