//! TestCase entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// API, WEB, APP
    #[sea_orm(column_name = "type")]
    pub case_type: String,
    /// active, inactive, draft
    pub status: String,
    /// high, medium, low
    pub priority: String,
    /// JSON request description for API cases, script text for WEB/APP
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub environment: Option<String>,
    pub last_run: Option<DateTime>,
    /// success, failed, pending
    pub last_result: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::test_report::Entity")]
    Reports,
}

impl Related<super::test_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
