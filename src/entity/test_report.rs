//! TestReport entity for SeaORM.
//!
//! One row per case execution attempt; immutable after creation except for
//! deletion.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Set together with plan_run_no when the execution belongs to a plan run
    pub plan_id: Option<i32>,
    /// Per-plan monotonically increasing batch number
    pub plan_run_no: Option<i32>,
    pub case_id: i32,
    /// success, failed
    pub status: String,
    pub execution_time: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub logs: Option<String>,
    pub executed_at: DateTime,
    pub executed_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_case::Entity",
        from = "Column::CaseId",
        to = "super::test_case::Column::Id"
    )]
    Case,
    #[sea_orm(
        belongs_to = "super::test_plan::Entity",
        from = "Column::PlanId",
        to = "super::test_plan::Column::Id"
    )]
    Plan,
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl Related<super::test_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
