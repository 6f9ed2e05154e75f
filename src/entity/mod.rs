//! SeaORM entities for the platform tables.

pub mod environment;
pub mod test_case;
pub mod test_plan;
pub mod test_report;
pub mod user;
