//! Business logic services: the test execution and reporting engine.

pub mod dashboard;
pub mod executor;
pub mod plan_runner;
pub mod probe;
pub mod runner;

pub use dashboard::DashboardAggregator;
pub use executor::{CaseExecutor, PlanRef};
pub use plan_runner::PlanRunner;
pub use probe::ApiProbe;
pub use runner::{CaseRunner, ExternalProcessRunner};
