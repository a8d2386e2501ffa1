//! Release execution and orchestration across sub-projects

pub mod executor;
pub mod orchestrator;

pub use executor::{release_summary, ReleaseExecutor};
pub use orchestrator::{ProjectOutcome, ProjectReport, Releaser, RunReport};
