pub mod executor;
pub mod types;

pub use executor::CaseHandle;
pub use types::{RunResult, RunSummary, Status};
