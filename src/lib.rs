pub mod config;
pub mod error;
pub mod generator;
pub mod harness;
pub mod loader;
pub mod logger;
pub mod query;
pub mod results;
pub mod runner;

// Re-export commonly used types
pub use config::{ConfigLoader, HarnessConfig};
pub use error::{HarnessError, Result};
pub use generator::{CaseContext, CaseGenerator};
pub use harness::{Harness, Session, SessionGroup};
pub use loader::{LoadEntry, MemorySource, SpecLoader, SpecSource, Specification};
pub use query::{CaseId, CaseName, GroupId, Query, TestId};
pub use results::{ResultLog, SpecRecorder};
pub use runner::{CaseHandle, RunResult, RunSummary, Status};
