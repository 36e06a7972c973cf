pub mod cases;
pub mod context;

pub use cases::{CaseBody, CaseDef, CaseFuture, CaseGenerator};
pub use context::CaseContext;
