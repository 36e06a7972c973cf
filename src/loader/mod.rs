#[allow(clippy::module_inception)]
pub mod loader;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use loader::SpecLoader;
pub use source::{MemorySource, SpecSource};
pub use types::{LoadEntry, Specification};
