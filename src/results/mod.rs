mod export;
pub mod log;
pub mod recorder;

pub use log::ResultLog;
pub use recorder::SpecRecorder;
