pub mod config;
pub mod engine;
pub mod errors;
pub mod partition;
pub mod results;
pub mod scanner;
pub mod sink;
pub mod walker;

pub use config::ScanConfig;
pub use engine::scan;
pub use errors::{ScanError, ScanResult};
pub use results::{MatchRecord, ScanSummary, WorkerReport};
pub use sink::{ConsoleSink, MemorySink, ReportSink};
