pub mod cleaner;
pub mod cli;
pub mod config;
pub mod scanner;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use cleaner::Cleaner;
pub use config::Config;
pub use scanner::{ScanReport, Scanner, Target, TargetKind};
pub use stats::Statistics;
