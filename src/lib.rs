pub mod config;
pub mod driver;
pub mod error;
pub mod report;
pub mod runner;
pub mod suite;

// Re-export common items
pub use config::SuiteConfig;
pub use error::HarnessError;
pub use report::generate_report;
pub use runner::{run_suite, RunOptions};
pub use suite::builtin_suite;
