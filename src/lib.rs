pub mod catalog;
pub mod cli;
pub mod collector;
pub mod config;
pub mod license;
pub mod notices;
pub mod output;

// Re-export main types for easy access
pub use catalog::{normalize_name, Distribution};
pub use license::{CollectionReport, CollectionSummary, LicenseCopy};
