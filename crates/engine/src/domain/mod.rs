pub mod error;
pub mod report;
pub mod trust_store;
pub mod types;
