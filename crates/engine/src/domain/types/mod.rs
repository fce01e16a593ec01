// Re-export all types so callers can use `domain::types::*` directly.

pub use serial::*;
pub use name::*;
pub use trust::*;
pub use config::*;

mod serial;
mod name;
mod trust;
mod config;
