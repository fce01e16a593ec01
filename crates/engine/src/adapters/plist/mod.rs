// Plist trust-store adapter - re-exports all public interfaces

mod constants;
mod engine;
mod extract;
mod tree;

pub use constants::*;
pub use engine::*;
pub use extract::*;
pub use tree::*;
