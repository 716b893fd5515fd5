pub mod config;
pub mod export;
pub mod extract;
pub mod fields;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use utils::error::HarvestError;

pub type Result<T> = std::result::Result<T, HarvestError>;
