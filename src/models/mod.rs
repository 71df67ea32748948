pub mod listing;

// Re-exports for convenience
pub use listing::*;
