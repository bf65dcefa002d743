pub mod graph;
pub mod shared;
pub mod snapshot;
pub mod status;

// Re-export the main types for easy access
pub use graph::*;
pub use shared::*;
pub use snapshot::*;
pub use status::*;
