//! # Collectors Module
//!
//! - **`Collector` trait**: the interface the plugin runtime drives
//! - **`VassalCollector`**: fetches a uWSGI vassal's stats document and reduces it to metrics
//! - **`Orchestrator`**: runs a collector as a mackerel-agent plugin (graph definitions, value lines,
//!   rates for cumulative series)

pub mod collector;
pub mod orchestrator;
pub mod vassal_collector;

// Re-export the main types for easy access
pub use collector::Collector;
pub use orchestrator::{
    Orchestrator,
    PLUGIN_META_HEADER,
};
pub use vassal_collector::VassalCollector;
