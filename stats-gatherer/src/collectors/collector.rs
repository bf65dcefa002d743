use crate::metrics::{
    GraphDefinition,
    MetricValues,
};
use eyre::Result;
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for plugins the [`Orchestrator`](crate::Orchestrator) can run
pub trait Collector {
    /// Fetch the current raw values, keyed by metric name
    fn collect(&self) -> Pin<Box<dyn Future<Output = Result<MetricValues>> + Send + '_>>;

    /// Graphs the values belong to, keyed by the full graph key
    fn graph_definition(&self) -> GraphDefinition;

    /// Namespace shared by every graph key of this collector
    fn metric_key_prefix(&self) -> &str;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
