use crate::{
    collectors::Collector,
    config::Config,
    error::CollectError,
    metrics::*,
    transport::Transport,
};
use eyre::Result;
use std::{
    future::Future,
    pin::Pin,
};

/// Collects listen queue, worker states and request counts from one uWSGI vassal
pub struct VassalCollector {
    transport: Transport,
    metric_key_prefix: String,
}

impl VassalCollector {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        Ok(Self {
            transport: Transport::new(config.target.clone(), config.timeout)?,
            metric_key_prefix: config.metric_key_prefix.clone(),
        })
    }

    /// Fetch and decode the stats document, then reduce it to a snapshot.
    ///
    /// There is no partial result: any transport or decode failure is returned as is.
    pub async fn fetch_snapshot(&self) -> Result<MetricSnapshot, CollectError> {
        let body = self.transport.fetch().await?;
        let status = StatusDocument::from_slice(&body.bytes).map_err(|source| CollectError::Decode {
            origin: body.origin,
            source,
        })?;

        let snapshot = MetricSnapshot::from_status(&status);
        debug!(
            socket = %self.transport.target(),
            workers = status.workers.len(),
            ?snapshot,
            "Collected vassal stats"
        );
        Ok(snapshot)
    }
}

impl Collector for VassalCollector {
    fn collect(&self) -> Pin<Box<dyn Future<Output = Result<MetricValues>> + Send + '_>> {
        Box::pin(async move { Ok(self.fetch_snapshot().await?.to_values()) })
    }

    fn graph_definition(&self) -> GraphDefinition {
        vassal_graphs(&self.metric_key_prefix)
    }

    fn metric_key_prefix(&self) -> &str {
        &self.metric_key_prefix
    }

    fn name(&self) -> &'static str {
        "uWSGI vassal"
    }
}
