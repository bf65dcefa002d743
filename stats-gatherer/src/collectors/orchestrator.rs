use crate::{
    collectors::Collector,
    metrics::*,
    state::DiffState,
};
use chrono::{
    DateTime,
    Utc,
};
use eyre::{
    Context as _,
    Result,
};
use serde::Serialize;
use std::path::PathBuf;

/// First line of the graph definition output that mackerel-agent looks for.
pub const PLUGIN_META_HEADER: &str = "# mackerel-agent-plugin";

/// Runs a [`Collector`] the way mackerel-agent expects a plugin to behave.
///
/// - [`Orchestrator::format_definitions`] prints the graph definitions.
/// - [`Orchestrator::collect`] prints one `<key>\t<value>\t<epoch>` line per series, turning
///   cumulative series into per-minute rates with the help of a [`DiffState`] file.
pub struct Orchestrator<C> {
    collector: C,
    state_path: PathBuf,
}

#[derive(Serialize)]
struct PluginMeta<'a> {
    graphs: &'a GraphDefinition,
}

impl<C: Collector> Orchestrator<C> {
    pub fn new(collector: C, state_path: impl Into<PathBuf>) -> Self {
        Self {
            collector,
            state_path: state_path.into(),
        }
    }

    /// Graph definitions keyed by `<prefix>.<graph>`.
    pub fn graphs(&self) -> GraphDefinition {
        let prefix = self.collector.metric_key_prefix();
        self.collector
            .graph_definition()
            .into_iter()
            .map(|(key, graph)| {
                let key = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                (key, graph)
            })
            .collect()
    }

    pub fn format_definitions(&self) -> Result<String> {
        let graphs = self.graphs();
        let json = serde_json::to_string(&PluginMeta { graphs: &graphs }).context("Failed to serialize graphs")?;
        Ok(format!("{PLUGIN_META_HEADER}\n{json}\n"))
    }

    /// Collect current values and format them.
    ///
    /// On a collection error nothing is formatted and the diff state is left untouched.
    pub async fn collect(&self, now: DateTime<Utc>) -> Result<String> {
        let values = self
            .collector
            .collect()
            .await
            .wrap_err_with(|| format!("Collecting {} metrics failed", self.collector.name()))?;

        let previous = match DiffState::load(&self.state_path).await {
            Ok(previous) => previous,
            Err(error) => {
                warn!(?error, "Ignoring unusable diff state");
                None
            }
        };

        let output = self.format_values(&values, previous.as_ref(), now);

        if let Err(error) = DiffState::new(values, now).save(&self.state_path).await {
            warn!(?error, "Could not persist diff state, rates will be skipped next run");
        }

        Ok(output)
    }

    pub fn format_values(&self, values: &MetricValues, previous: Option<&DiffState>, now: DateTime<Utc>) -> String {
        let mut output = String::new();
        let epoch = now.timestamp();

        for (key, graph) in self.graphs() {
            for metric in &graph.metrics {
                let Some(&raw) = values.get(&metric.name) else {
                    debug!(graph = %key, metric = %metric.name, "No value collected");
                    continue;
                };

                let value = if metric.diff {
                    match previous.and_then(|state| state.per_minute_rate(&metric.name, raw, now)) {
                        Some(rate) => rate,
                        None => continue,
                    }
                } else {
                    raw
                };

                output.push_str(&format!("{key}.{}\t{value:.6}\t{epoch}\n", metric.name));
            }
        }

        output
    }
}
