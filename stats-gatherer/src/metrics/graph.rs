//! Graph definitions reported to mackerel-agent.

use crate::metrics::Unit;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

pub const DEFAULT_METRIC_KEY_PREFIX: &str = "uWSGI";

/// Graph key to graph. Keys are relative to the collector's metric key prefix.
pub type GraphDefinition = BTreeMap<String, Graph>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<GraphMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetric {
    pub name: String,
    pub label: String,
    /// Report the per-minute rate between two runs instead of the raw value.
    #[serde(skip)]
    pub diff: bool,
    pub stacked: bool,
}

impl GraphMetric {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            diff: false,
            stacked: false,
        }
    }

    pub fn diff(mut self) -> Self {
        self.diff = true;
        self
    }

    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }
}

/// The `queue`, `workers` and `req` graphs of a vassal. Labels are prefixed with the title-cased
/// `prefix`.
pub fn vassal_graphs(prefix: &str) -> GraphDefinition {
    let label_prefix = title_case(prefix);

    BTreeMap::from([
        (
            "queue".to_string(),
            Graph {
                label: format!("{label_prefix} Queue"),
                unit: Unit::Integer,
                metrics: vec![GraphMetric::new("queue", "Requests")],
            },
        ),
        (
            "workers".to_string(),
            Graph {
                label: format!("{label_prefix} Workers"),
                unit: Unit::Integer,
                metrics: vec![
                    GraphMetric::new("busy", "Busy").stacked(),
                    GraphMetric::new("idle", "Idle").stacked(),
                    GraphMetric::new("cheap", "Cheap").stacked(),
                    GraphMetric::new("pause", "Pause").stacked(),
                ],
            },
        ),
        (
            "req".to_string(),
            Graph {
                label: format!("{label_prefix} Requests"),
                unit: Unit::Float,
                metrics: vec![GraphMetric::new("requests", "Requests").diff()],
            },
        ),
    ])
}

/// Upper-case the first letter of every word, leaving the rest untouched.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_casing() {
        assert_eq!(title_case("uWSGI"), "UWSGI");
        assert_eq!(title_case("my app"), "My App");
        assert_eq!(title_case("vassal-api.v2"), "Vassal-Api.V2");
        assert_eq!(title_case("my_app"), "My_app");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn default_prefix_graphs() {
        let graphs = vassal_graphs(DEFAULT_METRIC_KEY_PREFIX);
        let keys: Vec<_> = graphs.keys().cloned().collect();
        assert_eq!(keys, ["queue", "req", "workers"]);

        let queue = &graphs["queue"];
        assert_eq!(queue.label, "UWSGI Queue");
        assert_eq!(queue.unit, Unit::Integer);
        assert_eq!(queue.metrics, vec![GraphMetric::new("queue", "Requests")]);

        let workers = &graphs["workers"];
        assert_eq!(workers.label, "UWSGI Workers");
        let names: Vec<_> = workers.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["busy", "idle", "cheap", "pause"]);
        assert!(workers.metrics.iter().all(|m| m.stacked && !m.diff));

        let req = &graphs["req"];
        assert_eq!(req.label, "UWSGI Requests");
        assert_eq!(req.unit, Unit::Float);
        assert_eq!(req.metrics, vec![GraphMetric::new("requests", "Requests").diff()]);
    }

    #[test]
    fn custom_prefix_is_applied_to_labels() {
        let graphs = vassal_graphs("billing");
        assert_eq!(graphs["workers"].label, "Billing Workers");
    }

    #[test]
    fn serialized_metrics_omit_diff() {
        let json = serde_json::to_value(GraphMetric::new("requests", "Requests").diff()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "requests", "label": "Requests", "stacked": false})
        );
    }
}
