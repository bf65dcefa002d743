use crate::metrics::{
    StatusDocument,
    WorkerState,
};
use std::collections::BTreeMap;

/// Metric name to value, as handed to the plugin runtime.
pub type MetricValues = BTreeMap<String, f64>;

/// One collection of vassal metrics.
///
/// All six series are always present, zero when nothing was measured for them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSnapshot {
    pub queue: f64,
    pub busy: f64,
    pub idle: f64,
    pub cheap: f64,
    pub pause: f64,
    pub requests: f64,
}

impl MetricSnapshot {
    pub const NAMES: [&'static str; 6] = ["queue", "busy", "idle", "cheap", "pause", "requests"];

    /// Reduce a stats document to the reported series.
    pub fn from_status(status: &StatusDocument) -> Self {
        let mut snapshot = Self {
            queue: status.listen_queue as f64,
            ..Self::default()
        };

        for worker in &status.workers {
            if let Some(state) = worker.state() {
                *snapshot.worker_count_mut(state) += 1.0;
            }
            snapshot.requests += worker.requests as f64;
        }

        snapshot
    }

    pub fn worker_count(&self, state: WorkerState) -> f64 {
        match state {
            WorkerState::Busy => self.busy,
            WorkerState::Idle => self.idle,
            WorkerState::Cheap => self.cheap,
            WorkerState::Pause => self.pause,
        }
    }

    fn worker_count_mut(&mut self, state: WorkerState) -> &mut f64 {
        match state {
            WorkerState::Busy => &mut self.busy,
            WorkerState::Idle => &mut self.idle,
            WorkerState::Cheap => &mut self.cheap,
            WorkerState::Pause => &mut self.pause,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "queue" => Some(self.queue),
            "requests" => Some(self.requests),
            other => other.parse().ok().map(|state| self.worker_count(state)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::NAMES.into_iter().filter_map(|name| self.get(name).map(|value| (name, value)))
    }

    pub fn to_values(&self) -> MetricValues {
        self.iter().map(|(name, value)| (name.to_string(), value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::WorkerRecord;
    use strum::IntoEnumIterator;

    fn status(listen_queue: u64, workers: &[(u64, &str)]) -> StatusDocument {
        StatusDocument {
            listen_queue,
            workers: workers
                .iter()
                .map(|(requests, status)| WorkerRecord::new(*requests, *status))
                .collect(),
        }
    }

    #[test]
    fn mixed_workers() {
        let doc = StatusDocument::from_slice(
            br#"{"listen_queue":2,"workers":[{"requests":10,"status":"idle"},{"requests":5,"status":"busy"},{"requests":0,"status":"unknown"}]}"#,
        )
        .unwrap();

        assert_eq!(
            MetricSnapshot::from_status(&doc),
            MetricSnapshot {
                queue: 2.0,
                busy: 1.0,
                idle: 1.0,
                cheap: 0.0,
                pause: 0.0,
                requests: 15.0,
            }
        );
    }

    #[test]
    fn empty_worker_list() {
        let doc = StatusDocument::from_slice(br#"{"listen_queue":0,"workers":[]}"#).unwrap();
        assert_eq!(MetricSnapshot::from_status(&doc), MetricSnapshot::default());

        let snapshot = MetricSnapshot::from_status(&status(17, &[]));
        assert_eq!(snapshot.queue, 17.0);
        assert_eq!(
            (snapshot.busy, snapshot.idle, snapshot.cheap, snapshot.pause, snapshot.requests),
            (0.0, 0.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn unrecognized_statuses_only_count_requests() {
        let doc = status(0, &[(3, "sig"), (4, ""), (5, "cheap"), (6, "pause"), (7, "busy")]);
        let snapshot = MetricSnapshot::from_status(&doc);

        let counted: f64 = WorkerState::iter().map(|state| snapshot.worker_count(state)).sum();
        assert_eq!(counted, 3.0);
        assert!(counted <= doc.workers.len() as f64);
        assert_eq!(snapshot.requests, 25.0);
    }

    #[test]
    fn all_recognized_statuses_account_for_every_worker() {
        let doc = status(0, &[(1, "busy"), (1, "idle"), (1, "idle"), (1, "cheap"), (1, "pause")]);
        let snapshot = MetricSnapshot::from_status(&doc);

        let counted: f64 = WorkerState::iter().map(|state| snapshot.worker_count(state)).sum();
        assert_eq!(counted, doc.workers.len() as f64);
        assert_eq!((snapshot.idle, snapshot.busy), (2.0, 1.0));
    }

    #[test]
    fn worker_order_does_not_matter() {
        let workers = [(120, "busy"), (7, "idle"), (3_000_000, "cheap"), (0, "pause"), (42, "gone")];
        let forward = MetricSnapshot::from_status(&status(4, &workers));

        let mut reversed = workers;
        reversed.reverse();
        assert_eq!(MetricSnapshot::from_status(&status(4, &reversed)), forward);

        let mut rotated = workers;
        rotated.rotate_left(2);
        assert_eq!(MetricSnapshot::from_status(&status(4, &rotated)), forward);

        assert_eq!(forward.requests, 3_000_169.0);
    }

    #[test]
    fn values_always_contain_all_series() {
        let values = MetricSnapshot::default().to_values();
        assert_eq!(values.len(), 6);
        for name in MetricSnapshot::NAMES {
            assert_eq!(values.get(name), Some(&0.0), "{name}");
        }
        assert_eq!(MetricSnapshot::default().get("load"), None);
    }
}
