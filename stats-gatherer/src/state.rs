//! # Diff State
//!
//! Cumulative series (the request counter) are reported as a per-minute rate. The raw values of
//! the previous run are kept in a small JSON file next to the time they were taken:
//!
//! ```json
//! {"_lastTime": 1760734800, "busy": 1.0, "idle": 3.0, "requests": 48211.0, ...}
//! ```

use crate::metrics::MetricValues;
use chrono::{
    DateTime,
    Utc,
};
use eyre::{
    Context as _,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    io::ErrorKind,
    path::Path,
};

/// Samples older than this are not used to compute a rate.
pub const MAX_DIFF_INTERVAL_SECS: i64 = 600;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffState {
    #[serde(rename = "_lastTime")]
    pub last_time: i64,
    #[serde(flatten)]
    pub values: MetricValues,
}

impl DiffState {
    pub fn new(values: MetricValues, taken_at: DateTime<Utc>) -> Self {
        Self {
            last_time: taken_at.timestamp(),
            values,
        }
    }

    /// Load the state of the previous run. A missing file is not an error.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).wrap_err_with(|| format!("Failed to read diff state {}", path.display())),
        };
        let state = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("Failed to parse diff state {}", path.display()))?;
        Ok(Some(state))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_vec(self).context("Failed to serialize diff state")?;
        tokio::fs::write(path, content)
            .await
            .wrap_err_with(|| format!("Failed to write diff state {}", path.display()))
    }

    /// Per-minute rate of `name` between this state and `current` taken at `now`.
    ///
    /// Returns `None` when there is nothing sensible to report: no previous value, a counter
    /// that went backwards, or a previous sample that is too old or not older than `now`.
    pub fn per_minute_rate(&self, name: &str, current: f64, now: DateTime<Utc>) -> Option<f64> {
        let Some(&previous) = self.values.get(name) else {
            debug!(name, "No previous value, skipping this run");
            return None;
        };

        let elapsed = now.timestamp() - self.last_time;
        if elapsed <= 0 {
            debug!(name, elapsed, "Previous sample is not older than the current one");
            return None;
        }
        if elapsed > MAX_DIFF_INTERVAL_SECS {
            info!(name, elapsed, "Previous sample is too old to compute a rate");
            return None;
        }
        if current < previous {
            info!(name, previous, current, "Counter seems to be reset");
            return None;
        }

        Some((current - previous) * 60.0 / elapsed as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn state(requests: f64, secs: i64) -> DiffState {
        DiffState::new(MetricValues::from([("requests".to_string(), requests)]), at(secs))
    }

    #[test]
    fn rate_is_per_minute() {
        let previous = state(1_000.0, 1_000);
        assert_eq!(previous.per_minute_rate("requests", 1_120.0, at(1_060)), Some(120.0));
        assert_eq!(previous.per_minute_rate("requests", 1_120.0, at(1_120)), Some(60.0));
        assert_eq!(previous.per_minute_rate("requests", 1_000.0, at(1_030)), Some(0.0));
    }

    #[test]
    fn rate_is_skipped_when_it_would_be_misleading() {
        let previous = state(1_000.0, 1_000);
        assert_eq!(previous.per_minute_rate("busy", 1.0, at(1_060)), None);
        assert_eq!(previous.per_minute_rate("requests", 10.0, at(1_060)), None);
        assert_eq!(previous.per_minute_rate("requests", 1_100.0, at(1_000)), None);
        assert_eq!(previous.per_minute_rate("requests", 1_100.0, at(900)), None);
        assert_eq!(
            previous.per_minute_rate("requests", 1_100.0, at(1_000 + MAX_DIFF_INTERVAL_SECS + 1)),
            None
        );
        assert!(previous
            .per_minute_rate("requests", 1_100.0, at(1_000 + MAX_DIFF_INTERVAL_SECS))
            .is_some());
    }

    #[test]
    fn serialized_layout() {
        let json = serde_json::to_value(state(48_211.0, 1_760_734_800)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"_lastTime": 1_760_734_800, "requests": 48_211.0})
        );
    }

    #[tokio::test]
    async fn load_and_save() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("state.json");

        assert_eq!(DiffState::load(&path).await.unwrap(), None);

        let saved = state(12.0, 1_000);
        saved.save(&path).await.unwrap();
        assert_eq!(DiffState::load(&path).await.unwrap(), Some(saved));

        tokio::fs::write(&path, b"not json").await.unwrap();
        assert!(DiffState::load(&path).await.is_err());
    }
}
