//! Tolerant decoding of the uWSGI stats document.
//!
//! Field types drift between uWSGI releases (numbers occasionally arrive as strings, fields come
//! and go), so every field is optional and falls back to a default instead of failing the decode.
//! Only the top-level shape is strict: it has to be a JSON object.

use crate::metrics::WorkerState;
use serde::{
    de::{
        Error as _,
        Unexpected,
    },
    Deserialize,
    Deserializer,
};
use serde_json::Value;

/// The subset of a vassal's stats document that the plugin reports on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusDocument {
    #[serde(default, deserialize_with = "lenient_count")]
    pub listen_queue: u64,
    #[serde(default, deserialize_with = "lenient_workers")]
    pub workers: Vec<WorkerRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkerRecord {
    /// Requests served since the worker was (re)spawned.
    #[serde(default, deserialize_with = "lenient_count")]
    pub requests: u64,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: String,
}

impl WorkerRecord {
    pub fn new(requests: u64, status: impl Into<String>) -> Self {
        Self {
            requests,
            status: status.into(),
        }
    }

    /// The counted state of this worker, `None` for statuses without a bucket.
    pub fn state(&self) -> Option<WorkerState> {
        self.status.parse().ok()
    }
}

impl StatusDocument {
    /// Decode the first JSON value in `bytes`. Anything after it is ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value = serde_json::Deserializer::from_slice(bytes)
            .into_iter::<Value>()
            .next()
            .ok_or_else(|| serde_json::Error::custom("the stats stream ended before any JSON value"))??;

        match value {
            Value::Object(_) => Self::deserialize(value),
            other => Err(serde_json::Error::invalid_type(unexpected(&other), &"a JSON object")),
        }
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate_count)).unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_count))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn truncate_count(f: f64) -> Option<u64> {
    (f.is_finite() && f > 0.0).then_some(f as u64)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(status)) => Ok(status),
        _ => Ok(String::new()),
    }
}

fn lenient_workers<'de, D>(deserializer: D) -> Result<Vec<WorkerRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!(found = ?unexpected(&other), "Ignoring 'workers' that is not an array");
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => WorkerRecord::deserialize(item).ok(),
            other => {
                debug!(found = ?unexpected(&other), "Skipping worker entry that is not an object");
                None
            }
        })
        .collect())
}
