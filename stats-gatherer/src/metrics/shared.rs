use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
};

/// Unit of a graph as understood by mackerel-agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Integer,
    Float,
}

/// Worker lifecycle states that get their own counter.
///
/// Anything else a uWSGI version reports (e.g. `sig`, or an empty string) is not a `WorkerState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum WorkerState {
    Busy,
    Idle,
    Cheap,
    Pause,
}
