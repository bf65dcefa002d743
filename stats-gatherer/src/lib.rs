//! # uWSGI Stats Gatherer
//!
//! Collects metrics from a uWSGI vassal's stats server and reports them as a mackerel-agent plugin.
//!
//! ## Reported metrics
//!
//! - **`<prefix>.queue`**: connections waiting in the listen queue
//! - **`<prefix>.workers`**: number of workers per state (`busy`, `idle`, `cheap`, `pause`), stacked
//! - **`<prefix>.req`**: requests per minute, derived from the cumulative per-worker counters
//!
//! ## Architecture
//!
//! - **`transport`**: resolves `unix://` / `http://` targets and reads one stats document
//! - **`metrics`**: tolerant decoding of the stats document, the metric snapshot and graph definitions
//! - **`collectors`**: the `VassalCollector` and the `Orchestrator` that formats plugin output
//! - **`state`**: previous raw values used to turn counters into rates
//! - **`config`**: validated settings for one invocation
//!
//! ## Usage
//!
//! ```bash
//! mackerel-plugin-uwsgi-vassal --socket=unix:///run/uwsgi/app.stats
//! mackerel-plugin-uwsgi-vassal --socket=http://127.0.0.1:1717 --metric-key-prefix=billing
//! ```

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod state;
pub mod transport;

pub use collectors::*;
pub use config::Config;
pub use error::{
    CollectError,
    TransportError,
};
pub use metrics::*;
pub use transport::ConnectionTarget;
