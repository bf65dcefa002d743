//! # Configuration Module
//!
//! Settings for a single plugin invocation, validated before any connection is attempted.
//!
//! ## Configuration Fields
//!
//! - **Target**: the `--socket` value, parsed into a [`ConnectionTarget`]
//! - **Metric key prefix**: namespace of every graph key, `uWSGI` unless overridden
//! - **Diff state file**: where raw values are kept between runs
//! - **Timeout**: upper bound for connecting to and reading from the stats server
//!
//! When no diff state file is given it is placed in `MACKEREL_PLUGIN_WORKDIR` (or the system temp
//! directory) and named after the prefix, so vassals reported under different prefixes don't share
//! state.

use crate::{
    error::CollectError,
    metrics::DEFAULT_METRIC_KEY_PREFIX,
    transport::ConnectionTarget,
};
use std::{
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub target: ConnectionTarget,
    pub metric_key_prefix: String,
    pub tempfile: PathBuf,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        socket: &str,
        metric_key_prefix: Option<String>,
        tempfile: Option<PathBuf>,
        workdir: Option<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, CollectError> {
        let target = socket.parse()?;

        let metric_key_prefix = metric_key_prefix
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_METRIC_KEY_PREFIX.to_string());

        let tempfile = tempfile.unwrap_or_else(|| Self::default_tempfile(&metric_key_prefix, workdir));

        Ok(Self {
            target,
            metric_key_prefix,
            tempfile,
            timeout,
        })
    }

    fn default_tempfile(metric_key_prefix: &str, workdir: Option<PathBuf>) -> PathBuf {
        let directory = workdir
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(std::env::temp_dir);
        let name: String = metric_key_prefix
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        directory.join(format!("mackerel-plugin-uwsgi-vassal-{name}"))
    }
}
