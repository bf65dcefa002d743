use clap::Parser;
use std::{
    path::PathBuf,
    time::Duration,
};
use uwsgi_stats_gatherer::config::DEFAULT_TIMEOUT;

/// mackerel-agent plugin for a uWSGI vassal's stats server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Socket (must be with prefix of 'http://' or 'unix://')
    #[arg(long)]
    pub socket: String,

    /// Prefix of every metric key
    #[arg(long = "metric-key-prefix", default_value = "uWSGI")]
    pub metric_key_prefix: String,

    /// Temp file name used to compute request rates between runs
    #[arg(long)]
    pub tempfile: Option<PathBuf>,

    /// Give up on the stats server after this long (e.g. "500ms", "10s")
    #[arg(
        long,
        default_value = humantime::format_duration(DEFAULT_TIMEOUT).to_string(),
        value_parser = humantime::parse_duration
    )]
    pub timeout: Duration,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Set by mackerel-agent to request graph definitions instead of values.
    #[arg(long, env = "MACKEREL_AGENT_PLUGIN_META", hide = true)]
    pub plugin_meta: Option<String>,

    /// Directory for the default temp file, set by mackerel-agent.
    #[arg(long, env = "MACKEREL_PLUGIN_WORKDIR", hide = true)]
    pub workdir: Option<PathBuf>,
}

impl Args {
    pub fn wants_graph_definitions(&self) -> bool {
        self.plugin_meta.as_deref().is_some_and(|value| !value.is_empty())
    }
}
