#[macro_use]
extern crate tracing;

pub mod args;
pub mod logging;

pub use args::Args;
use chrono::Utc;
use color_eyre::Result;
use std::io::Write as _;
use uwsgi_stats_gatherer::{
    Config,
    Orchestrator,
    VassalCollector,
};

pub fn init_errors() -> Result<()> {
    color_eyre::install()
}

/// Print either the graph definitions or the current values to stdout.
///
/// Nothing is printed when collection fails; the error is returned and `main` exits non-zero.
pub async fn run(args: Args) -> Result<()> {
    let config = Config::new(
        &args.socket,
        Some(args.metric_key_prefix.clone()),
        args.tempfile.clone(),
        args.workdir.clone(),
        args.timeout,
    )?;
    debug!(?config, "Resolved configuration");

    let orchestrator = Orchestrator::new(VassalCollector::new(&config)?, &config.tempfile);

    let output = if args.wants_graph_definitions() {
        orchestrator.format_definitions()?
    } else {
        orchestrator.collect(Utc::now()).await?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
