use eyre::{
    Context as _,
    Result,
};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Log to stderr; stdout carries the plugin output read by mackerel-agent.
///
/// `RUST_LOG` takes precedence. Otherwise only warnings are shown, or debug output for this
/// plugin's crates when `verbose` is set.
pub fn log_init(verbose: bool) -> Result<()> {
    let default_directives = if verbose {
        "warn,mackerel_plugin_uwsgi_vassal=debug,uwsgi_stats_gatherer=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directives))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to initialize tracing subscriber")
}
