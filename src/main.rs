use clap::Parser;
use color_eyre::Result;
use mackerel_plugin_uwsgi_vassal::{
    init_errors,
    logging,
    run,
    Args,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_errors()?;
    logging::log_init(args.verbose)?;

    run(args).await
}
