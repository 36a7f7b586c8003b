use clap::Parser;
mod cli;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fitqd = cli::Fitqd::parse();
    tracing_subscriber::fmt()
        .with_max_level(fitqd.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = fitq::config::load_config(fitqd.config.as_ref())?;
    server::run(config).await
}
