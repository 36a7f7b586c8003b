use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fitqd",
    version,
    about = "Offer-matching job admission daemon (line-protocol harness)"
)]
pub struct Fitqd {
    /// Path to a config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}
