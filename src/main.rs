use clap::Parser;
use quadsim::app::{self, Args};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    app::run(Args::parse())
}
