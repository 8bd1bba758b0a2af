use clap::Parser;
use log::error;
use xodr_graph::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    logger.target(env_logger::Target::Stderr);
    if let Some(level) = cli.log_level() {
        logger.filter_level(level);
    }
    logger.init();

    if let Err(e) = cli::run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
