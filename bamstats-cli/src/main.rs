mod cli;
mod config;
mod handlers;
mod modulator;

use std::process;

use env_logger::Env;
use log::error;

use bamstats_io::{SnapshotWriter, StatusMessage};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "bamstats-alive";
    pub const DEFAULT_LOG_FILTER: &str = "warn";
}

fn main() {
    // stdout carries the JSON stream, so logs stay on stderr
    env_logger::Builder::from_env(Env::default().default_filter_or(consts::DEFAULT_LOG_FILTER))
        .init();

    let matches = cli::build_parser().get_matches();

    if let Err(err) = handlers::run_stats(&matches) {
        let message = format!("{err:#}");
        error!("{message}");

        let status = StatusMessage::error(message);
        if let Err(write_err) = SnapshotWriter::stdout().write_status(&status) {
            error!("Failed to report error status: {write_err}");
        }
        process::exit(1);
    }
}
