//! mystat - print MySQL performance counters as a fixed-width table
//!
//! Every interval, two `SHOW GLOBAL STATUS` snapshots are taken one second
//! apart and their deltas are printed as one row, alongside thread,
//! transaction and replication state.

mod args;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mystat_driver_mysql::MySqlConnectionFactory;
use mystat_monitor::{OutputSink, Sampler, StdoutSink};

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match logging::init(args.logging_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("warning: diagnostics disabled: {:#}", e);
            None
        }
    };

    match run(&args).await {
        Ok(rows) => {
            tracing::info!(rows, "sampler finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "sampler stopped");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<u64> {
    let config = args.sampler_config();
    config.validate().context("invalid sampling options")?;

    let factory = MySqlConnectionFactory::new(args.connection_config());
    let sink: Box<dyn OutputSink> = match args.file_sink() {
        Some(sink) => {
            tracing::info!(path = %sink.path().display(), "appending rows to file");
            Box::new(sink)
        }
        None => Box::new(StdoutSink::new()),
    };

    let mut sampler = Sampler::new(factory, sink, args.schema()).with_config(config);
    sampler
        .run(shutdown_signal())
        .await
        .with_context(|| format!("sampling {} failed", args.host))
}

/// Resolves on Ctrl-C. If the handler cannot be installed the sampler
/// runs until it stops on its own.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
