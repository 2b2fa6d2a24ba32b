//! Channel server local harness
//!
//! Reads affiliation requests as newline-delimited JSON on stdin, runs them
//! through the request worker, and writes every outgoing stanza (replies,
//! notifications and delegations) as newline-delimited JSON on stdout.
//! Logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use common::prelude::{AffiliationRequest, MemoryChannelStore, OutboxReceiver};
use service::process::{graceful_shutdown_blocker, init_tracing, shutdown_and_join};
use service::{run_worker, seed, Config, RequestQueue, ServiceState};

/// Default number of requests that may wait for the worker
const REQUEST_QUEUE_SIZE: usize = 1000;

/// Channel server local harness - JSON requests in, stanzas out
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a JSON fixture to seed the channel store with
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Maximum number of queued requests
    #[arg(long, default_value_t = REQUEST_QUEUE_SIZE)]
    queue_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
        config.validate()?;
    }

    let guard = init_tracing(config.log_level()?);
    tracing::info!("starting channel server local harness");

    let store = match &args.seed {
        Some(path) => seed::load(path).await?,
        None => MemoryChannelStore::new(),
    };

    let (state, outbox) = match ServiceState::from_config(&config, store) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("failed to create service state: {}", e);
            std::process::exit(3);
        }
    };

    let (graceful_waiter, shutdown_tx, shutdown_rx) = graceful_shutdown_blocker()?;
    let (queue, receiver) = RequestQueue::new(Some(args.queue_size));

    let reader = tokio::spawn(read_requests(queue, shutdown_rx.clone()));
    let writer = tokio::spawn(write_stanzas(outbox));

    // The worker owns the state; once it returns every outbox producer is
    //  gone and the writer drains what is left.
    run_worker(state, receiver.into_async(), shutdown_rx).await;

    let _ = shutdown_tx.send(());
    let clean = shutdown_and_join(graceful_waiter, vec![reader, writer]).await;

    tracing::info!("channel server local harness stopped");
    drop(guard);

    // a pending blocking stdin read would otherwise hold the runtime open
    std::process::exit(if clean { 0 } else { 4 });
}

/// Parse stdin lines into requests until EOF or shutdown
async fn read_requests(queue: RequestQueue, mut shutdown: watch::Receiver<()>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<AffiliationRequest>(&line) {
                    Ok(request) => {
                        if let Err(e) = queue.submit(request).await {
                            tracing::warn!("dropping request: {}", e);
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("skipping malformed request: {}", e),
                },
                Ok(None) => {
                    tracing::info!("stdin closed, no more requests");
                    break;
                }
                Err(e) => {
                    tracing::error!("failed to read stdin: {}", e);
                    break;
                }
            },

            _ = shutdown.changed() => break,
        }
    }
}

/// Write every outgoing stanza to stdout until all producers are dropped
async fn write_stanzas(outbox: OutboxReceiver) {
    let mut stdout = tokio::io::stdout();
    let mut stanzas = outbox.into_async();

    while let Some(stanza) = stanzas.next().await {
        let mut line = match serde_json::to_vec(&stanza) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to encode stanza for {}: {}", stanza.to(), e);
                continue;
            }
        };
        line.push(b'\n');
        if let Err(e) = stdout.write_all(&line).await {
            tracing::error!("failed to write stanza: {}", e);
            break;
        }
    }

    if let Err(e) = stdout.flush().await {
        tracing::error!("failed to flush stdout: {}", e);
    }
}
