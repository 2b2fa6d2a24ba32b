mod utils;

use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use utils::{graceful_shutdown_blocker, register_panic_logger, report_build_info};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Install the global subscriber and panic hook.
///
/// Logs go to stderr; stdout is left for whatever the binary writes.
///  `RUST_LOG` overrides `level`. The returned guard must be kept alive
///  for the duration of the program or buffered lines are lost.
pub fn init_tracing(level: tracing::Level) -> WorkerGuard {
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(false)
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    register_panic_logger();
    report_build_info();

    guard
}

/// Wait for the shutdown signal, then join every task with a timeout.
///
/// Returns false if the tasks did not finish in time.
pub async fn shutdown_and_join(graceful_waiter: JoinHandle<()>, handles: Vec<JoinHandle<()>>) -> bool {
    let _ = graceful_waiter.await;

    if timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(handles))
        .await
        .is_err()
    {
        tracing::error!(
            "failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        );
        return false;
    }
    true
}
