//! Queue-based intake for affiliation requests
//!
//! Transport handlers submit parsed requests through a [`RequestQueue`];
//! a background worker pulls them off a flume channel and runs each one
//! through the pipeline on its own task, so one slow store call never
//! holds up unrelated requests.

use futures::{FutureExt, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinSet;

use common::stanza::AffiliationRequest;
use common::store::ChannelStore;

use crate::state::State;

/// Producer handle for incoming requests
#[derive(Debug, Clone)]
pub struct RequestQueue {
    tx: flume::Sender<AffiliationRequest>,
}

impl RequestQueue {
    /// Create a new request queue
    ///
    /// Returns a tuple of (queue, receiver). The receiver should be passed to
    /// the worker task.
    pub fn new(max_queue_size: Option<usize>) -> (Self, RequestReceiver) {
        let (tx, rx) = match max_queue_size {
            Some(size) => {
                tracing::info!("creating bounded request queue with size {}", size);
                flume::bounded(size)
            }
            None => {
                tracing::info!("creating unbounded request queue");
                flume::unbounded()
            }
        };

        (Self { tx }, RequestReceiver { rx })
    }

    /// Hand a request to the worker, waiting while the queue is full
    pub async fn submit(&self, request: AffiliationRequest) -> anyhow::Result<()> {
        tracing::debug!("queueing request {} for processing", request.id);
        self.tx
            .send_async(request)
            .await
            .map_err(|_| anyhow::anyhow!("request worker has been stopped"))
    }

    /// Hand a request to the worker without waiting
    pub fn try_submit(&self, request: AffiliationRequest) -> anyhow::Result<()> {
        self.tx.try_send(request).map_err(|e| match e {
            flume::TrySendError::Full(_) => {
                anyhow::anyhow!("request queue is full - worker may be overloaded")
            }
            flume::TrySendError::Disconnected(_) => {
                anyhow::anyhow!("request worker has been stopped")
            }
        })
    }
}

/// Request receiver for the background worker
#[derive(Debug)]
pub struct RequestReceiver {
    rx: flume::Receiver<AffiliationRequest>,
}

impl RequestReceiver {
    /// Convert to an async stream for use in tokio::select!
    pub fn into_async(self) -> flume::r#async::RecvStream<'static, AffiliationRequest> {
        self.rx.into_stream()
    }
}

/// Run the background worker for queued requests
///
/// Each request is processed on its own task. The worker stops taking new
/// requests when `shutdown` fires or every [`RequestQueue`] is dropped.
/// Requests already queued when `shutdown` fires are still processed, and
/// the worker waits for everything in flight before returning.
///
/// # Example
///
/// ```ignore
/// let (queue, receiver) = RequestQueue::new(Some(1000));
/// let (state, outbox) = ServiceState::from_config(&config, store)?;
///
/// tokio::spawn(async move {
///     run_worker(state, receiver.into_async(), shutdown_rx).await;
/// });
/// ```
pub async fn run_worker<S: ChannelStore>(
    state: State<S>,
    mut requests: flume::r#async::RecvStream<'static, AffiliationRequest>,
    mut shutdown: watch::Receiver<()>,
) {
    tracing::info!("starting request worker for {}", state.server_jid());

    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            next = requests.next() => {
                let Some(request) = next else {
                    tracing::info!("request queue closed, shutting down worker");
                    break;
                };
                spawn_request(&mut in_flight, &state, request);
            }

            // reap finished tasks so the set does not grow unbounded
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!("request task panicked: {}", e);
                }
            }

            _ = shutdown.changed() => {
                tracing::info!("request worker shutting down");
                // already accepted by submit; answer them rather than drop them
                let mut drained = 0;
                while let Some(Some(request)) = requests.next().now_or_never() {
                    spawn_request(&mut in_flight, &state, request);
                    drained += 1;
                }
                if drained > 0 {
                    tracing::info!("processing {} queued requests before stopping", drained);
                }
                break;
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!("request task panicked: {}", e);
        }
    }
    tracing::info!("request worker stopped");
}

fn spawn_request<S: ChannelStore>(
    in_flight: &mut JoinSet<()>,
    state: &State<S>,
    request: AffiliationRequest,
) {
    let processor = state.processor().clone();
    in_flight.spawn(async move {
        let id = request.id.clone();
        match processor.process(request).await {
            Ok(outcome) => tracing::debug!("request {} finished: {:?}", id, outcome),
            Err(e) => tracing::error!("request {} failed: {}", id, e),
        }
    });
}
