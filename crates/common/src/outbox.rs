//! Outgoing stanza queue
//!
//! The pipeline only produces into this queue; the network send loop that
//! consumes it lives with the transport. The queue is a flume channel, so
//! any number of producers may share an [`Outbox`] and the receiving side
//! may be consumed from sync or async code.

use crate::stanza::Stanza;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutboxError {
    /// The consumer has gone away; the stanza was not queued
    #[error("outbox receiver has been dropped")]
    Closed,
}

/// Producer handle for the outgoing queue
///
/// This is a lightweight handle that can be cloned freely and shared
/// across request tasks.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: flume::Sender<Stanza>,
}

impl Outbox {
    /// Create an unbounded outbox and its receiver
    pub fn unbounded() -> (Self, OutboxReceiver) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, OutboxReceiver { rx })
    }

    /// Create an outbox that applies backpressure once `capacity` stanzas
    ///  are waiting
    pub fn bounded(capacity: usize) -> (Self, OutboxReceiver) {
        let (tx, rx) = flume::bounded(capacity);
        (Self { tx }, OutboxReceiver { rx })
    }

    /// Create an outbox from an optional capacity, `None` meaning unbounded
    pub fn with_capacity(capacity: Option<usize>) -> (Self, OutboxReceiver) {
        match capacity {
            Some(size) => {
                tracing::info!("creating bounded outbox with capacity {}", size);
                Self::bounded(size)
            }
            None => {
                tracing::info!("creating unbounded outbox");
                Self::unbounded()
            }
        }
    }

    /// Queue a stanza for delivery
    ///
    /// Waits while a bounded queue is full. Fails only if the receiver has
    ///  been dropped, in which case the stanza is lost and the caller must
    ///  treat the request as failed.
    pub async fn enqueue(&self, stanza: impl Into<Stanza>) -> Result<(), OutboxError> {
        let stanza = stanza.into();
        tracing::trace!("enqueueing stanza to {}", stanza.to());
        self.tx
            .send_async(stanza)
            .await
            .map_err(|_| OutboxError::Closed)
    }

    /// Number of stanzas waiting to be consumed
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer side of the outgoing queue
#[derive(Debug)]
pub struct OutboxReceiver {
    rx: flume::Receiver<Stanza>,
}

impl OutboxReceiver {
    /// Receive the next stanza without blocking
    pub fn try_recv(&self) -> Option<Stanza> {
        self.rx.try_recv().ok()
    }

    /// Receive the next stanza from async code
    pub async fn recv_async(&self) -> Option<Stanza> {
        self.rx.recv_async().await.ok()
    }

    /// Everything currently queued, in order
    pub fn drain(&self) -> Vec<Stanza> {
        self.rx.try_iter().collect()
    }

    /// Get an async stream for use in `tokio::select!`
    pub fn into_async(self) -> flume::r#async::RecvStream<'static, Stanza> {
        self.rx.into_stream()
    }
}
